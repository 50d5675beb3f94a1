//! Fixed-shape hand records at the perception boundary.
//!
//! The upstream hand-landmark model is a black box that yields, once per
//! video frame, zero or more hands: a left/right label and 21 normalized
//! landmark points.  Everything is validated and narrowed here so the
//! rest of the crate never sees a malformed payload — a hand that fails
//! validation is simply absent from the frame.

use std::fmt;

/// Landmarks per detected hand (MediaPipe hand topology).
pub const LANDMARK_COUNT: usize = 21;

/// Landmark index of the thumb tip.
pub const THUMB_TIP: usize = 4;

// ════════════════════════════════════════════════════════════════════════════
// Handedness / Finger
// ════════════════════════════════════════════════════════════════════════════

/// The classifier's left/right label.  This is a per-frame label, not a
/// persistent tracking id; all gesture state is keyed by it so a
/// flickering classification stays coherent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four tracked (non-thumb) fingers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Slot position in a hand-mapping sequence (0..4).
    pub fn slot(self) -> usize {
        match self {
            Finger::Index => 0,
            Finger::Middle => 1,
            Finger::Ring => 2,
            Finger::Pinky => 3,
        }
    }

    /// Landmark index of this finger's tip.
    pub fn tip_index(self) -> usize {
        match self {
            Finger::Index => 8,
            Finger::Middle => 12,
            Finger::Ring => 16,
            Finger::Pinky => 20,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark / HandDetection / HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// One landmark point, normalized to [0,1] image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Landmark {
        Landmark { x, y }
    }

    /// Euclidean distance in normalized image space.
    pub fn distance(self, other: Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A validated hand detection: handedness label plus exactly
/// [`LANDMARK_COUNT`] finite landmarks.
#[derive(Clone, Debug)]
pub struct HandDetection {
    pub handedness: Handedness,
    landmarks:      [Landmark; LANDMARK_COUNT],
}

impl HandDetection {
    /// Narrow a raw landmark list into a fixed-shape record.  `None` when
    /// the payload is malformed (wrong count, non-finite coordinates);
    /// such hands are skipped for the frame — no event, no state change.
    pub fn from_landmarks(handedness: Handedness, points: &[Landmark]) -> Option<HandDetection> {
        if points.len() != LANDMARK_COUNT {
            return None;
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return None;
        }
        let mut landmarks = [Landmark::new(0.0, 0.0); LANDMARK_COUNT];
        landmarks.copy_from_slice(points);
        Some(HandDetection {
            handedness,
            landmarks,
        })
    }

    pub fn thumb_tip(&self) -> Landmark {
        self.landmarks[THUMB_TIP]
    }

    pub fn finger_tip(&self, finger: Finger) -> Landmark {
        self.landmarks[finger.tip_index()]
    }
}

/// All hands detected in one video frame.  Frames repeating the previous
/// video timestamp are duplicates and must be skipped by the consumer.
#[derive(Clone, Debug)]
pub struct HandFrame {
    pub video_timestamp: f64,
    pub hands:           Vec<HandDetection>,
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<Landmark> {
        vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT]
    }

    #[test]
    fn accepts_exactly_21_finite_landmarks() {
        assert!(HandDetection::from_landmarks(Handedness::Left, &points()).is_some());
    }

    #[test]
    fn rejects_wrong_landmark_count() {
        let short = vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT - 1];
        assert!(HandDetection::from_landmarks(Handedness::Left, &short).is_none());
        let long = vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT + 3];
        assert!(HandDetection::from_landmarks(Handedness::Right, &long).is_none());
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let mut p = points();
        p[7] = Landmark::new(f32::NAN, 0.2);
        assert!(HandDetection::from_landmarks(Handedness::Left, &p).is_none());
        let mut p = points();
        p[0] = Landmark::new(0.1, f32::INFINITY);
        assert!(HandDetection::from_landmarks(Handedness::Left, &p).is_none());
    }

    #[test]
    fn tip_accessors_use_fixed_indices() {
        let mut p = points();
        p[THUMB_TIP] = Landmark::new(0.1, 0.1);
        p[8] = Landmark::new(0.2, 0.2);
        p[20] = Landmark::new(0.9, 0.9);
        let hand = HandDetection::from_landmarks(Handedness::Right, &p).unwrap();
        assert_eq!(hand.thumb_tip(), Landmark::new(0.1, 0.1));
        assert_eq!(hand.finger_tip(Finger::Index), Landmark::new(0.2, 0.2));
        assert_eq!(hand.finger_tip(Finger::Pinky), Landmark::new(0.9, 0.9));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Landmark::new(0.0, 0.0);
        let b = Landmark::new(0.3, 0.4);
        assert!((a.distance(b) - 0.5).abs() < 1e-6);
    }
}

//! Hand-frame sources.
//!
//! The perception model runs out of process; a [`HandSource`] is anything
//! that can feed validated [`HandFrame`]s into the session channel from
//! its own thread.  The built-in [`SimHandSource`] synthesizes frames
//! from console-driven pinch requests, so the whole pipeline below the
//! camera can run (and be tested) without one.

use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

use log::info;

use crate::hand::{
    Finger, HandDetection, HandFrame, Handedness, Landmark, LANDMARK_COUNT, THUMB_TIP,
};

// ════════════════════════════════════════════════════════════════════════════
// HandSource
// ════════════════════════════════════════════════════════════════════════════

/// A producer of hand frames.  `run` owns its thread until the frame
/// channel (or its own input) disconnects.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<HandFrame>);
}

/// Spawn a source on its own thread, feeding `tx`.
pub fn spawn_hand_source(source: Box<dyn HandSource>, tx: Sender<HandFrame>) {
    thread::spawn(move || source.run(tx));
}

// ════════════════════════════════════════════════════════════════════════════
// Frame synthesis
// ════════════════════════════════════════════════════════════════════════════

/// One requested pinch gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimPinch {
    pub hand:   Handedness,
    pub finger: Finger,
}

/// Build a one-hand frame in which `finger` is pinched (tip next to the
/// thumb) or open (tip far from it).  Geometry is well inside / outside
/// the pinch threshold, never on the boundary.
pub fn pinch_frame(
    video_timestamp: f64,
    hand: Handedness,
    finger: Finger,
    closed: bool,
) -> HandFrame {
    let thumb = Landmark::new(0.30, 0.50);
    let open = Landmark::new(0.70, 0.50);
    let mut points = [open; LANDMARK_COUNT];
    points[THUMB_TIP] = thumb;
    if closed {
        points[finger.tip_index()] = Landmark::new(0.31, 0.50);
    }
    let detection = HandDetection::from_landmarks(hand, &points)
        .unwrap_or_else(|| unreachable!("fixed-shape frame"));
    HandFrame {
        video_timestamp,
        hands: vec![detection],
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource
// ════════════════════════════════════════════════════════════════════════════

/// Turns console pinch requests into a press frame followed by a release
/// frame, with strictly advancing video timestamps.
pub struct SimHandSource {
    rx: Receiver<SimPinch>,
}

impl SimHandSource {
    pub fn new(rx: Receiver<SimPinch>) -> SimHandSource {
        SimHandSource { rx }
    }
}

impl HandSource for SimHandSource {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        info!("simulated hand source running");
        let mut ts = 0.0_f64;
        while let Ok(pinch) = self.rx.recv() {
            ts += 1.0;
            if tx
                .send(pinch_frame(ts, pinch.hand, pinch.finger, true))
                .is_err()
            {
                break;
            }
            // Brief hold so the press and release read as distinct frames.
            thread::sleep(Duration::from_millis(30));
            ts += 1.0;
            if tx
                .send(pinch_frame(ts, pinch.hand, pinch.finger, false))
                .is_err()
            {
                break;
            }
        }
        info!("simulated hand source stopped");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::PINCH_THRESHOLD;
    use std::sync::mpsc;

    #[test]
    fn pinch_frame_geometry_brackets_the_threshold() {
        let closed = pinch_frame(1.0, Handedness::Left, Finger::Index, true);
        let hand = &closed.hands[0];
        let d = hand.finger_tip(Finger::Index).distance(hand.thumb_tip());
        assert!(d < PINCH_THRESHOLD);
        // The other fingers stay open.
        let d = hand.finger_tip(Finger::Middle).distance(hand.thumb_tip());
        assert!(d > PINCH_THRESHOLD);

        let open = pinch_frame(2.0, Handedness::Left, Finger::Index, false);
        let hand = &open.hands[0];
        let d = hand.finger_tip(Finger::Index).distance(hand.thumb_tip());
        assert!(d > PINCH_THRESHOLD);
    }

    #[test]
    fn sim_source_emits_press_then_release() {
        let (pinch_tx, pinch_rx) = mpsc::channel();
        let (frame_tx, frame_rx) = mpsc::channel();
        spawn_hand_source(Box::new(SimHandSource::new(pinch_rx)), frame_tx);

        pinch_tx
            .send(SimPinch {
                hand:   Handedness::Right,
                finger: Finger::Ring,
            })
            .unwrap();

        let wait = Duration::from_secs(2);
        let press = frame_rx.recv_timeout(wait).unwrap();
        let release = frame_rx.recv_timeout(wait).unwrap();
        assert!(release.video_timestamp > press.video_timestamp);

        let hand = &press.hands[0];
        assert_eq!(hand.handedness, Handedness::Right);
        assert!(
            hand.finger_tip(Finger::Ring).distance(hand.thumb_tip()) < PINCH_THRESHOLD
        );
        let hand = &release.hands[0];
        assert!(
            hand.finger_tip(Finger::Ring).distance(hand.thumb_tip()) > PINCH_THRESHOLD
        );

        // Dropping the request side ends the source thread.
        drop(pinch_tx);
        assert!(frame_rx.recv_timeout(wait).is_err());
    }
}

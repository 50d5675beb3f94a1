//! Pinch detection — the per-frame, per-hand, per-finger state machine
//! that turns continuous landmark distances into discrete trigger events.
//!
//! Raw fingertip-to-thumb distance is noisy frame to frame; a bare
//! threshold would fire many times per physical pinch.  Two gates stand
//! between the threshold and an emitted event:
//!
//! * a **press/release latch** per (hand, finger) — only the rising edge
//!   of a pinch emits; the finger must open again before it can press
//!   again, like a physical key;
//! * a **cooldown ledger** per (swara, hand, finger) — a re-trigger of
//!   the same slot within [`TRIGGER_COOLDOWN`] is suppressed, catching
//!   sub-edge sensor oscillation the latch cannot see.
//!
//! Both maps are session-scoped and owned here: the ledger is bounded by
//! the 7×2×4 key space and entries are only ever overwritten, never
//! deleted, until an explicit [`GestureDetector::reset`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::debug;
use swara_scale::SwaraBase;

use crate::hand::{Finger, HandFrame, Handedness, Landmark};
use crate::mapping::HandMapping;

// ════════════════════════════════════════════════════════════════════════════
// Constants
// ════════════════════════════════════════════════════════════════════════════

/// Fingertip-to-thumb distance below which a finger counts as pinched,
/// in normalized image coordinates.  Empirically tuned.
pub const PINCH_THRESHOLD: f32 = 0.04;

/// Minimum interval between accepted triggers of the same
/// (swara, hand, finger) slot.
pub const TRIGGER_COOLDOWN: Duration = Duration::from_millis(250);

// ════════════════════════════════════════════════════════════════════════════
// GestureEvent
// ════════════════════════════════════════════════════════════════════════════

/// One accepted press: the raw (unresolved) swara a finger is mapped to,
/// plus where the fingertip was at trigger time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEvent {
    pub swara:    SwaraBase,
    pub hand:     Handedness,
    pub finger:   Finger,
    pub position: Landmark,
}

// ════════════════════════════════════════════════════════════════════════════
// GestureDetector
// ════════════════════════════════════════════════════════════════════════════

/// Per-session pinch state.  Keys are the classified handedness label,
/// not a tracked-hand identity, so left/right flicker between frames
/// lands on the same state.
pub struct GestureDetector {
    last_video_timestamp: Option<f64>,
    pinched:              HashMap<(Handedness, Finger), bool>,
    ledger:               HashMap<(SwaraBase, Handedness, Finger), Instant>,
}

impl GestureDetector {
    pub fn new() -> GestureDetector {
        GestureDetector {
            last_video_timestamp: None,
            pinched:              HashMap::new(),
            ledger:               HashMap::new(),
        }
    }

    /// Process one video frame against the current mapping.  `now` is a
    /// single snapshot for the whole frame, so every finger's cooldown is
    /// compared against the same instant.
    ///
    /// A frame repeating the previous video timestamp is a duplicate and
    /// is skipped without touching any state.
    pub fn process_frame(
        &mut self,
        frame: &HandFrame,
        mapping: &HandMapping,
        now: Instant,
    ) -> Vec<GestureEvent> {
        if self.last_video_timestamp == Some(frame.video_timestamp) {
            return Vec::new();
        }
        self.last_video_timestamp = Some(frame.video_timestamp);

        let mut events = Vec::new();
        for hand in &frame.hands {
            let thumb = hand.thumb_tip();
            for finger in Finger::ALL {
                let tip = hand.finger_tip(finger);
                let pinching = tip.distance(thumb) < PINCH_THRESHOLD;
                let latch = self
                    .pinched
                    .entry((hand.handedness, finger))
                    .or_insert(false);

                if pinching && !*latch {
                    // Press edge.
                    *latch = true;
                    let Some(swara) = mapping.swara_for(hand.handedness, finger) else {
                        continue;
                    };
                    let key = (swara, hand.handedness, finger);
                    let allowed = match self.ledger.get(&key) {
                        None => true,
                        Some(&last) => now.duration_since(last) > TRIGGER_COOLDOWN,
                    };
                    if allowed {
                        self.ledger.insert(key, now);
                        events.push(GestureEvent {
                            swara,
                            hand: hand.handedness,
                            finger,
                            position: tip,
                        });
                    } else {
                        debug!("debounced {} on {} {:?}", swara, hand.handedness, finger);
                    }
                } else if !pinching && *latch {
                    // Release edge: clear the latch, emit nothing.
                    *latch = false;
                }
            }
        }
        events
    }

    /// Clear all latches and the cooldown ledger.  Only called on an
    /// explicit session reset; raga/tala changes leave the state alone.
    pub fn reset(&mut self) {
        self.last_video_timestamp = None;
        self.pinched.clear();
        self.ledger.clear();
    }

    /// Current ledger size (bounded by the 56-entry key space).
    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }
}

impl Default for GestureDetector {
    fn default() -> Self {
        GestureDetector::new()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

//! Hand-to-swara mapping configuration.
//!
//! Four non-thumb fingers per hand, each assigned a base swara or left
//! unmapped.  Assignments come only from three fixed layout templates;
//! switching layout replaces both hand sequences at once, so no partial
//! state is ever observable.

use swara_scale::SwaraBase;

use crate::hand::{Finger, Handedness};

// ════════════════════════════════════════════════════════════════════════════
// HandMappingDirection
// ════════════════════════════════════════════════════════════════════════════

/// The three named layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandMappingDirection {
    LeftToRight,
    RightToLeft,
    Cyclic,
}

impl HandMappingDirection {
    pub const ALL: [HandMappingDirection; 3] = [
        HandMappingDirection::LeftToRight,
        HandMappingDirection::RightToLeft,
        HandMappingDirection::Cyclic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HandMappingDirection::LeftToRight => "left-to-right",
            HandMappingDirection::RightToLeft => "right-to-left",
            HandMappingDirection::Cyclic => "cyclic",
        }
    }

    pub fn parse(s: &str) -> Option<HandMappingDirection> {
        Self::ALL.iter().copied().find(|d| d.as_str() == s)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandMapping
// ════════════════════════════════════════════════════════════════════════════

type Layout = [Option<SwaraBase>; 4];

/// Fixed templates, one (left, right) pair per direction.
fn templates(direction: HandMappingDirection) -> (Layout, Layout) {
    use SwaraBase::*;
    match direction {
        HandMappingDirection::LeftToRight => (
            [Some(Sa), Some(Ri), Some(Ga), Some(Ma)],
            [Some(Pa), Some(Da), Some(Ni), None],
        ),
        HandMappingDirection::RightToLeft => (
            [None, Some(Ni), Some(Da), Some(Pa)],
            [Some(Ma), Some(Ga), Some(Ri), Some(Sa)],
        ),
        HandMappingDirection::Cyclic => (
            [Some(Sa), Some(Ri), Some(Ga), None],
            [Some(Ma), Some(Pa), Some(Da), Some(Ni)],
        ),
    }
}

/// Current finger-to-swara assignment for both hands.
#[derive(Clone, Debug)]
pub struct HandMapping {
    direction: HandMappingDirection,
    left:      Layout,
    right:     Layout,
}

impl HandMapping {
    pub fn new(direction: HandMappingDirection) -> HandMapping {
        let (left, right) = templates(direction);
        HandMapping {
            direction,
            left,
            right,
        }
    }

    pub fn direction(&self) -> HandMappingDirection {
        self.direction
    }

    /// Replace both hand sequences from the template for `direction`.
    /// Whole-layout replacement only; there is no per-finger mutation.
    pub fn set_direction(&mut self, direction: HandMappingDirection) {
        *self = HandMapping::new(direction);
    }

    /// Swara assigned to a finger slot; `None` for out-of-range or
    /// unmapped slots.  Never fails.
    pub fn swara_for_slot(&self, hand: Handedness, slot: usize) -> Option<SwaraBase> {
        let layout = match hand {
            Handedness::Left => &self.left,
            Handedness::Right => &self.right,
        };
        layout.get(slot).copied().flatten()
    }

    pub fn swara_for(&self, hand: Handedness, finger: Finger) -> Option<SwaraBase> {
        self.swara_for_slot(hand, finger.slot())
    }

    /// String surface for the UI: "" for unmapped slots.
    pub fn swara_name_for_slot(&self, hand: Handedness, slot: usize) -> &'static str {
        self.swara_for_slot(hand, slot)
            .map(SwaraBase::as_str)
            .unwrap_or("")
    }
}

impl Default for HandMapping {
    fn default() -> Self {
        HandMapping::new(HandMappingDirection::LeftToRight)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

//! Tala cycle clock: a fixed-period beat counter over the selected tala.
//!
//! The counter advances on a 500ms grid polled from the main loop, so a
//! late poll catches up by advancing once per elapsed period rather than
//! drifting.  The beat index always stays within the cycle length; tala
//! changes restart from beat 0 on a fresh grid.

use std::time::{Duration, Instant};

/// Interval between beats.
pub const TICK_PERIOD: Duration = Duration::from_millis(500);

/// Modular beat counter for one tala cycle.
pub struct CycleCounter {
    beats:    usize,
    index:    usize,
    next_due: Instant,
}

impl CycleCounter {
    /// Start a counter at beat 0, first advance due one period after `now`.
    pub fn new(beats: usize, now: Instant) -> CycleCounter {
        CycleCounter {
            beats: beats.max(1),
            index: 0,
            next_due: now + TICK_PERIOD,
        }
    }

    pub fn beats(&self) -> usize {
        self.beats
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Step to the next beat, wrapping at the cycle length.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.beats;
        self.index
    }

    /// Advance once per period elapsed since the last poll.  Returns true
    /// when at least one beat fired, so the caller knows to redraw.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut fired = false;
        while now >= self.next_due {
            self.advance();
            self.next_due += TICK_PERIOD;
            fired = true;
        }
        fired
    }

    /// Rebind to a new cycle length: beat 0, grid re-armed from `now`.
    pub fn restart(&mut self, beats: usize, now: Instant) {
        *self = CycleCounter::new(beats, now);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

//! The tala catalog.
//!
//! A tala is a fixed-length rhythmic cycle; its pattern marks which
//! beats are accented.  The pattern length is the modulus for the
//! rhythmic cycle counter.

// ════════════════════════════════════════════════════════════════════════════
// Tala
// ════════════════════════════════════════════════════════════════════════════

/// A named rhythmic cycle.
#[derive(Debug)]
pub struct Tala {
    pub key:     &'static str,
    pub name:    &'static str,
    /// Beat count; always equals `pattern.len()` and is at least 1.
    pub beats:   usize,
    /// Accent per beat (`true` = accented).
    pub pattern: &'static [bool],
}

impl Tala {
    pub fn is_accented(&self, beat: usize) -> bool {
        self.pattern.get(beat % self.beats).copied().unwrap_or(false)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Catalog
// ════════════════════════════════════════════════════════════════════════════

static TALAS: [Tala; 5] = [
    Tala {
        key:     "adi",
        name:    "Adi",
        beats:   8,
        // laghu of 4, then two drutams of 2
        pattern: &[true, false, false, false, true, false, true, false],
    },
    Tala {
        key:     "rupaka",
        name:    "Rupaka",
        beats:   6,
        pattern: &[true, false, true, false, false, false],
    },
    Tala {
        key:     "eka",
        name:    "Eka",
        beats:   4,
        pattern: &[true, false, false, false],
    },
    Tala {
        key:     "khanda_chapu",
        name:    "Khanda Chapu",
        beats:   5,
        pattern: &[true, false, true, false, false],
    },
    Tala {
        key:     "misra_chapu",
        name:    "Misra Chapu",
        beats:   7,
        pattern: &[true, false, false, true, false, true, false],
    },
];

/// Look up a tala by key.
pub fn tala(key: &str) -> Option<&'static Tala> {
    TALAS.iter().find(|t| t.key == key)
}

/// The full catalog, in presentation order.
pub fn talas() -> &'static [Tala] {
    &TALAS
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

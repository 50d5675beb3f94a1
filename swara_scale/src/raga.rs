//! The raga catalog.
//!
//! Each raga is an ordered subset of swarasthanas with at most one
//! variant per base degree.  The catalog is process-wide constant data;
//! lookups by key return `None` for unknown names and never fail.

use crate::swara::{
    Swara, DA1, DA2, GA2, GA3, MA1, MA2, NI2, NI3, PA, RI1, RI2, SA,
};

// ════════════════════════════════════════════════════════════════════════════
// Raga
// ════════════════════════════════════════════════════════════════════════════

/// A named scale: ordered swarasthanas in ascending order.
#[derive(Debug)]
pub struct Raga {
    /// Stable lookup key (lowercase, no spaces).
    pub key:         &'static str,
    /// Display name.
    pub name:        &'static str,
    pub description: &'static str,
    pub swaras:      &'static [Swara],
}

impl Raga {
    /// Whether the raga uses any variant of the given base degree.
    pub fn uses(&self, base: crate::SwaraBase) -> bool {
        self.swaras.iter().any(|s| s.base == base)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Catalog
// ════════════════════════════════════════════════════════════════════════════

static RAGAS: [Raga; 7] = [
    Raga {
        key:         "mayamalavagowla",
        name:        "Mayamalavagowla",
        description: "The 15th melakarta; the traditional beginner's raga",
        swaras:      &[SA, RI1, GA3, MA1, PA, DA1, NI3],
    },
    Raga {
        key:         "sankarabharanam",
        name:        "Sankarabharanam",
        description: "The 29th melakarta; equivalent of the major scale",
        swaras:      &[SA, RI2, GA3, MA1, PA, DA2, NI3],
    },
    Raga {
        key:         "kalyani",
        name:        "Kalyani",
        description: "The 65th melakarta; raised Ma gives a Lydian color",
        swaras:      &[SA, RI2, GA3, MA2, PA, DA2, NI3],
    },
    Raga {
        key:         "kharaharapriya",
        name:        "Kharaharapriya",
        description: "The 22nd melakarta; equivalent of the Dorian mode",
        swaras:      &[SA, RI2, GA2, MA1, PA, DA2, NI2],
    },
    Raga {
        key:         "hanumatodi",
        name:        "Hanumatodi",
        description: "The 8th melakarta; a dark, Phrygian-leaning scale",
        swaras:      &[SA, RI1, GA2, MA1, PA, DA1, NI2],
    },
    Raga {
        key:         "mohanam",
        name:        "Mohanam",
        description: "Pentatonic janya of Kalyani; omits Ma and Ni",
        swaras:      &[SA, RI2, GA3, PA, DA2],
    },
    Raga {
        key:         "hamsadhwani",
        name:        "Hamsadhwani",
        description: "Pentatonic janya of Sankarabharanam; omits Ma and Da",
        swaras:      &[SA, RI2, GA3, PA, NI3],
    },
];

/// Look up a raga by key.
pub fn raga(key: &str) -> Option<&'static Raga> {
    RAGAS.iter().find(|r| r.key == key)
}

/// The full catalog, in presentation order.
pub fn ragas() -> &'static [Raga] {
    &RAGAS
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

//! Swara symbols and the fixed swarasthana ratio table.
//!
//! Carnatic theory names seven base degrees; five of them admit marked
//! pitch variants, giving sixteen distinct swarasthanas per octave.  A
//! [`Swara`] is one concrete spelling; its base symbol is always
//! recoverable by dropping the variant marker.

use std::fmt;

// ════════════════════════════════════════════════════════════════════════════
// SwaraBase — the seven base symbols
// ════════════════════════════════════════════════════════════════════════════

/// One of the seven base scale-degree symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SwaraBase {
    Sa,
    Ri,
    Ga,
    Ma,
    Pa,
    Da,
    Ni,
}

impl SwaraBase {
    /// All seven symbols in scale order.
    pub const ALL: [SwaraBase; 7] = [
        SwaraBase::Sa,
        SwaraBase::Ri,
        SwaraBase::Ga,
        SwaraBase::Ma,
        SwaraBase::Pa,
        SwaraBase::Da,
        SwaraBase::Ni,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SwaraBase::Sa => "Sa",
            SwaraBase::Ri => "Ri",
            SwaraBase::Ga => "Ga",
            SwaraBase::Ma => "Ma",
            SwaraBase::Pa => "Pa",
            SwaraBase::Da => "Da",
            SwaraBase::Ni => "Ni",
        }
    }

    /// Number of marked variants this degree admits.
    /// Sa and Pa are fixed; Ma has two positions; the rest have three.
    pub fn variant_count(self) -> u8 {
        match self {
            SwaraBase::Sa | SwaraBase::Pa => 0,
            SwaraBase::Ma => 2,
            _ => 3,
        }
    }

    /// Parse an exact base-symbol name ("Sa" … "Ni").
    pub fn parse(s: &str) -> Option<SwaraBase> {
        SwaraBase::ALL.iter().copied().find(|b| b.as_str() == s)
    }
}

impl fmt::Display for SwaraBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Swara — one concrete swarasthana spelling
// ════════════════════════════════════════════════════════════════════════════

/// A concrete scale-degree spelling: base symbol plus variant index.
///
/// Variant 0 is the unmarked spelling (only Sa and Pa use it); variants
/// 1..=3 are the marked spellings Ri1…Ri3, Ga1…Ga3, Ma1/Ma2, Da1…Da3,
/// Ni1…Ni3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Swara {
    pub base:    SwaraBase,
    pub variant: u8,
}

impl Swara {
    pub const fn new(base: SwaraBase, variant: u8) -> Swara {
        Swara { base, variant }
    }

    /// Whether this spelling names one of the sixteen swarasthanas.
    pub fn is_valid(self) -> bool {
        let n = self.base.variant_count();
        if n == 0 {
            self.variant == 0
        } else {
            self.variant >= 1 && self.variant <= n
        }
    }

    /// Parse "Sa", "Ri1", "Ni3", … — exact spellings only.
    pub fn parse(s: &str) -> Option<Swara> {
        let (name, variant) = match s.as_bytes().last() {
            Some(d @ b'1'..=b'3') => (&s[..s.len() - 1], d - b'0'),
            _ => (s, 0),
        };
        let swara = Swara::new(SwaraBase::parse(name)?, variant);
        swara.is_valid().then_some(swara)
    }
}

impl fmt::Display for Swara {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variant == 0 {
            write!(f, "{}", self.base)
        } else {
            write!(f, "{}{}", self.base, self.variant)
        }
    }
}

// ── named constants for table literals ───────────────────────────────────────

pub const SA:  Swara = Swara::new(SwaraBase::Sa, 0);
pub const RI1: Swara = Swara::new(SwaraBase::Ri, 1);
pub const RI2: Swara = Swara::new(SwaraBase::Ri, 2);
pub const RI3: Swara = Swara::new(SwaraBase::Ri, 3);
pub const GA1: Swara = Swara::new(SwaraBase::Ga, 1);
pub const GA2: Swara = Swara::new(SwaraBase::Ga, 2);
pub const GA3: Swara = Swara::new(SwaraBase::Ga, 3);
pub const MA1: Swara = Swara::new(SwaraBase::Ma, 1);
pub const MA2: Swara = Swara::new(SwaraBase::Ma, 2);
pub const PA:  Swara = Swara::new(SwaraBase::Pa, 0);
pub const DA1: Swara = Swara::new(SwaraBase::Da, 1);
pub const DA2: Swara = Swara::new(SwaraBase::Da, 2);
pub const DA3: Swara = Swara::new(SwaraBase::Da, 3);
pub const NI1: Swara = Swara::new(SwaraBase::Ni, 1);
pub const NI2: Swara = Swara::new(SwaraBase::Ni, 2);
pub const NI3: Swara = Swara::new(SwaraBase::Ni, 3);

// ════════════════════════════════════════════════════════════════════════════
// Ratio table — just intonation relative to Sa
// ════════════════════════════════════════════════════════════════════════════

/// Frequency ratio of a swarasthana relative to Sa, or `None` for a
/// spelling that names no swarasthana.
///
/// Note the enharmonic overlaps (Ri2/Ga1, Ri3/Ga2, Da2/Ni1, Da3/Ni2):
/// distinct spellings, identical pitch.
pub fn ratio(swara: Swara) -> Option<f64> {
    let r = match (swara.base, swara.variant) {
        (SwaraBase::Sa, 0) => 1.0,
        (SwaraBase::Ri, 1) => 16.0 / 15.0,
        (SwaraBase::Ri, 2) => 9.0 / 8.0,
        (SwaraBase::Ri, 3) => 6.0 / 5.0,
        (SwaraBase::Ga, 1) => 9.0 / 8.0,
        (SwaraBase::Ga, 2) => 6.0 / 5.0,
        (SwaraBase::Ga, 3) => 5.0 / 4.0,
        (SwaraBase::Ma, 1) => 4.0 / 3.0,
        (SwaraBase::Ma, 2) => 45.0 / 32.0,
        (SwaraBase::Pa, 0) => 3.0 / 2.0,
        (SwaraBase::Da, 1) => 8.0 / 5.0,
        (SwaraBase::Da, 2) => 5.0 / 3.0,
        (SwaraBase::Da, 3) => 9.0 / 5.0,
        (SwaraBase::Ni, 1) => 5.0 / 3.0,
        (SwaraBase::Ni, 2) => 9.0 / 5.0,
        (SwaraBase::Ni, 3) => 15.0 / 8.0,
        _ => return None,
    };
    Some(r)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_round_trip() {
        for s in [SA, RI1, RI3, GA2, MA2, PA, DA1, NI3] {
            assert_eq!(Swara::parse(&s.to_string()), Some(s));
        }
    }

    #[test]
    fn base_recoverable_from_variant() {
        assert_eq!(RI1.base, SwaraBase::Ri);
        assert_eq!(NI3.base, SwaraBase::Ni);
        assert_eq!(Swara::parse("Ga2").unwrap().base, SwaraBase::Ga);
    }

    #[test]
    fn invalid_spellings_rejected() {
        assert_eq!(Swara::parse("Sa1"), None);
        assert_eq!(Swara::parse("Pa2"), None);
        assert_eq!(Swara::parse("Ma3"), None);
        assert_eq!(Swara::parse("Ri"), None);
        assert_eq!(Swara::parse("Xy"), None);
        assert_eq!(Swara::parse(""), None);
    }

    #[test]
    fn all_sixteen_swarasthanas_have_ratios() {
        let all = [
            SA, RI1, RI2, RI3, GA1, GA2, GA3, MA1, MA2, PA, DA1, DA2, DA3,
            NI1, NI2, NI3,
        ];
        for s in all {
            assert!(s.is_valid(), "{s} should be valid");
            assert!(ratio(s).is_some(), "{s} should have a ratio");
        }
    }

    #[test]
    fn ratio_rejects_invalid_spelling() {
        assert_eq!(ratio(Swara::new(SwaraBase::Sa, 1)), None);
        assert_eq!(ratio(Swara::new(SwaraBase::Ri, 0)), None);
    }

    #[test]
    fn ratios_ascend_within_a_scale() {
        // Sa Ri2 Ga3 Ma1 Pa Da2 Ni3 — a major scale must ascend strictly.
        let scale = [SA, RI2, GA3, MA1, PA, DA2, NI3];
        let rs: Vec<f64> = scale.iter().map(|&s| ratio(s).unwrap()).collect();
        assert!(rs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn enharmonic_overlaps() {
        assert_eq!(ratio(RI2), ratio(GA1));
        assert_eq!(ratio(DA3), ratio(NI2));
    }
}

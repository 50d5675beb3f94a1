//! Raga-aware scale-degree resolution.
//!
//! A gesture carries a base symbol ("Ga"); the active raga decides which
//! spelling of that degree — if any — actually sounds.  Both the audio
//! path and the UI highlight path consult this before acting, so a
//! degree the raga omits produces neither sound nor highlight.

use crate::swara::{Swara, SwaraBase};

/// The variant of `base` present in the given scale, or `None` when the
/// scale omits that degree entirely.  Pure and deterministic.
pub fn resolve(base: SwaraBase, swaras: &[Swara]) -> Option<Swara> {
    swaras.iter().copied().find(|s| s.base == base)
}

/// As [`resolve`], but accepts any spelling: the variant marker is
/// stripped before matching, so "Ga1" against a raga using Ga3 yields
/// Ga3.
pub fn resolve_swara(swara: Swara, swaras: &[Swara]) -> Option<Swara> {
    resolve(swara.base, swaras)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raga;
    use crate::swara::{GA2, GA3, SA};

    #[test]
    fn absent_degree_resolves_to_none() {
        let mohanam = raga("mohanam").unwrap();
        assert_eq!(resolve(SwaraBase::Ma, mohanam.swaras), None);
        assert_eq!(resolve(SwaraBase::Ni, mohanam.swaras), None);
    }

    #[test]
    fn present_degree_resolves_to_its_variant() {
        let kharaharapriya = raga("kharaharapriya").unwrap();
        assert_eq!(resolve(SwaraBase::Ga, kharaharapriya.swaras), Some(GA2));

        let kalyani = raga("kalyani").unwrap();
        assert_eq!(resolve(SwaraBase::Ga, kalyani.swaras), Some(GA3));
    }

    #[test]
    fn unmarked_degrees_resolve_to_themselves() {
        let maya = raga("mayamalavagowla").unwrap();
        assert_eq!(resolve(SwaraBase::Sa, maya.swaras), Some(SA));
    }

    #[test]
    fn variant_marker_is_stripped_before_matching() {
        let kalyani = raga("kalyani").unwrap();
        // Ga1 is not in Kalyani, but Ga resolves to the Ga3 it does use.
        assert_eq!(resolve_swara(crate::swara::GA1, kalyani.swaras), Some(GA3));
    }

    #[test]
    fn resolution_is_deterministic() {
        let maya = raga("mayamalavagowla").unwrap();
        let a = resolve(SwaraBase::Ni, maya.swaras);
        let b = resolve(SwaraBase::Ni, maya.swaras);
        assert_eq!(a, b);
    }
}

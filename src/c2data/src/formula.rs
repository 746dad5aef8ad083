//! Talent percent-per-level strategies
//!
//! # Unverified
//!
//! How `(scale, unknown, grade, effectCategory)` produce the in-game
//! per-level percentage was never fully worked out. [`LookupTableFormula`]
//! reproduces the five hand-checked reference talents and guesses for the
//! rest. Keep it behind [`PercentPerLevel`] and replace it wholesale once
//! new reference data exists; do not tune the table to fit single cases.

use crate::parsers::effect_type::EffectType;
use crate::parsers::talent::Talent;

/// Every talent levels up to the same cap
pub const MAX_TALENT_LEVEL: f64 = 25.0;

/// Computes a talent's per-level percentage from its effect type
pub trait PercentPerLevel: Send + Sync {
    /// `None` when the inputs cannot produce a value
    fn percent_per_level(&self, talent: &Talent, effect: Option<&EffectType>) -> Option<f64>;

    /// Percentage at [`MAX_TALENT_LEVEL`]; `None` when nothing accrues per level
    fn max_percent(&self, talent: &Talent, effect: Option<&EffectType>) -> Option<f64> {
        self.percent_per_level(talent, effect)
            .filter(|p| *p != 0.0)
            .map(|p| round2(p * MAX_TALENT_LEVEL))
    }
}

/// Static multipliers keyed on effect category, with a ratio fallback.
///
/// | category | grade | multiplier |
/// |---|---|---|
/// | 37 | 1 | 4 |
/// | 37 | 3 | 16 |
/// | 37 | other | 4 |
/// | 70 | any | 25 |
/// | 13 | any | 9 |
/// | 92 | any | 81 |
/// | other | any | `round(unknown / scale * grade)` |
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupTableFormula;

impl LookupTableFormula {
    fn multiplier(category: i64, grade: i64, scale: f64, unknown: f64) -> f64 {
        match (category, grade) {
            (37, 1) => 4.0,
            (37, 3) => 16.0,
            (37, _) => 4.0,
            (70, _) => 25.0,
            (13, _) => 9.0,
            (92, _) => 81.0,
            _ => (unknown / scale * grade as f64).round(),
        }
    }
}

impl PercentPerLevel for LookupTableFormula {
    fn percent_per_level(&self, talent: &Talent, effect: Option<&EffectType>) -> Option<f64> {
        let scale = effect?.scale;
        let unknown = talent.unknown;
        if scale == 0.0 || unknown == 0.0 {
            return None;
        }
        let multiplier = Self::multiplier(talent.effect_category, talent.grade, scale, unknown);
        Some(round2(scale / unknown * multiplier))
    }
}

/// Round to two decimals the way the game UI displays percentages
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! StatValue - The base/flat → increased → more container

use crate::modifier::EffectKind;
use serde::{Deserialize, Serialize};

/// Chained "more" multipliers, kept as individual terms
///
/// Terms are stored in sorted order so that two accumulators built from the
/// same effects in any order hold identical term lists and therefore produce
/// bit-identical products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoreMultipliers(Vec<f64>);

impl MoreMultipliers {
    /// Add one more% term (percent units, e.g. 20.0 for 20% more)
    pub fn push(&mut self, percent: f64) {
        let index = self
            .0
            .binary_search_by(|term| term.total_cmp(&percent))
            .unwrap_or_else(|i| i);
        self.0.insert(index, percent);
    }

    pub fn extend(&mut self, other: &MoreMultipliers) {
        for &term in &other.0 {
            self.push(term);
        }
    }

    /// Π(1 + more_i/100); terms below -100% clamp to zero
    pub fn product(&self) -> f64 {
        self.0.iter().map(|m| (1.0 + m / 100.0).max(0.0)).product()
    }

    pub fn terms(&self) -> &[f64] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Additive magnitudes, summed in sorted order
///
/// The total depends only on the multiset of terms, never on insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedSum(Vec<f64>);

impl SortedSum {
    /// Add `value` to a sum currently holding `total` and return the new sum
    ///
    /// If `total` was changed outside this accumulator, it becomes the single
    /// starting term.
    pub fn add(&mut self, total: f64, value: f64) -> f64 {
        if self.sum() != total {
            self.0.clear();
            if total != 0.0 {
                self.0.push(total);
            }
        }
        let index = self
            .0
            .binary_search_by(|term| term.total_cmp(&value))
            .unwrap_or_else(|i| i);
        self.0.insert(index, value);
        self.sum()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().fold(0.0, |acc, term| acc + term)
    }
}

/// A stat that follows the Base/Flat → Increased → More model
///
/// Final value is calculated as:
/// `(base + flat) × (1 + increased/100) × Π(1 + more/100)`
///
/// All magnitudes are kept in the units the modifier text uses (percent
/// points for increased/more).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatValue {
    /// Base value (from character/skill)
    pub base: f64,
    /// Sum of all flat additions
    pub flat: f64,
    /// Sum of all increased%
    pub increased: f64,
    /// More% terms, multiplied together
    pub more: MoreMultipliers,
    #[serde(skip)]
    base_terms: SortedSum,
    #[serde(skip)]
    flat_terms: SortedSum,
    #[serde(skip)]
    increased_terms: SortedSum,
}

impl PartialEq for StatValue {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
            && self.flat == other.flat
            && self.increased == other.increased
            && self.more == other.more
    }
}

impl StatValue {
    /// Create a new StatValue with the given base
    pub fn with_base(base: f64) -> Self {
        StatValue {
            base,
            ..Default::default()
        }
    }

    /// Calculate final value: (base + flat) × (1 + increased) × Π(1 + more)
    pub fn compute(&self) -> f64 {
        self.total_flat() * self.increased_multiplier() * self.more_multiplier()
    }

    /// Fold one magnitude in according to its composition class
    pub fn apply(&mut self, kind: EffectKind, value: f64) {
        match kind {
            EffectKind::Base => self.base = self.base_terms.add(self.base, value),
            EffectKind::Added => self.flat = self.flat_terms.add(self.flat, value),
            EffectKind::Increased => {
                self.increased = self.increased_terms.add(self.increased, value)
            }
            EffectKind::More => self.more.push(value),
        }
    }

    /// Combine two accumulators (sums add, more terms concatenate)
    pub fn merge(&mut self, other: &StatValue) {
        self.base = self.base_terms.add(self.base, other.base);
        self.flat = self.flat_terms.add(self.flat, other.flat);
        self.increased = self.increased_terms.add(self.increased, other.increased);
        self.more.extend(&other.more);
    }

    /// Same modifiers applied on top of a different base
    pub fn rebased(&self, base: f64) -> StatValue {
        StatValue {
            base,
            base_terms: SortedSum::default(),
            ..self.clone()
        }
    }

    /// Get the total flat value (base + flat additions)
    pub fn total_flat(&self) -> f64 {
        self.base + self.flat
    }

    /// 1 + Σincreased/100, never below zero
    pub fn increased_multiplier(&self) -> f64 {
        (1.0 + self.increased / 100.0).max(0.0)
    }

    pub fn more_multiplier(&self) -> f64 {
        self.more.product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_basic() {
        let stat = StatValue::with_base(100.0);
        assert!((stat.compute() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_compute_full_formula() {
        // (100 + 50) × (1 + 0.70) × (1.20 × 1.15) = 351.9
        let mut stat = StatValue::with_base(100.0);
        stat.apply(EffectKind::Added, 50.0);
        stat.apply(EffectKind::Increased, 40.0);
        stat.apply(EffectKind::Increased, 30.0);
        stat.apply(EffectKind::More, 20.0);
        stat.apply(EffectKind::More, 15.0);

        let expected = 150.0 * 1.70 * (1.20 * 1.15);
        assert!((stat.compute() - expected).abs() < 0.01);
    }

    #[test]
    fn test_two_increased_sum_to_twenty_percent() {
        let mut stat = StatValue::with_base(100.0);
        stat.apply(EffectKind::Increased, 10.0);
        stat.apply(EffectKind::Increased, 10.0);
        assert!((stat.increased_multiplier() - 1.20).abs() < 1e-12);
        assert!((stat.compute() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_more_chain_to_121() {
        let mut stat = StatValue::with_base(100.0);
        stat.apply(EffectKind::More, 10.0);
        stat.apply(EffectKind::More, 10.0);
        assert!((stat.more_multiplier() - 1.21).abs() < 1e-12);
        assert!((stat.compute() - 121.0).abs() < 1e-9);
    }

    #[test]
    fn test_more_terms_sorted() {
        let mut a = MoreMultipliers::default();
        a.push(30.0);
        a.push(-10.0);
        a.push(5.0);
        let mut b = MoreMultipliers::default();
        b.push(5.0);
        b.push(30.0);
        b.push(-10.0);
        assert_eq!(a, b);
        assert_eq!(a.terms(), &[-10.0, 5.0, 30.0]);
    }

    #[test]
    fn test_heavy_reductions_floor_at_zero() {
        let mut stat = StatValue::with_base(100.0);
        stat.apply(EffectKind::Increased, -150.0);
        assert_eq!(stat.compute(), 0.0);

        let mut stat = StatValue::with_base(100.0);
        stat.apply(EffectKind::More, -120.0);
        assert_eq!(stat.compute(), 0.0);
    }

    #[test]
    fn test_decimal_sums_ignore_order() {
        let values = [0.1, 0.2, 0.3, 1.7, -0.45];
        let mut forward = StatValue::default();
        for value in values {
            forward.apply(EffectKind::Added, value);
            forward.apply(EffectKind::Increased, value);
        }
        let mut reversed = StatValue::default();
        for value in values.iter().rev() {
            reversed.apply(EffectKind::Added, *value);
            reversed.apply(EffectKind::Increased, *value);
        }
        assert_eq!(forward.flat.to_bits(), reversed.flat.to_bits());
        assert_eq!(forward.increased.to_bits(), reversed.increased.to_bits());
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_direct_edits_survive_later_terms() {
        let mut stat = StatValue::with_base(100.0);
        stat.apply(EffectKind::Base, 5.0);
        assert!((stat.base - 105.0).abs() < 1e-12);

        stat.flat += 20.0;
        stat.apply(EffectKind::Added, 2.5);
        assert!((stat.flat - 22.5).abs() < 1e-12);

        let mut rebased = stat.rebased(10.0);
        rebased.apply(EffectKind::Base, 1.0);
        assert!((rebased.base - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_rebased_keeps_modifiers() {
        let mut stat = StatValue::default();
        stat.apply(EffectKind::Increased, 50.0);
        assert!((stat.rebased(10.0).compute() - 15.0).abs() < 1e-12);
    }
}

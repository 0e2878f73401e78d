//! Value rating (VR) of a single stat.

use super::{canonical::StatKey, entities::StatEffect, registry::RuneRegistry};

/// Fixed game-balance multiplier of the VR formula.
pub const VR_LEVEL_FACTOR: f64 = 0.0150;
/// Flat VR every positive stat with a rune contributes.
pub const VR_BASE: f64 = 1.0;
/// Carrying capacity is valued at a reduced density relative to its roll.
pub const PODS_DIVISOR: f64 = 2.5;

/// Magnitude after the stat-specific adjustments.
pub fn adjusted_magnitude(magnitude: f64, key: Option<StatKey>) -> f64 {
    let mut value = magnitude;
    if let Some(key) = key {
        if key.is_binary() && (0.0..=1.0).contains(&value) {
            value = 1.0;
        }
        if key.is_carrying_capacity() {
            value /= PODS_DIVISOR;
        }
    }
    value
}

/// VR for an adjusted magnitude. Non-positive magnitudes and stats without
/// density contribute nothing.
pub fn value_rating(adjusted: f64, density: f64, item_level: u32) -> f64 {
    if adjusted > 0.0 && density > 0.0 {
        adjusted * density * f64::from(item_level) * VR_LEVEL_FACTOR + VR_BASE
    } else {
        0.0
    }
}

/// VR of one stat of an item.
pub fn valuate(
    stat: &StatEffect,
    key: Option<StatKey>,
    item_level: u32,
    registry: &RuneRegistry,
) -> f64 {
    let density = key.map(|key| registry.density(key)).unwrap_or(0.0);
    value_rating(adjusted_magnitude(stat.magnitude(), key), density, item_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn strength_at_level_200() {
        let stat = StatEffect::passive("Strength", 50.0);
        let vr = valuate(&stat, Some(StatKey::Strength), 200, RuneRegistry::builtin());
        assert!(close(vr, 151.0), "{vr}");
    }

    #[test]
    fn pods_magnitude_is_reduced() {
        assert!(close(adjusted_magnitude(100.0, Some(StatKey::Pods)), 40.0));
        let vr = value_rating(40.0, 0.25, 100);
        assert!(close(vr, 16.0), "{vr}");
    }

    #[test]
    fn binary_stats_floor_to_one() {
        for key in [StatKey::Ap, StatKey::Mp, StatKey::Range, StatKey::Summons] {
            assert_eq!(adjusted_magnitude(0.0, Some(key)), 1.0);
            assert_eq!(adjusted_magnitude(0.4, Some(key)), 1.0);
            assert_eq!(adjusted_magnitude(2.0, Some(key)), 2.0);
            assert_eq!(adjusted_magnitude(-1.0, Some(key)), -1.0);
        }
        assert_eq!(adjusted_magnitude(0.0, Some(StatKey::Vitality)), 0.0);
    }

    #[test]
    fn non_positive_and_runeless_stats_are_worth_nothing() {
        let registry = RuneRegistry::builtin();
        let malus = StatEffect::passive("Wisdom", -20.0);
        assert_eq!(valuate(&malus, Some(StatKey::Wisdom), 150, registry), 0.0);

        let zero = StatEffect::passive("Vitality", 0.0);
        assert_eq!(valuate(&zero, Some(StatKey::Vitality), 150, registry), 0.0);

        let unknown = StatEffect::passive("Mystery", 30.0);
        assert_eq!(valuate(&unknown, None, 150, registry), 0.0);
    }

    #[test]
    fn vr_is_monotonic_in_magnitude_and_level() {
        let density = 3.0;
        let mut previous = 0.0;
        for magnitude in 0..60 {
            let vr = value_rating(magnitude as f64, density, 120);
            assert!(vr >= previous);
            previous = vr;
        }
        let mut previous = 0.0;
        for level in 1..=200 {
            let vr = value_rating(12.0, density, level);
            assert!(vr >= previous);
            previous = vr;
        }
    }
}

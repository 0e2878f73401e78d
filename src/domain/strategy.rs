//! Normal vs Focus extraction.
//!
//! Valuation runs in two phases. Phase one rates every passive stat and sums
//! the ratings; phase two turns ratings into rune counts. A Focus yield
//! depends on the item-wide VR total, so phase two never starts before phase
//! one has seen every stat.

use super::{
    canonical::{canonicalize, Canonical},
    entities::{Item, Locale, PriceTable, ProfitResult, StatEffect, StatValuation, Strategy},
    registry::RuneRegistry,
    valuation::{valuate, PODS_DIVISOR},
};

/// Share of every other stat's VR a Focus break keeps.
pub const FOCUS_REST_SHARE: f64 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct ScoredStat<'a> {
    pub stat: &'a StatEffect,
    pub canonical: Canonical,
    pub vr: f64,
}

/// Phase one output: per-stat VR plus the item total.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemVrs<'a> {
    pub entries: Vec<ScoredStat<'a>>,
    pub total_vr: f64,
}

impl<'a> ItemVrs<'a> {
    pub fn from_entries(entries: Vec<ScoredStat<'a>>) -> Self {
        let total_vr = entries.iter().map(|entry| entry.vr).sum();
        Self { entries, total_vr }
    }
}

/// Rates every passive stat of an item.
pub fn value_ratings<'a>(item: &'a Item, locale: Locale, registry: &RuneRegistry) -> ItemVrs<'a> {
    let level = item.level.max(1);
    let entries = item
        .passive_stats()
        .map(|stat| {
            let canonical = canonicalize(&stat.raw_name, locale);
            let vr = valuate(stat, canonical.key(), level, registry);
            ScoredStat {
                stat,
                canonical,
                vr,
            }
        })
        .collect();
    ItemVrs::from_entries(entries)
}

/// Full valuation of one item at a coefficient (percent) and item cost.
pub fn evaluate(
    item: &Item,
    locale: Locale,
    coefficient: f64,
    prices: &PriceTable,
    item_cost: f64,
    registry: &RuneRegistry,
) -> ProfitResult {
    let vrs = value_ratings(item, locale, registry);
    evaluate_with_vrs(&vrs, locale, coefficient, prices, item_cost, registry)
}

/// Phase two: rune counts and values for both strategies, then the better one.
pub fn evaluate_with_vrs(
    vrs: &ItemVrs<'_>,
    locale: Locale,
    coefficient: f64,
    prices: &PriceTable,
    item_cost: f64,
    registry: &RuneRegistry,
) -> ProfitResult {
    let scale = coefficient / 100.0;
    let mut breakdown = Vec::with_capacity(vrs.entries.len());
    let mut total_normal_value = 0.0;
    let mut best_focus: Option<(f64, &str)> = None;

    for entry in &vrs.entries {
        let Some(key) = entry.canonical.key() else {
            continue;
        };
        let Some(rune) = registry.lookup(key, locale) else {
            continue;
        };

        let price = prices.rune_price(rune.rune_name);
        let positive = entry.stat.magnitude() > 0.0;

        let (normal_count, focus_count) = if positive {
            let normal_vr = entry.vr * scale;
            let rest_vr = vrs.total_vr - entry.vr;
            let mut focus_vr = (entry.vr + FOCUS_REST_SHARE * rest_vr) * scale;
            if key.is_carrying_capacity() {
                focus_vr /= PODS_DIVISOR;
            }
            (normal_vr / rune.weight, focus_vr / rune.weight)
        } else {
            (0.0, 0.0)
        };

        let normal_value = normal_count * price;
        let focus_value = focus_count * price;
        total_normal_value += normal_value;

        if positive {
            let profit = focus_value - item_cost;
            if best_focus.map_or(true, |(best, _)| profit > best) {
                best_focus = Some((profit, entry.stat.raw_name.as_str()));
            }
        }

        breakdown.push(StatValuation {
            stat: entry.stat.raw_name.clone(),
            canonical_key: key.as_str().to_string(),
            rune_name: rune.rune_name.to_string(),
            rune_weight: rune.weight,
            density: rune.density,
            vr: entry.vr,
            normal_count,
            normal_value,
            focus_count,
            focus_value,
        });
    }

    let normal_profit = total_normal_value - item_cost;
    let best_focus_profit = best_focus.map(|(profit, _)| profit).unwrap_or(-item_cost);

    let (strategy, total_value, net_profit, best_focus_stat) = match best_focus {
        Some((profit, stat)) if profit > normal_profit => (
            Strategy::Focus,
            profit + item_cost,
            profit,
            Some(stat.to_string()),
        ),
        _ => (Strategy::Normal, total_normal_value, normal_profit, None),
    };

    ProfitResult {
        total_value,
        net_profit,
        strategy,
        best_focus_stat,
        best_focus_profit,
        normal_profit,
        item_cost,
        coefficient,
        total_vr: vrs.total_vr,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{canonical::StatKey, registry::RuneSpec};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn item(level: u32, stats: Vec<StatEffect>) -> Item {
        Item {
            id: 1,
            name: "Test".into(),
            level,
            item_type: "Ring".into(),
            image: None,
            stats,
            recipe: Vec::new(),
        }
    }

    fn unit_registry(keys: &[StatKey]) -> RuneRegistry {
        RuneRegistry::from_specs(
            keys.iter()
                .map(|key| {
                    let builtin = RuneRegistry::builtin().spec(*key).copied().unwrap();
                    RuneSpec {
                        density: 1.0,
                        weight: 1.0,
                        ..builtin
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn single_stat_focus_equals_normal() {
        let registry = unit_registry(&[StatKey::Strength]);
        let mut prices = PriceTable::default();
        prices.runes.insert("Str Rune".into(), 100.0);
        let item = item(200, vec![StatEffect::passive("+50 Strength", 50.0)]);

        let result = evaluate(&item, Locale::En, 100.0, &prices, 0.0, &registry);
        let line = &result.breakdown[0];
        assert!(close(line.vr, 151.0));
        assert!(close(line.normal_count, 151.0));
        assert!(close(line.normal_value, 15100.0));
        assert!(close(line.focus_value, line.normal_value));
        assert_eq!(result.strategy, Strategy::Normal);
        assert_eq!(result.best_focus_stat, None);
        assert!(close(result.total_value, 15100.0));
    }

    #[test]
    fn normal_beats_focus_when_value_is_spread() {
        let registry = unit_registry(&[StatKey::Strength, StatKey::Intelligence]);
        let strength = StatEffect::passive("Strength", 10.0);
        let intelligence = StatEffect::passive("Intelligence", 10.0);
        let vrs = ItemVrs::from_entries(vec![
            ScoredStat {
                stat: &strength,
                canonical: Canonical::Known(StatKey::Strength),
                vr: 100.0,
            },
            ScoredStat {
                stat: &intelligence,
                canonical: Canonical::Known(StatKey::Intelligence),
                vr: 50.0,
            },
        ]);
        let mut prices = PriceTable::default();
        prices.runes.insert("Str Rune".into(), 10.0);
        prices.runes.insert("Int Rune".into(), 10.0);

        let result = evaluate_with_vrs(&vrs, Locale::En, 100.0, &prices, 0.0, &registry);
        assert!(close(result.total_vr, 150.0));
        assert!(close(result.breakdown[0].focus_count, 125.0));
        assert!(close(result.breakdown[0].focus_value, 1250.0));
        assert!(close(result.best_focus_profit, 1250.0));
        assert!(close(result.normal_profit, 1500.0));
        assert_eq!(result.strategy, Strategy::Normal);
        assert!(close(result.total_value, 1500.0));
    }

    #[test]
    fn focus_wins_on_an_expensive_rune() {
        let registry = unit_registry(&[StatKey::Strength, StatKey::Intelligence]);
        let strength = StatEffect::passive("Strength", 10.0);
        let intelligence = StatEffect::passive("Intelligence", 10.0);
        let vrs = ItemVrs::from_entries(vec![
            ScoredStat {
                stat: &strength,
                canonical: Canonical::Known(StatKey::Strength),
                vr: 100.0,
            },
            ScoredStat {
                stat: &intelligence,
                canonical: Canonical::Known(StatKey::Intelligence),
                vr: 50.0,
            },
        ]);
        let mut prices = PriceTable::default();
        prices.runes.insert("Str Rune".into(), 10.0);
        prices.runes.insert("Int Rune".into(), 100.0);

        let result = evaluate_with_vrs(&vrs, Locale::En, 100.0, &prices, 2000.0, &registry);
        // Focus on Intelligence: (50 + 0.5 * 100) * 100 = 10000.
        // Normal: 100 * 10 + 50 * 100 = 6000.
        assert_eq!(result.strategy, Strategy::Focus);
        assert_eq!(result.best_focus_stat.as_deref(), Some("Intelligence"));
        assert!(close(result.total_value, 10000.0));
        assert!(close(result.net_profit, 8000.0));
        assert!(close(result.normal_profit, 4000.0));
    }

    #[test]
    fn coefficient_scales_every_yield() {
        let registry = RuneRegistry::builtin();
        let item = item(
            100,
            vec![
                StatEffect::passive("Vitality", 80.0),
                StatEffect::passive("Wisdom", 20.0),
            ],
        );
        let prices = PriceTable::default();
        let full = evaluate(&item, Locale::En, 100.0, &prices, 0.0, registry);
        let double = evaluate(&item, Locale::En, 200.0, &prices, 0.0, registry);
        for (a, b) in full.breakdown.iter().zip(&double.breakdown) {
            assert!(close(b.normal_count, a.normal_count * 2.0));
            assert!(close(b.focus_count, a.focus_count * 2.0));
        }
    }

    #[test]
    fn malus_stats_never_yield_or_focus() {
        let registry = RuneRegistry::builtin();
        let item = item(
            150,
            vec![
                StatEffect::passive("Wisdom", -30.0),
                StatEffect::passive("Vitality", 100.0),
            ],
        );
        let mut prices = PriceTable::default();
        prices.runes.insert("Wis Rune".into(), 100_000.0);
        prices.runes.insert("Vi Rune".into(), 1.0);

        let result = evaluate(&item, Locale::En, 100.0, &prices, 50.0, registry);
        let wisdom = &result.breakdown[0];
        assert_eq!(wisdom.vr, 0.0);
        assert_eq!(wisdom.normal_count, 0.0);
        assert_eq!(wisdom.focus_count, 0.0);
        assert_eq!(wisdom.focus_value, 0.0);
        // Vitality alone carries the item: 100 * 0.2 * 150 * 0.015 + 1 = 46.
        let vitality = &result.breakdown[1];
        assert!(close(result.total_vr, 46.0));
        assert!(close(vitality.focus_value, 46.0));
        assert!(close(result.best_focus_profit, vitality.focus_value - 50.0));
        assert!(close(result.normal_profit, -4.0));
        assert_eq!(result.strategy, Strategy::Normal);
        assert_eq!(result.best_focus_stat, None);
    }

    #[test]
    fn zero_binary_stat_feeds_focus_but_yields_nothing() {
        let registry = unit_registry(&[StatKey::Ap, StatKey::Vitality]);
        let item = item(
            100,
            vec![
                StatEffect::passive("AP", 0.0),
                StatEffect::passive("Vitality", 80.0),
            ],
        );
        let mut prices = PriceTable::default();
        prices.runes.insert("Ga AP Rune".into(), 1_000.0);
        prices.runes.insert("Vi Rune".into(), 1.0);

        let result = evaluate(&item, Locale::En, 100.0, &prices, 0.0, &registry);
        let ap = &result.breakdown[0];
        // The floor still rates AP: 1 * 100 * 0.015 + 1.
        assert!(close(ap.vr, 2.5));
        assert_eq!(ap.normal_count, 0.0);
        assert_eq!(ap.focus_count, 0.0);

        let vitality = &result.breakdown[1];
        assert!(close(vitality.vr, 121.0));
        assert!(close(vitality.focus_count, 121.0 + 0.5 * 2.5));
        assert_eq!(result.strategy, Strategy::Focus);
        assert_eq!(result.best_focus_stat.as_deref(), Some("Vitality"));
        assert!(close(result.best_focus_profit, 122.25));
    }

    #[test]
    fn no_positive_stat_means_focus_is_a_pure_loss() {
        let registry = RuneRegistry::builtin();
        let item = item(50, vec![StatEffect::passive("Strength", -10.0)]);
        let result = evaluate(&item, Locale::En, 100.0, &PriceTable::default(), 300.0, registry);
        assert_eq!(result.best_focus_profit, -300.0);
        assert_eq!(result.strategy, Strategy::Normal);
        assert_eq!(result.net_profit, -300.0);
        assert_eq!(result.total_value, 0.0);
    }

    #[test]
    fn pods_are_penalised_again_under_focus() {
        let registry = RuneRegistry::builtin();
        let item = item(100, vec![StatEffect::passive("Pods", 100.0)]);
        let mut prices = PriceTable::default();
        prices.runes.insert("Pod Rune".into(), 10.0);

        let result = evaluate(&item, Locale::En, 100.0, &prices, 0.0, registry);
        let pods = &result.breakdown[0];
        assert!(close(pods.vr, 16.0));
        assert!(close(pods.normal_count, 6.4));
        assert!(close(pods.focus_count, 16.0 / 2.5 / 2.5));
        assert_eq!(result.strategy, Strategy::Normal);
    }

    #[test]
    fn unknown_and_active_stats_are_skipped() {
        let registry = RuneRegistry::builtin();
        let mut stats = vec![
            StatEffect::passive("Strength", 40.0),
            StatEffect::passive("Mystery Aura", 40.0),
        ];
        stats.push(StatEffect {
            is_active: true,
            ..StatEffect::passive("Neutral damage", 30.0)
        });
        let item = item(120, stats);

        let result = evaluate(&item, Locale::En, 100.0, &PriceTable::default(), 0.0, registry);
        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.breakdown[0].canonical_key, "Strength");
        assert_eq!(result.breakdown[0].normal_value, 0.0);
        assert!(close(result.total_vr, result.breakdown[0].vr));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let registry = RuneRegistry::builtin();
        let item = item(
            187,
            vec![
                StatEffect::passive("Agility", 61.0),
                StatEffect::passive("Vitality", 301.0),
                StatEffect::passive("AP", 1.0),
                StatEffect::passive("% Air Resistance", 7.0),
            ],
        );
        let mut prices = PriceTable::default();
        for name in registry.rune_names(Locale::En) {
            prices.runes.insert(name.to_string(), 37.0);
        }
        let first = evaluate(&item, Locale::En, 135.0, &prices, 12_000.0, registry);
        let second = evaluate(&item, Locale::En, 135.0, &prices, 12_000.0, registry);
        assert_eq!(first, second);
        assert_eq!(first.total_value.to_bits(), second.total_value.to_bits());
    }
}

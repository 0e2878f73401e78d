//! Catalog-wide profitability ranking.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    entities::{CatalogItem, Locale, PriceTable, RankedItem, RankingPage},
    registry::RuneRegistry,
    strategy::evaluate,
};

/// Coefficient every catalog item is compared at.
pub const REFERENCE_COEFFICIENT: f64 = 100.0;
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankSort {
    #[default]
    Profit,
    Coefficient,
    Level,
    CraftCost,
    Value,
    Name,
}

impl RankSort {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Profit => "Profit",
            Self::Coefficient => "Min coefficient",
            Self::Level => "Level",
            Self::CraftCost => "Craft cost",
            Self::Value => "Value",
            Self::Name => "Name",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filters, sort and page of one ranking request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingQuery {
    /// Item type names to keep. Empty keeps every type.
    pub types: Vec<String>,
    pub min_level: Option<u32>,
    pub max_level: Option<u32>,
    pub min_profit: Option<f64>,
    pub min_craft_cost: Option<f64>,
    pub page: usize,
    pub page_size: usize,
    pub sort: RankSort,
    pub order: SortOrder,
}

impl Default for RankingQuery {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            min_level: None,
            max_level: None,
            min_profit: None,
            min_craft_cost: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: RankSort::default(),
            order: SortOrder::default(),
        }
    }
}

impl RankingQuery {
    /// Catalog filter, applied before any pricing.
    pub fn matches(&self, entry: &CatalogItem) -> bool {
        let item = &entry.item;
        if !self.types.is_empty()
            && !self
                .types
                .iter()
                .any(|kind| kind.eq_ignore_ascii_case(&item.item_type))
        {
            return false;
        }
        if let Some(min) = self.min_level {
            if item.level < min {
                return false;
            }
        }
        if let Some(max) = self.max_level {
            if item.level > max {
                return false;
            }
        }
        true
    }

    fn passes_thresholds(&self, ranked: &RankedItem) -> bool {
        if let Some(min) = self.min_profit {
            if ranked.profit < min {
                return false;
            }
        }
        if let Some(min) = self.min_craft_cost {
            if ranked.craft_cost < min {
                return false;
            }
        }
        true
    }
}

/// Values a single catalog entry at the reference coefficient. `None` when
/// the item cannot be crafted or yields nothing.
pub fn rank_item(
    entry: &CatalogItem,
    prices: &PriceTable,
    locale: Locale,
    registry: &RuneRegistry,
) -> Option<RankedItem> {
    let item = &entry.item;
    let Some(craft_cost) = prices.craft_cost(&item.recipe) else {
        debug!(item = item.id, name = %item.name, "skipping item without a craftable recipe");
        return None;
    };

    let result = evaluate(item, locale, REFERENCE_COEFFICIENT, prices, craft_cost, registry);
    if result.total_value == 0.0 {
        debug!(item = item.id, name = %item.name, "skipping item with no rune value");
        return None;
    }

    Some(RankedItem {
        id: item.id,
        name: item.name.clone(),
        image: item.image.clone(),
        level: item.level,
        item_type: item.item_type.clone(),
        min_coefficient: craft_cost / result.total_value * 100.0,
        craft_cost,
        estimated_value: result.total_value,
        profit: result.total_value - craft_cost,
        strategy: result.strategy,
        last_coefficient: entry.last_coefficient,
    })
}

/// Ranks a catalog against one price snapshot.
pub fn rank(
    catalog: &[CatalogItem],
    prices: &PriceTable,
    locale: Locale,
    query: &RankingQuery,
    registry: &RuneRegistry,
) -> RankingPage {
    let mut ranked: Vec<RankedItem> = catalog
        .par_iter()
        .filter(|entry| query.matches(entry))
        .filter_map(|entry| rank_item(entry, prices, locale, registry))
        .filter(|ranked| query.passes_thresholds(ranked))
        .collect();

    sort_ranked(&mut ranked, query.sort, query.order);
    debug!(
        catalog = catalog.len(),
        ranked = ranked.len(),
        sort = query.sort.label(),
        "ranking complete"
    );
    paginate(ranked, query.page, query.page_size)
}

/// Stable sort; equal keys keep their previous relative order.
pub fn sort_ranked(items: &mut [RankedItem], sort: RankSort, order: SortOrder) {
    items.sort_by(|a, b| {
        let ord = match sort {
            RankSort::Profit => a.profit.partial_cmp(&b.profit).unwrap_or(Ordering::Equal),
            RankSort::Coefficient => a
                .min_coefficient
                .partial_cmp(&b.min_coefficient)
                .unwrap_or(Ordering::Equal),
            RankSort::Level => a.level.cmp(&b.level),
            RankSort::CraftCost => a
                .craft_cost
                .partial_cmp(&b.craft_cost)
                .unwrap_or(Ordering::Equal),
            RankSort::Value => a
                .estimated_value
                .partial_cmp(&b.estimated_value)
                .unwrap_or(Ordering::Equal),
            RankSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        };
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

/// 1-indexed page of an already sorted list.
pub fn paginate(items: Vec<RankedItem>, page: usize, page_size: usize) -> RankingPage {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);
    let items = items.into_iter().skip(start).take(page_size).collect();
    RankingPage {
        items,
        total,
        page,
        page_size,
        total_pages,
    }
}

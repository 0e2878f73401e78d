use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Identifier for items and ingredients returned by the catalog API.
pub type ItemId = u64;

/// Game client language. Stat labels and rune names depend on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
    Fr,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Es, Locale::En, Locale::Fr];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" => Ok(Locale::Es),
            "en" => Ok(Locale::En),
            "fr" => Ok(Locale::Fr),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

/// One effect line of an item as reported by the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatEffect {
    pub raw_name: String,
    pub min_value: f64,
    pub max_value: f64,
    pub display_value: f64,
    /// Active effects (weapon hits) never produce runes.
    #[serde(default)]
    pub is_active: bool,
}

impl StatEffect {
    /// Builds an effect from a catalog range. A zero bound mirrors the other
    /// one, and the displayed value is the truncated average.
    pub fn from_range(raw_name: impl Into<String>, min: f64, max: f64, is_active: bool) -> Self {
        let (mut min_value, mut max_value) = (min, max);
        if max_value == 0.0 && min_value != 0.0 {
            max_value = min_value;
        }
        if min_value == 0.0 && max_value != 0.0 {
            min_value = max_value;
        }
        Self {
            raw_name: raw_name.into(),
            min_value,
            max_value,
            display_value: ((min_value + max_value) / 2.0).trunc(),
            is_active,
        }
    }

    pub fn passive(raw_name: impl Into<String>, value: f64) -> Self {
        Self {
            raw_name: raw_name.into(),
            min_value: value,
            max_value: value,
            display_value: value,
            is_active: false,
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.display_value
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeEntry {
    pub ingredient_id: ItemId,
    pub quantity: u32,
    /// Catalog family the ingredient lives in (`resources`, `equipment`, ...).
    #[serde(default)]
    pub subtype: Option<String>,
}

impl RecipeEntry {
    pub fn new(ingredient_id: ItemId, quantity: u32) -> Self {
        Self {
            ingredient_id,
            quantity,
            subtype: None,
        }
    }
}

/// Recipe ingredient as described by the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    pub level: u32,
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub image: Option<String>,
    pub stats: Vec<StatEffect>,
    #[serde(default)]
    pub recipe: Vec<RecipeEntry>,
}

impl Item {
    /// Effects that can be broken into runes.
    pub fn passive_stats(&self) -> impl Iterator<Item = &StatEffect> {
        self.stats.iter().filter(|stat| !stat.is_active)
    }
}

/// A catalog entry together with data owned by other collaborators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(flatten)]
    pub item: Item,
    /// Last coefficient observed on the market. Display only.
    #[serde(default)]
    pub last_coefficient: Option<f64>,
}

impl From<Item> for CatalogItem {
    fn from(item: Item) -> Self {
        Self {
            item,
            last_coefficient: None,
        }
    }
}

/// Resolved price of a recipe ingredient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IngredientPrice {
    Known(f64),
    Unavailable,
}

/// Price snapshot for one server and locale.
///
/// A negative price (`-1` in stored data) marks an entry as unavailable.
/// Zero or missing entries are unknown and count as zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    #[serde(default)]
    pub runes: HashMap<String, f64>,
    #[serde(default)]
    pub ingredients: HashMap<ItemId, f64>,
}

pub const UNAVAILABLE_PRICE: f64 = -1.0;

impl PriceTable {
    /// Sell price of a rune. Runes nobody buys are worth nothing.
    pub fn rune_price(&self, rune_name: &str) -> f64 {
        match self.runes.get(rune_name).copied() {
            Some(price) if price.is_finite() && price > 0.0 => price,
            _ => 0.0,
        }
    }

    pub fn ingredient_price(&self, ingredient_id: ItemId) -> IngredientPrice {
        match self.ingredients.get(&ingredient_id).copied() {
            Some(price) if price < 0.0 => IngredientPrice::Unavailable,
            Some(price) if price.is_finite() => IngredientPrice::Known(price),
            _ => IngredientPrice::Known(0.0),
        }
    }

    /// Total ingredient cost of a recipe, or `None` when the item cannot be
    /// crafted (empty recipe or an unavailable ingredient).
    pub fn craft_cost(&self, recipe: &[RecipeEntry]) -> Option<f64> {
        if recipe.is_empty() {
            return None;
        }
        recipe.iter().try_fold(0.0, |total, entry| {
            match self.ingredient_price(entry.ingredient_id) {
                IngredientPrice::Known(price) => Some(total + price * entry.quantity as f64),
                IngredientPrice::Unavailable => None,
            }
        })
    }
}

/// Extraction mode chosen when breaking an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    Normal,
    Focus,
}

/// Per-stat line of a valuation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatValuation {
    pub stat: String,
    pub canonical_key: String,
    pub rune_name: String,
    pub rune_weight: f64,
    pub density: f64,
    pub vr: f64,
    pub normal_count: f64,
    pub normal_value: f64,
    pub focus_count: f64,
    pub focus_value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfitResult {
    pub total_value: f64,
    pub net_profit: f64,
    pub strategy: Strategy,
    pub best_focus_stat: Option<String>,
    pub best_focus_profit: f64,
    pub normal_profit: f64,
    pub item_cost: f64,
    pub coefficient: f64,
    pub total_vr: f64,
    pub breakdown: Vec<StatValuation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    pub id: ItemId,
    pub name: String,
    pub image: Option<String>,
    pub level: u32,
    pub item_type: String,
    /// Break-even coefficient in percent.
    pub min_coefficient: f64,
    pub craft_cost: f64,
    pub estimated_value: f64,
    pub profit: f64,
    pub strategy: Strategy,
    pub last_coefficient: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingPage {
    pub items: Vec<RankedItem>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_mirrors_missing_bound_and_truncates() {
        let stat = StatEffect::from_range("Vitality", 0.0, 41.0, false);
        assert_eq!(stat.min_value, 41.0);
        assert_eq!(stat.display_value, 41.0);

        let stat = StatEffect::from_range("Vitality", 30.0, 41.0, false);
        assert_eq!(stat.display_value, 35.0);

        let stat = StatEffect::from_range("AP", 1.0, 0.0, false);
        assert_eq!(stat.max_value, 1.0);
        assert_eq!(stat.display_value, 1.0);
    }

    #[test]
    fn negative_ranges_truncate_toward_zero() {
        let stat = StatEffect::from_range("Wisdom", -5.0, -10.0, false);
        assert_eq!(stat.display_value, -7.0);
    }

    #[test]
    fn price_sentinels() {
        let mut prices = PriceTable::default();
        prices.runes.insert("Rune Fo".into(), 120.0);
        prices.runes.insert("Rune Vi".into(), UNAVAILABLE_PRICE);
        prices.ingredients.insert(1, 50.0);
        prices.ingredients.insert(2, UNAVAILABLE_PRICE);
        prices.ingredients.insert(3, 0.0);

        assert_eq!(prices.rune_price("Rune Fo"), 120.0);
        assert_eq!(prices.rune_price("Rune Vi"), 0.0);
        assert_eq!(prices.rune_price("Rune Sa"), 0.0);

        assert_eq!(prices.ingredient_price(1), IngredientPrice::Known(50.0));
        assert_eq!(prices.ingredient_price(2), IngredientPrice::Unavailable);
        assert_eq!(prices.ingredient_price(3), IngredientPrice::Known(0.0));
        assert_eq!(prices.ingredient_price(99), IngredientPrice::Known(0.0));
    }

    #[test]
    fn craft_cost_rules() {
        let mut prices = PriceTable::default();
        prices.ingredients.insert(1, 50.0);
        prices.ingredients.insert(2, UNAVAILABLE_PRICE);

        let recipe = vec![RecipeEntry::new(1, 3), RecipeEntry::new(7, 10)];
        assert_eq!(prices.craft_cost(&recipe), Some(150.0));

        let blocked = vec![RecipeEntry::new(1, 3), RecipeEntry::new(2, 1)];
        assert_eq!(prices.craft_cost(&blocked), None);
        assert_eq!(prices.craft_cost(&[]), None);
    }

    #[test]
    fn locale_parsing() {
        assert_eq!("FR".parse::<Locale>(), Ok(Locale::Fr));
        assert_eq!(" en ".parse::<Locale>(), Ok(Locale::En));
        assert!("de".parse::<Locale>().is_err());
    }
}

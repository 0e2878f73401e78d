//! Rune-break valuation: stat canonicalization, value ratings, extraction
//! strategies and catalog ranking.

pub mod canonical;
pub mod entities;
pub mod ranking;
pub mod registry;
pub mod rules;
pub mod strategy;
pub mod valuation;

pub use canonical::{canonicalize, Canonical, StatKey};
pub use entities::{
    CatalogItem, Ingredient, IngredientPrice, Item, ItemId, Locale, PriceTable, ProfitResult,
    RankedItem, RankingPage, RecipeEntry, StatEffect, StatValuation, Strategy, UnknownLocale,
    UNAVAILABLE_PRICE,
};
pub use ranking::{rank, rank_item, RankSort, RankingQuery, SortOrder};
pub use registry::{RegistryError, RuneInfo, RuneRegistry, RuneSpec};
pub use strategy::{evaluate, evaluate_with_vrs, value_ratings, ItemVrs, ScoredStat};
pub use valuation::valuate;

//! Collaborators around the valuation core: catalog API, fan-out and caching.

pub mod cache;
pub mod dofusdude;
pub mod fanout;

pub use cache::ImageCache;
pub use dofusdude::{CatalogClient, CatalogError, RuneImageResolver};
pub use fanout::{Fanout, RetryPolicy};

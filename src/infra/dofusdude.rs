//! Asynchronous client for the dofusdude item catalog (Dofus 3 API v1).
//!
//! - Equipment catalog pages, recipe ingredient details and rune image search.
//! - Every request goes through the retry policy; only HTTP 429 is retried.
//! - Bulk lookups are bounded by the shared [`Fanout`].

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
    time::Duration,
};

use reqwest::{Client, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::domain::{Ingredient, Item, ItemId, Locale, RecipeEntry, StatEffect};
use crate::infra::{
    cache::ImageCache,
    fanout::{Fanout, RetryPolicy},
};
use crate::util::version::user_agent;

pub const DEFAULT_BASE_URL: &str = "https://api.dofusdu.de/dofus3/v1/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Pseudo type whose slug is not reliable across languages.
const BACKPACK_TYPE: &str = "backpack";
const BACKPACK_TYPE_ID: u32 = 102;
const RUNE_SEARCH_LIMIT: u32 = 8;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate limited by {url}")]
    RateLimited { url: String },
    #[error("{url} answered {status}")]
    Status { status: u16, url: String },
}

impl CatalogError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Which slice of the equipment catalog one request covers.
#[derive(Clone, Debug, PartialEq, Eq)]
enum TypeFilter {
    Any,
    Slugs(Vec<String>),
    TypeId(u32),
}

#[derive(Clone, Debug)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
    retry: RetryPolicy,
    fanout: Fanout,
}

impl CatalogClient {
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url(base: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let mut base = base.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        let http = Client::builder()
            .user_agent(user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            retry: RetryPolicy::default(),
            fanout: Fanout::default(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CatalogError> {
        Ok(Self::with_base_url(&settings.api_base_url, settings.request_timeout())?
            .with_retry(settings.retry_policy())
            .with_fanout(Fanout::new(settings.lookup_concurrency)))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_fanout(mut self, fanout: Fanout) -> Self {
        self.fanout = fanout;
        self
    }

    pub fn fanout(&self) -> &Fanout {
        &self.fanout
    }

    /// Equipment in a level range, optionally restricted to type slugs.
    /// A failed request is logged and contributes no items.
    pub async fn fetch_equipment(
        &self,
        locale: Locale,
        types: &[String],
        min_level: u32,
        max_level: u32,
    ) -> Vec<Item> {
        let mut items = Vec::new();
        for filter in type_filters(types) {
            let url = match self.equipment_url(locale, &filter, min_level, max_level) {
                Ok(url) => url,
                Err(err) => {
                    warn!(error = %err, "cannot build equipment URL");
                    continue;
                }
            };
            match self.get_with_retry::<ListBody<EquipmentDto>>(url).await {
                Ok(body) => {
                    let fetched = body.into_items();
                    debug!(?filter, count = fetched.len(), "fetched equipment page");
                    items.extend(fetched.into_iter().map(Item::from));
                }
                Err(err) => warn!(?filter, error = %err, "equipment request failed"),
            }
        }
        info!(count = items.len(), locale = %locale, "equipment catalog fetched");
        items
    }

    /// Details of one recipe ingredient. Falls back to the resources endpoint
    /// once when the guessed family answers with an error other than 429.
    pub async fn fetch_ingredient(
        &self,
        locale: Locale,
        id: ItemId,
        subtype: Option<&str>,
    ) -> Option<Ingredient> {
        let family = subtype_path(subtype);
        let primary = match self.item_url(locale, family, id) {
            Ok(url) => url,
            Err(err) => {
                warn!(id, error = %err, "cannot build ingredient URL");
                return None;
            }
        };

        let fallback_family = match self.get_with_retry::<EquipmentDto>(primary).await {
            Ok(dto) => return Some(dto.into()),
            Err(err) => match fallback_for(family, &err) {
                Some(next) => {
                    debug!(id, family, error = %err, "retrying ingredient as a resource");
                    next
                }
                None => {
                    warn!(id, family, error = %err, "ingredient lookup failed");
                    return None;
                }
            },
        };

        let fallback = self.item_url(locale, fallback_family, id).ok()?;
        match self.get_with_retry::<EquipmentDto>(fallback).await {
            Ok(dto) => Some(dto.into()),
            Err(err) => {
                warn!(id, error = %err, "ingredient lookup failed after fallback");
                None
            }
        }
    }

    /// Every distinct ingredient used by `items`, sorted by name. Lookups that
    /// fail are dropped.
    pub async fn ingredients_for(&self, locale: Locale, items: &[Item]) -> Vec<Ingredient> {
        let mut wanted: HashMap<ItemId, Option<String>> = HashMap::new();
        for entry in items.iter().flat_map(|item| item.recipe.iter()) {
            wanted
                .entry(entry.ingredient_id)
                .or_insert_with(|| entry.subtype.clone());
        }
        if wanted.is_empty() {
            return Vec::new();
        }

        let mut requests: Vec<_> = wanted.into_iter().collect();
        requests.sort_by_key(|(id, _)| *id);
        let requested = requests.len();

        let mut ingredients: Vec<Ingredient> = self
            .fanout
            .run_all(requests, |(id, subtype)| {
                let client = self.clone();
                async move { client.fetch_ingredient(locale, id, subtype.as_deref()).await }
            })
            .await
            .into_iter()
            .flatten()
            .collect();

        ingredients.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        info!(requested, resolved = ingredients.len(), "ingredient details fetched");
        ingredients
    }

    /// Image of the first resource whose name matches `rune_name`.
    pub async fn search_rune_image(
        &self,
        locale: Locale,
        rune_name: &str,
    ) -> Result<Option<String>, CatalogError> {
        let url = self.rune_search_url(locale, rune_name)?;
        let hits = self.get_with_retry::<Vec<SearchHitDto>>(url).await?;
        Ok(hits
            .into_iter()
            .next()
            .and_then(|hit| hit.image_urls.and_then(ImageUrlsDto::best)))
    }

    async fn get_with_retry<T>(&self, url: Url) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
    {
        self.retry
            .run(|| self.fetch_data(url.clone()), CatalogError::is_rate_limited)
            .await
    }

    async fn fetch_data<T>(&self, url: Url) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
    {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimited { url: url.to_string() });
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    fn equipment_url(
        &self,
        locale: Locale,
        filter: &TypeFilter,
        min_level: u32,
        max_level: u32,
    ) -> Result<Url, url::ParseError> {
        let mut url = self.url(&format!("{}/items/equipment/all", locale.code()))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("filter[min_level]", &min_level.to_string())
                .append_pair("filter[max_level]", &max_level.to_string());
            match filter {
                TypeFilter::Any => {}
                TypeFilter::Slugs(slugs) => {
                    query.append_pair("filter[type.name_id]", &slugs.join(","));
                }
                TypeFilter::TypeId(id) => {
                    query.append_pair("filter[type.id]", &id.to_string());
                }
            }
            query
                .append_pair("page[size]", "-1")
                .append_pair("sort[level]", "desc");
        }
        Ok(url)
    }

    fn item_url(&self, locale: Locale, family: &str, id: ItemId) -> Result<Url, url::ParseError> {
        self.url(&format!("{}/items/{family}/{id}", locale.code()))
    }

    fn rune_search_url(&self, locale: Locale, rune_name: &str) -> Result<Url, url::ParseError> {
        let mut url = self.url(&format!("{}/items/resources/search", locale.code()))?;
        url.query_pairs_mut()
            .append_pair("query", rune_name)
            .append_pair("filter[min_level]", "1")
            .append_pair("filter[max_level]", "200")
            .append_pair("limit", &RUNE_SEARCH_LIMIT.to_string());
        Ok(url)
    }
}

const RESOURCES: &str = "resources";

/// Requests needed to cover `types`. No types means the whole catalog;
/// backpacks always get their own request by type id.
fn type_filters(types: &[String]) -> Vec<TypeFilter> {
    let mut slugs: Vec<String> = types.iter().map(|kind| kind.to_lowercase()).collect();
    let wants_backpack = slugs.iter().any(|slug| slug == BACKPACK_TYPE);
    slugs.retain(|slug| slug != BACKPACK_TYPE);

    let mut filters = Vec::new();
    if !slugs.is_empty() {
        filters.push(TypeFilter::Slugs(slugs));
    } else if !wants_backpack {
        filters.push(TypeFilter::Any);
    }
    if wants_backpack {
        filters.push(TypeFilter::TypeId(BACKPACK_TYPE_ID));
    }
    filters
}

/// Second endpoint family to try after `family` failed with `err`, if any.
/// A 429 is never retried elsewhere and resources have no fallback.
fn fallback_for(family: &str, err: &CatalogError) -> Option<&'static str> {
    if err.is_rate_limited() || family == RESOURCES {
        None
    } else {
        Some(RESOURCES)
    }
}

/// Endpoint family for a recipe ingredient's subtype.
fn subtype_path(subtype: Option<&str>) -> &'static str {
    match subtype {
        Some("equipment") | Some("weapons") => "equipment",
        Some("consumables") => "consumables",
        _ => RESOURCES,
    }
}

/// Resolves rune names to image URLs through an [`ImageCache`].
#[derive(Clone)]
pub struct RuneImageResolver {
    client: CatalogClient,
    cache: Arc<ImageCache>,
}

impl RuneImageResolver {
    pub fn new(client: CatalogClient, cache: Arc<ImageCache>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &Arc<ImageCache> {
        &self.cache
    }

    /// Image per distinct rune name. Failed lookups map to `None` and are
    /// not cached, so a later call tries again.
    pub async fn resolve<I, S>(
        &self,
        locale: Locale,
        rune_names: I,
    ) -> HashMap<String, Option<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = rune_names.into_iter().map(Into::into).collect();
        let mut images = HashMap::with_capacity(names.len());
        let mut misses = Vec::new();
        for name in names {
            match self.cache.get(&name).await {
                Some(image) => {
                    images.insert(name, image);
                }
                None => misses.push(name),
            }
        }
        if misses.is_empty() {
            return images;
        }

        debug!(misses = misses.len(), "resolving rune images");
        let resolved = self
            .client
            .fanout()
            .run_all(misses, |name| {
                let client = self.client.clone();
                let cache = Arc::clone(&self.cache);
                async move {
                    match client.search_rune_image(locale, &name).await {
                        Ok(image) => {
                            cache.insert(&name, image.clone()).await;
                            (name, image)
                        }
                        Err(err) => {
                            warn!(rune = %name, error = %err, "rune image lookup failed");
                            (name, None)
                        }
                    }
                }
            })
            .await;
        images.extend(resolved);
        images
    }
}

/// List endpoints answer either with a bare array or `{ "items": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    List(Vec<T>),
    Wrapped { items: Vec<T> },
}

impl<T> ListBody<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            Self::List(items) | Self::Wrapped { items } => items,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ImageUrlsDto {
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    sd: Option<String>,
}

impl ImageUrlsDto {
    fn best(self) -> Option<String> {
        self.icon.or(self.sd)
    }
}

#[derive(Debug, Default, Deserialize)]
struct TypeDto {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct EffectTypeDto {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_active: bool,
}

#[derive(Debug, Deserialize)]
struct EffectDto {
    #[serde(default)]
    int_minimum: f64,
    #[serde(default)]
    int_maximum: f64,
    #[serde(rename = "type")]
    effect_type: Option<EffectTypeDto>,
}

#[derive(Debug, Deserialize)]
struct RecipeDto {
    item_ankama_id: ItemId,
    #[serde(default = "default_quantity")]
    quantity: u32,
    #[serde(default)]
    item_subtype: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct EquipmentDto {
    ankama_id: ItemId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    level: u32,
    #[serde(default, rename = "type")]
    item_type: Option<TypeDto>,
    #[serde(default)]
    image_urls: Option<ImageUrlsDto>,
    #[serde(default)]
    effects: Option<Vec<EffectDto>>,
    #[serde(default)]
    recipe: Option<Vec<RecipeDto>>,
}

#[derive(Debug, Deserialize)]
struct SearchHitDto {
    #[serde(default)]
    image_urls: Option<ImageUrlsDto>,
}

impl EffectDto {
    /// Effects without a type name carry nothing to value.
    fn into_stat(self) -> Option<StatEffect> {
        let effect_type = self.effect_type?;
        let name = effect_type.name.filter(|name| !name.trim().is_empty())?;
        Some(StatEffect::from_range(
            name,
            self.int_minimum,
            self.int_maximum,
            effect_type.is_active,
        ))
    }
}

impl From<RecipeDto> for RecipeEntry {
    fn from(dto: RecipeDto) -> Self {
        Self {
            ingredient_id: dto.item_ankama_id,
            quantity: dto.quantity,
            subtype: dto.item_subtype,
        }
    }
}

impl From<EquipmentDto> for Item {
    fn from(dto: EquipmentDto) -> Self {
        Self {
            id: dto.ankama_id,
            name: dto.name,
            level: dto.level.max(1),
            item_type: dto.item_type.map(|kind| kind.name).unwrap_or_default(),
            image: dto.image_urls.and_then(ImageUrlsDto::best),
            stats: dto
                .effects
                .unwrap_or_default()
                .into_iter()
                .filter_map(EffectDto::into_stat)
                .collect(),
            recipe: dto
                .recipe
                .unwrap_or_default()
                .into_iter()
                .map(RecipeEntry::from)
                .collect(),
        }
    }
}

impl From<EquipmentDto> for Ingredient {
    fn from(dto: EquipmentDto) -> Self {
        Self {
            id: dto.ankama_id,
            name: dto.name,
            level: dto.level,
            item_type: dto.item_type.map(|kind| kind.name).unwrap_or_default(),
            image: dto.image_urls.and_then(ImageUrlsDto::best),
        }
    }
}

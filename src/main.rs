use std::{
    collections::{BTreeSet, HashMap},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rune_break_scanner::{
    config::Settings,
    domain::{
        evaluate, rank, CatalogItem, Item, ItemId, Locale, PriceTable, ProfitResult, RankSort,
        RankingQuery, RuneRegistry, SortOrder,
    },
    infra::{cache, CatalogClient, ImageCache, RuneImageResolver},
    util::{
        persistence::{self, default_catalog_path, default_prices_path},
        version::{version_label, APP_NAME},
    },
};

#[derive(Parser)]
#[command(name = "rune-break")]
#[command(about = "Rune breakdown valuation and craft profitability ranking", long_about = None)]
#[command(version)]
struct Cli {
    /// Game language for stat labels and rune names (es, en, fr)
    #[arg(short, long, global = true)]
    locale: Option<Locale>,

    /// Log filter when RUST_LOG is not set (e.g. "debug")
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Catalog API base URL
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Value one item at a given coefficient
    Value(ValueArgs),

    /// Rank a catalog snapshot by break-even coefficient and profit
    Rank(RankArgs),

    /// Download equipment from the catalog API into a snapshot
    FetchCatalog(FetchArgs),

    /// Resolve rune images through the image cache
    Images(ImagesArgs),
}

#[derive(Args)]
struct ValueArgs {
    /// Item id inside the catalog snapshot
    #[arg(long, conflicts_with = "item")]
    id: Option<ItemId>,

    /// JSON file holding a single item instead of a catalog lookup
    #[arg(long)]
    item: Option<PathBuf>,

    /// Catalog snapshot (defaults to the app data directory)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Price table snapshot (defaults to the app data directory)
    #[arg(long)]
    prices: Option<PathBuf>,

    /// Break coefficient in percent
    #[arg(short, long, default_value_t = 100.0)]
    coefficient: f64,

    /// Item cost; the recipe's craft cost is used when omitted
    #[arg(long)]
    cost: Option<f64>,

    /// Also resolve rune images for the breakdown
    #[arg(long)]
    images: bool,
}

#[derive(Args)]
struct RankArgs {
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[arg(long)]
    prices: Option<PathBuf>,

    /// Item types to keep (comma separated)
    #[arg(long, value_delimiter = ',')]
    types: Vec<String>,

    #[arg(long)]
    min_level: Option<u32>,

    #[arg(long)]
    max_level: Option<u32>,

    #[arg(long)]
    min_profit: Option<f64>,

    #[arg(long)]
    min_craft_cost: Option<f64>,

    #[arg(long, default_value_t = 1)]
    page: usize,

    #[arg(long, default_value_t = 20)]
    page_size: usize,

    #[arg(long, value_enum, default_value_t = SortArg::Profit)]
    sort: SortArg,

    #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
    order: OrderArg,
}

#[derive(Args)]
struct FetchArgs {
    /// Type slugs to fetch (comma separated, "backpack" allowed)
    #[arg(long, value_delimiter = ',')]
    types: Vec<String>,

    #[arg(long, default_value_t = 1)]
    min_level: u32,

    #[arg(long, default_value_t = 200)]
    max_level: u32,

    /// Where to write the catalog snapshot
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also fetch recipe ingredients and write them here
    #[arg(long)]
    ingredients: Option<PathBuf>,
}

#[derive(Args)]
struct ImagesArgs {
    /// Rune names to resolve; every registered rune when empty
    names: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Profit,
    Coefficient,
    Level,
    CraftCost,
    Value,
    Name,
}

impl From<SortArg> for RankSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Profit => RankSort::Profit,
            SortArg::Coefficient => RankSort::Coefficient,
            SortArg::Level => RankSort::Level,
            SortArg::CraftCost => RankSort::CraftCost,
            SortArg::Value => RankSort::Value,
            SortArg::Name => RankSort::Name,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Serialize)]
struct ValueReport<'a> {
    id: ItemId,
    name: &'a str,
    level: u32,
    #[serde(flatten)]
    result: ProfitResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    rune_images: Option<HashMap<String, Option<String>>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().context("Failed to load settings")?;
    if let Some(locale) = cli.locale {
        settings.locale = locale;
    }
    if let Some(level) = cli.log_level.clone() {
        settings.log_level = level;
    }
    if let Some(url) = cli.api_base_url.clone() {
        settings.api_base_url = url;
    }
    settings.validate().context("Invalid settings")?;

    init_tracing(&settings.log_level);
    info!(app = APP_NAME, version = %version_label(), locale = %settings.locale, "starting");

    let registry = RuneRegistry::builtin();
    registry
        .validate()
        .context("Built-in rune registry is inconsistent")?;

    match cli.command {
        Commands::Value(args) => run_value(&settings, registry, args).await,
        Commands::Rank(args) => run_rank(&settings, registry, args),
        Commands::FetchCatalog(args) => run_fetch(&settings, args).await,
        Commands::Images(args) => run_images(&settings, registry, args).await,
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_value(settings: &Settings, registry: &RuneRegistry, args: ValueArgs) -> Result<()> {
    let item = match (&args.item, args.id) {
        (Some(path), _) => persistence::read_json::<Item>(path)
            .with_context(|| format!("Failed to read item from {}", path.display()))?,
        (None, Some(id)) => {
            let catalog = load_catalog(args.catalog.as_deref())?;
            catalog
                .into_iter()
                .map(|entry| entry.item)
                .find(|item| item.id == id)
                .with_context(|| format!("Item {id} is not in the catalog snapshot"))?
        }
        (None, None) => bail!("Pass either --id or --item"),
    };
    let prices = load_prices(args.prices.as_deref())?;

    let item_cost = match args.cost {
        Some(cost) => cost,
        None => prices.craft_cost(&item.recipe).with_context(|| {
            format!(
                "{} cannot be crafted with the current prices; pass --cost",
                item.name
            )
        })?,
    };

    let result = evaluate(
        &item,
        settings.locale,
        args.coefficient,
        &prices,
        item_cost,
        registry,
    );

    let rune_images = if args.images {
        let names: Vec<String> = result
            .breakdown
            .iter()
            .map(|line| line.rune_name.clone())
            .collect();
        Some(resolve_images(settings, names).await?)
    } else {
        None
    };

    print_json(&ValueReport {
        id: item.id,
        name: &item.name,
        level: item.level,
        result,
        rune_images,
    })
}

fn run_rank(settings: &Settings, registry: &RuneRegistry, args: RankArgs) -> Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let prices = load_prices(args.prices.as_deref())?;
    let query = RankingQuery {
        types: args.types,
        min_level: args.min_level,
        max_level: args.max_level,
        min_profit: args.min_profit,
        min_craft_cost: args.min_craft_cost,
        page: args.page,
        page_size: args.page_size,
        sort: args.sort.into(),
        order: args.order.into(),
    };

    let page = rank(&catalog, &prices, settings.locale, &query, registry);
    info!(
        total = page.total,
        page = page.page,
        total_pages = page.total_pages,
        "ranked catalog"
    );
    print_json(&page)
}

async fn run_fetch(settings: &Settings, args: FetchArgs) -> Result<()> {
    if args.min_level > args.max_level {
        bail!(
            "--min-level {} is above --max-level {}",
            args.min_level,
            args.max_level
        );
    }
    let client = CatalogClient::from_settings(settings).context("Failed to build catalog client")?;
    let items = client
        .fetch_equipment(settings.locale, &args.types, args.min_level, args.max_level)
        .await;
    if items.is_empty() {
        warn!("catalog request returned no items");
    }

    let output = match args.output {
        Some(path) => path,
        None => default_catalog_path()?,
    };

    if let Some(path) = &args.ingredients {
        let ingredients = client.ingredients_for(settings.locale, &items).await;
        persistence::write_json(path, &ingredients)
            .with_context(|| format!("Failed to write ingredients to {}", path.display()))?;
        info!(count = ingredients.len(), path = %path.display(), "wrote ingredients");
    }

    let catalog: Vec<CatalogItem> = items.into_iter().map(CatalogItem::from).collect();
    persistence::save_catalog(&output, &catalog)
        .with_context(|| format!("Failed to write catalog to {}", output.display()))?;
    info!(count = catalog.len(), path = %output.display(), "wrote catalog snapshot");
    Ok(())
}

async fn run_images(settings: &Settings, registry: &RuneRegistry, args: ImagesArgs) -> Result<()> {
    let names = if args.names.is_empty() {
        registry
            .rune_names(settings.locale)
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        args.names
    };
    let images: std::collections::BTreeMap<_, _> =
        resolve_images(settings, names).await?.into_iter().collect();
    print_json(&images)
}

async fn resolve_images(
    settings: &Settings,
    names: Vec<String>,
) -> Result<HashMap<String, Option<String>>> {
    let path = settings
        .image_cache_path
        .clone()
        .unwrap_or_else(cache::default_cache_path);
    let image_cache = Arc::new(ImageCache::new(
        settings.image_cache_capacity,
        settings.image_cache_ttl(),
    ));
    cache::load_if_present(&image_cache, &path).await;

    let client = CatalogClient::from_settings(settings).context("Failed to build catalog client")?;
    let resolver = RuneImageResolver::new(client, Arc::clone(&image_cache));
    let unique: BTreeSet<String> = names.into_iter().collect();
    let images = resolver.resolve(settings.locale, unique).await;

    if let Err(err) = image_cache.save_to(&path).await {
        warn!(path = %path.display(), error = %err, "failed to save image cache");
    }
    Ok(images)
}

fn load_catalog(path: Option<&Path>) -> Result<Vec<CatalogItem>> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_catalog_path()?,
    };
    persistence::load_catalog(&path)
        .with_context(|| format!("Failed to read catalog snapshot {}", path.display()))
}

fn load_prices(path: Option<&Path>) -> Result<PriceTable> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_prices_path()?,
    };
    persistence::load_prices(&path)
        .with_context(|| format!("Failed to read price table {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).context("Failed to write JSON")?;
    writeln!(out)?;
    Ok(())
}

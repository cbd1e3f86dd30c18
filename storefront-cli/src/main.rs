//! CLI entry point for storefront

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use storefront::{CartItem, ProductCatalog};
use storefront_cli::config::AppConfig;
use storefront_cli::CatalogStore;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Browse the product catalog page by page and price checkout carts")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON seed file served from memory (overrides config)
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// MySQL connection URL (overrides config)
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    #[command(subcommand)]
    Products(ProductCommands),
    /// Price carts
    #[command(subcommand)]
    Checkout(CheckoutCommands),
    /// Inspect cursor tokens
    #[command(subcommand)]
    Cursor(CursorCommands),
}

#[derive(Subcommand)]
enum ProductCommands {
    /// Print one page of active products
    List {
        /// Cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,
        /// Walk backward from the cursor
        #[arg(long)]
        backward: bool,
        /// Sort field as `field[:asc|desc]`; repeat for tie-breaks
        #[arg(long)]
        sort: Vec<String>,
    },
    /// Print one product
    Get { id: String },
}

#[derive(Subcommand)]
enum CheckoutCommands {
    /// Price a cart of `product_id[:quantity]` items
    Quote {
        #[arg(required = true)]
        items: Vec<String>,
    },
}

#[derive(Subcommand)]
enum CursorCommands {
    /// Print the JSON carried by a token
    Decode { token: String },
    /// Build a token from a JSON object with an `id`
    Encode { json: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load(None)?,
    };

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Apply CLI overrides
    if let Some(seed) = cli.seed {
        config.seed_file = Some(seed);
    }
    if let Some(url) = cli.database_url {
        config.database_url = Some(url);
    }

    match cli.command {
        Commands::Cursor(command) => run_cursor(command),
        Commands::Products(command) => run_products(&open_catalog(&config)?, command).await,
        Commands::Checkout(command) => run_checkout(&open_catalog(&config)?, command).await,
    }
}

fn open_catalog(config: &AppConfig) -> Result<ProductCatalog<CatalogStore>> {
    config.validate()?;
    Ok(storefront_cli::open_catalog(config)?)
}

fn run_cursor(command: CursorCommands) -> Result<()> {
    match command {
        CursorCommands::Decode { token } => print_json(&storefront_cli::decode_cursor(&token)?),
        CursorCommands::Encode { json } => {
            println!("{}", storefront_cli::encode_cursor(&json)?);
            Ok(())
        }
    }
}

async fn run_products(catalog: &ProductCatalog<CatalogStore>, command: ProductCommands) -> Result<()> {
    match command {
        ProductCommands::List {
            cursor,
            limit,
            backward,
            sort,
        } => {
            let request = storefront_cli::page_request(cursor, limit, backward);
            let sort = storefront_cli::parse_sort(&sort)?;
            let page = storefront_cli::list_products(catalog, &request, sort).await?;
            info!("Listed {} products", page.data.len());
            print_json(&page)
        }
        ProductCommands::Get { id } => match catalog.get(&id).await? {
            Some(product) => print_json(&product),
            None => anyhow::bail!("Product not found: {}", id),
        },
    }
}

async fn run_checkout(catalog: &ProductCatalog<CatalogStore>, command: CheckoutCommands) -> Result<()> {
    match command {
        CheckoutCommands::Quote { items } => {
            let items = items
                .iter()
                .map(|item| item.parse::<CartItem>())
                .collect::<storefront::Result<Vec<_>>>()?;
            let quote = catalog.quote_checkout(&items).await?;
            info!("Quoted {} lines", quote.lines.len());
            print_json(&quote)
        }
    }
}

//! storefront-cli: command line front end for the storefront catalog
//!
//! The binary lists products page by page, prices carts, and encodes or
//! decodes cursor tokens for debugging. The catalog comes from a JSON seed
//! file served from memory, or from a MySQL table.
//!
//! # CLI Usage
//!
//! ```bash
//! storefront --seed products.json products list --limit 5
//! storefront --seed products.json products list --cursor <nextCursor> --limit 5
//! storefront --database-url mysql://root@localhost/shop checkout quote p-1:2 p-7
//! storefront cursor decode eyJpZCI6InAtMSJ9
//! ```
//!
//! Configuration is read from `storefront.toml` (or `--config`), then
//! overridden by `STOREFRONT_*` environment variables.

pub mod config;
pub mod error;

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use storefront::{
    Cursor, Direction, FindMany, MemoryStore, MySqlPool, MySqlStore, Page, PageRequest, Product,
    ProductCatalog, SortSpec, Store, Value,
};

pub use config::{AppConfig, CatalogSource};
pub use error::{CliError, Result};

/// The product store selected by configuration.
pub enum CatalogStore {
    Memory(MemoryStore<Product>),
    MySql(MySqlStore<Product>),
}

#[async_trait]
impl Store<Product> for CatalogStore {
    async fn find_many(&self, query: &FindMany) -> storefront::Result<Vec<Product>> {
        match self {
            CatalogStore::Memory(store) => store.find_many(query).await,
            CatalogStore::MySql(store) => store.find_many(query).await,
        }
    }

    async fn find_unique(&self, id: &Value) -> storefront::Result<Option<Product>> {
        match self {
            CatalogStore::Memory(store) => store.find_unique(id).await,
            CatalogStore::MySql(store) => store.find_unique(id).await,
        }
    }
}

/// Read a JSON array of products.
pub fn load_seed(path: &Path) -> Result<Vec<Product>> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| CliError::SeedError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Open the configured store and wrap it in a catalog.
pub fn open_catalog(config: &AppConfig) -> Result<ProductCatalog<CatalogStore>> {
    let store = match config.source()? {
        CatalogSource::Seed(path) => {
            let products = load_seed(path)?;
            info!("Loaded {} products from {}", products.len(), path.display());
            CatalogStore::Memory(MemoryStore::with_rows(products))
        }
        CatalogSource::MySql { url, table } => {
            let pool = MySqlPool::new(url)?;
            info!("Serving products from MySQL table {}", table);
            CatalogStore::MySql(MySqlStore::new(pool, table)?)
        }
    };
    Ok(ProductCatalog::new(
        store,
        config.pagination.clone(),
        &config.checkout,
    ))
}

/// Build a page request from command line flags.
pub fn page_request(cursor: Option<String>, limit: Option<u32>, backward: bool) -> PageRequest {
    PageRequest {
        cursor,
        limit,
        direction: if backward {
            Direction::Backward
        } else {
            Direction::Forward
        },
    }
}

/// Join repeated `--sort field[:dir]` flags into one spec; none means the
/// configured default.
pub fn parse_sort(specs: &[String]) -> Result<Option<SortSpec>> {
    if specs.is_empty() {
        return Ok(None);
    }
    let spec: SortSpec = specs.join(",").parse()?;
    Ok(Some(spec))
}

/// One page of active products.
pub async fn list_products<S: Store<Product>>(
    catalog: &ProductCatalog<S>,
    request: &PageRequest,
    sort: Option<SortSpec>,
) -> Result<Page<Product>> {
    Ok(catalog.list(request, sort).await?)
}

/// The JSON object carried by a cursor token.
pub fn decode_cursor(token: &str) -> Result<serde_json::Value> {
    let cursor = Cursor::decode(token)?;
    Ok(serde_json::Value::Object(cursor.into_fields()))
}

/// Encode a JSON object (which must carry an `id`) as a cursor token.
pub fn encode_cursor(json: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| CliError::ArgumentError(format!("cursor must be JSON: {}", e)))?;
    let serde_json::Value::Object(fields) = value else {
        return Err(CliError::ArgumentError("cursor must be a JSON object".into()));
    };
    Ok(Cursor::from(fields).encode()?)
}

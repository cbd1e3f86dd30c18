//! storefront - cursor-paginated product catalog and checkout quoting
//!
//! The core is a keyset pagination engine that walks a frequently appended
//! table in either direction without skipping or repeating rows, and
//! without the cost of offset scans.
//!
//! # Features
//!
//! - **Opaque cursors**: URL-safe base64 tokens carrying the boundary row's
//!   identifier and sort values; the server keeps no session state
//! - **Pluggable stores**: the `Store` trait, with in-memory and MySQL
//!   implementations
//! - **Derive macros**: `#[derive(Record, FromRow)]` expose a struct to
//!   sorting, filtering, cursors and row mapping
//! - **Checkout quotes**: cart validation and tax calculation in cents
//!
//! # Example
//!
//! ```ignore
//! use storefront::{Filter, MemoryStore, PageRequest, Paginator, Record};
//!
//! #[derive(Clone, Record)]
//! pub struct Article {
//!     pub id: String,
//!     pub created_at: chrono::NaiveDateTime,
//! }
//!
//! async fn newest(store: &MemoryStore<Article>) -> storefront::Result<()> {
//!     let paginator = Paginator::default();
//!     let page = paginator
//!         .paginate(store, &PageRequest::new().limit(20), Filter::All, None)
//!         .await?;
//!     if let Some(cursor) = page.pagination.next_cursor {
//!         let next = paginator
//!             .paginate(store, &PageRequest::after(cursor).limit(20), Filter::All, None)
//!             .await?;
//!     }
//!     Ok(())
//! }
//! ```

// Lets the derive expansions name `storefront::...` inside this crate too
extern crate self as storefront;

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod cursor;
pub mod error;
pub mod executor;
pub mod filter;
pub mod memory;
pub mod mysql;
pub mod page;
pub mod paginator;
pub mod predicate;
pub mod query;
pub mod sort;
pub mod traits;
pub mod value;

// Re-export the derive macros
pub use storefront_derive::{FromRow, Record};

// Re-export main types
pub use catalog::{Product, ProductCatalog};
pub use checkout::{CartItem, CheckoutCalculator, CheckoutQuote, QuoteLine};
pub use config::{CheckoutConfig, PaginationConfig};
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use executor::QueryExecutor;
pub use filter::{CompareOp, Filter};
pub use memory::MemoryStore;
pub use mysql::{MySqlPool, MySqlPoolBuilder, MySqlRow, MySqlStore};
pub use page::{Page, PageInfo};
pub use paginator::{PageRequest, Paginator};
pub use query::FindMany;
pub use sort::{Direction, SortDirection, SortField, SortSpec};
pub use traits::{parse_json_field, FromRow, FromValue, Record, Row, RowExt, Store, ToValue};
pub use value::Value;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}

//! Error types for storefront

use thiserror::Error;

/// Result type alias for storefront operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while paginating, querying a store, or quoting a checkout
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed cursor token, or a cursor value that does not fit its field
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// Page request rejected before any store call was made
    #[error("Invalid page request: {0}")]
    InvalidPageRequest(String),

    /// Backing store failure reported by a non-MySQL store
    #[error("Store error: {0}")]
    Store(String),

    /// MySQL driver error
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// Query could not be rendered or returned an unexpected shape
    #[error("Query error: {0}")]
    Query(String),

    /// Type conversion error
    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversion {
        expected: &'static str,
        actual: String,
    },

    /// Column not found in row
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Null value for non-optional field
    #[error("Unexpected null value for column: {0}")]
    UnexpectedNull(String),

    /// Invalid pagination or checkout settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Checkout without any line items
    #[error("Checkout must contain at least one item")]
    EmptyCart,

    /// Line item quantity below one
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Checkout references products that do not exist
    #[error("Products not found: {}", .0.join(", "))]
    ProductsNotFound(Vec<String>),

    /// Checkout references products that are no longer sold
    #[error("Inactive products: {}", .0.join(", "))]
    InactiveProducts(Vec<String>),

    /// Requested quantity exceeds the stock on hand
    #[error("Insufficient stock for {product}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        product: String,
        available: i32,
        requested: u32,
    },
}

impl Error {
    /// Whether the error was caused by caller input rather than by the store.
    ///
    /// Transport layers map `true` to a client-error response class and
    /// `false` to a server-error class.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidCursor(_)
                | Error::InvalidPageRequest(_)
                | Error::EmptyCart
                | Error::InvalidQuantity(_)
                | Error::ProductsNotFound(_)
                | Error::InactiveProducts(_)
                | Error::InsufficientStock { .. }
        )
    }

    /// Whether the error came from the backing store.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store(_) | Error::MySql(_))
    }
}

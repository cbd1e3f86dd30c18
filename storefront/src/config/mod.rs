//! Pagination and checkout settings

pub mod defaults;
mod settings;

pub use settings::{CheckoutConfig, PaginationConfig};

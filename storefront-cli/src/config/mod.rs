//! Configuration for the storefront command line

pub mod defaults;
mod settings;

pub use settings::{AppConfig, CatalogSource};

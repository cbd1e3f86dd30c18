//! Derive macros for storefront record types
//!
//! - `Record` - exposes a struct's fields to sorting, filtering and cursors
//! - `FromRow` - maps database rows to structs
//!
//! Both are re-exported from the `storefront` crate, so users typically
//! don't need to depend on this crate directly. They share one attribute
//! namespace:
//!
//! - `#[storefront(id)]` - the unique identifier (defaults to the field named `id`)
//! - `#[storefront(rename = "column_name")]` - field and column name
//! - `#[storefront(skip)]` - not a stored field; `FromRow` fills it with `Default`
//! - `#[storefront(nullable)]` - may hold null; implied for `Option<_>` fields

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod from_row;
mod record;

/// Derive macro for the `Record` trait.
///
/// # Example
///
/// ```ignore
/// use storefront::Record;
///
/// #[derive(Clone, Record)]
/// pub struct Product {
///     #[storefront(id)]
///     pub sku: String,
///     pub price: rust_decimal::Decimal,
///     pub created_at: chrono::NaiveDateTime,
/// }
/// ```
#[proc_macro_derive(Record, attributes(storefront))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::derive_record_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive macro for mapping database rows to Rust structs.
///
/// # Example
///
/// ```ignore
/// use storefront::FromRow;
///
/// #[derive(FromRow)]
/// pub struct Product {
///     pub id: String,
///     #[storefront(rename = "product_name")]
///     pub name: String,
/// }
/// ```
#[proc_macro_derive(FromRow, attributes(storefront))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::derive_from_row_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

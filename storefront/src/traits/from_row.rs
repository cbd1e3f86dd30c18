//! FromRow trait for mapping store rows to records

use crate::error::{Error, Result};
use crate::value::Value;

/// A database row that can be queried by column name.
///
/// Store backends wrap their native rows in this trait so the same
/// `FromRow` implementation serves every backend.
pub trait Row {
    /// Get a value from the row by column name as a dynamic Value.
    ///
    /// Returns an error if the column doesn't exist.
    fn get_value(&self, column: &str) -> Result<Value>;
}

/// Extension trait for typed access to row values.
pub trait RowExt: Row {
    /// Get a typed value from the row by column name.
    ///
    /// A NULL read into a non-optional type is reported as
    /// [`Error::UnexpectedNull`] naming the column.
    fn get<T: crate::FromValue>(&self, column: &str) -> Result<T> {
        let value = self.get_value(column)?;
        if value.is_null() {
            return T::from_value(value).map_err(|_| Error::UnexpectedNull(column.to_string()));
        }
        T::from_value(value)
    }
}

// Implement RowExt for all Row types
impl<R: Row + ?Sized> RowExt for R {}

/// Trait for types that can be constructed from a database row.
///
/// Usually derived with `#[derive(FromRow)]`:
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
pub trait FromRow: Sized {
    /// Construct an instance of this type from a database row.
    fn from_row<R: Row>(row: &R) -> Result<Self>;

    /// Get the column names that this type reads from.
    ///
    /// Stores use this to build the SELECT list.
    fn column_names() -> &'static [&'static str];
}

//! Record trait: the capability set every paginated item must expose

use crate::error::{Error, Result};
use crate::traits::ToValue;
use crate::value::Value;
use serde::de::DeserializeOwned;

/// An item that can be sorted, filtered and resumed from a cursor.
///
/// A record names its unique identifier field and hands out typed values
/// for each of its fields. Field names are the storage column names, so the
/// same name is used in sort specs, filters, cursor tokens and SQL.
///
/// Usually derived:
///
/// ```ignore
/// use storefront::Record;
///
/// #[derive(Clone, Record)]
/// pub struct Product {
///     #[storefront(id)]
///     pub id: String,
///     pub created_at: chrono::NaiveDateTime,
/// }
/// ```
pub trait Record: Sized {
    /// Name of the globally unique identifier field.
    fn id_field() -> &'static str;

    /// Names of every readable field.
    fn field_names() -> &'static [&'static str];

    /// Get the value of a field, or `None` if the record has no such field.
    fn get(&self, field: &str) -> Option<Value>;

    /// Parse a JSON value taken from a cursor into the typed value of `field`.
    ///
    /// Fails with [`Error::InvalidCursor`] when the field is unknown or the
    /// JSON does not describe a value of the field's type.
    fn parse_field(field: &str, json: &serde_json::Value) -> Result<Value>;

    /// Fields that may hold null.
    ///
    /// Keyset comparisons never match null, so these cannot be sort fields.
    fn nullable_fields() -> &'static [&'static str] {
        &[]
    }

    /// The identifier value of this record.
    fn id(&self) -> Value {
        self.get(Self::id_field()).unwrap_or(Value::Null)
    }

    /// Whether `field` is one of this record's fields.
    fn has_field(field: &str) -> bool {
        Self::field_names().contains(&field)
    }

    fn is_nullable(field: &str) -> bool {
        Self::nullable_fields().contains(&field)
    }
}

/// Parse a cursor JSON value as `T` and convert it to a [`Value`].
///
/// Called from `#[derive(Record)]` expansions.
#[doc(hidden)]
pub fn parse_json_field<T>(field: &str, json: &serde_json::Value) -> Result<Value>
where
    T: DeserializeOwned + ToValue,
{
    if json.is_null() {
        return Ok(Value::Null);
    }
    serde_json::from_value::<T>(json.clone())
        .map(|v| v.to_value())
        .map_err(|e| Error::InvalidCursor(format!("value for `{}` is malformed: {}", field, e)))
}

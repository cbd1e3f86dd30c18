//! ToValue trait for converting Rust types to field values

use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Trait for types that can be converted to a field value.
///
/// Record fields implement this so the derived `Record::get` can hand out
/// typed values, and filter operands are bound through it.
pub trait ToValue {
    /// Convert this value to a field value.
    fn to_value(&self) -> Value;
}

macro_rules! copy_to_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }
            }
        )*
    };
}

copy_to_value! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    f64 => F64,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    Decimal => Decimal,
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

// Implement for Option<T>
impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

// Implement for references
impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

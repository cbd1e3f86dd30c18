//! Core traits for storefront

mod from_row;
mod from_value;
mod record;
mod store;
mod to_value;

pub use from_row::{FromRow, Row, RowExt};
pub use from_value::FromValue;
pub use record::{parse_json_field, Record};
pub use store::Store;
pub use to_value::ToValue;

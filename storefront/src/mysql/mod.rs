//! MySQL backend

mod pool;
mod row;
pub mod sql;
mod store;
mod types;

pub use pool::{MySqlPool, MySqlPoolBuilder};
pub use row::MySqlRow;
pub use store::MySqlStore;

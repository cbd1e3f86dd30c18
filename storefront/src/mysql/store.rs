//! Store implementation over a MySQL table

use std::marker::PhantomData;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::query::FindMany;
use crate::traits::{FromRow, Record, Store};
use crate::value::Value;

use super::pool::MySqlPool;
use super::sql::{self, quote_identifier};

/// Serves records of type `R` from one table.
///
/// Record field names double as column names, so filters and sort specs
/// written against the record map one-to-one onto the table.
pub struct MySqlStore<R> {
    pool: MySqlPool,
    table: String,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for MySqlStore<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            table: self.table.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> MySqlStore<R> {
    /// Bind `table` on `pool`. The table name is validated here so a bad
    /// name fails at startup rather than on the first page.
    pub fn new(pool: MySqlPool, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        quote_identifier(&table)?;
        Ok(Self {
            pool,
            table,
            _record: PhantomData,
        })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl<R> Store<R> for MySqlStore<R>
where
    R: Record + FromRow + Send,
{
    async fn find_many(&self, query: &FindMany) -> Result<Vec<R>> {
        let stmt = sql::select(&self.table, R::column_names(), query)?;
        debug!(table = %self.table, sql = %stmt.sql, "find_many");
        self.pool.fetch_all(&stmt.sql, &stmt.params).await
    }

    async fn find_unique(&self, id: &Value) -> Result<Option<R>> {
        let stmt = sql::select_by_id(&self.table, R::column_names(), R::id_field(), id)?;
        debug!(table = %self.table, ?id, "find_unique");
        self.pool.fetch_optional(&stmt.sql, &stmt.params).await
    }
}

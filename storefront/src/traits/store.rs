//! Store trait for record backends

use crate::error::Result;
use crate::query::FindMany;
use crate::traits::Record;
use crate::value::Value;
use async_trait::async_trait;

/// A backing store that the paginator reads records from.
///
/// This trait abstracts over storage backends, so the same pagination code
/// runs against the in-memory store and MySQL. Implementations must answer
/// each call from a single consistent snapshot; no retries are expected.
#[async_trait]
pub trait Store<R: Record + Send>: Send + Sync {
    /// Fetch records matching `query.filter`, ordered by `query.order`, at
    /// most `query.limit` of them.
    async fn find_many(&self, query: &FindMany) -> Result<Vec<R>>;

    /// Fetch the record whose identifier equals `id`.
    async fn find_unique(&self, id: &Value) -> Result<Option<R>>;
}

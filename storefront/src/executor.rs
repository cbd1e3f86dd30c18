//! Query execution against a store

use tracing::{debug, warn};

use crate::error::Result;
use crate::filter::Filter;
use crate::query::FindMany;
use crate::sort::SortSpec;
use crate::traits::{Record, Store};
use crate::value::Value;

/// Runs page queries against a borrowed store.
///
/// Every page costs exactly one `find_many`. The executor asks for one row
/// more than the page size so the assembler can tell whether another page
/// exists without a separate count query.
pub struct QueryExecutor<'s, S: ?Sized> {
    store: &'s S,
}

impl<'s, S: ?Sized> QueryExecutor<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Fetch up to `limit + 1` rows matching `filter` in `order`.
    pub async fn execute<R>(&self, filter: Filter, order: SortSpec, limit: usize) -> Result<Vec<R>>
    where
        R: Record + Send,
        S: Store<R>,
    {
        let query = FindMany::new(filter)
            .order_by(order)
            .limit(limit.saturating_add(1));
        debug!(order = %query.order, limit = query.limit, "fetching page rows");

        let rows = self.store.find_many(&query).await?;
        debug!(rows = rows.len(), "store returned page rows");
        Ok(rows)
    }

    /// Look up a cursor's boundary record by identifier.
    ///
    /// A missing record is an expected condition (it may have been deleted
    /// since the cursor was minted), and a failed lookup is treated the same
    /// way: both yield `None`.
    pub async fn find_by_id<R>(&self, id: &Value) -> Option<R>
    where
        R: Record + Send,
        S: Store<R>,
    {
        match self.store.find_unique(id).await {
            Ok(found) => {
                if found.is_none() {
                    debug!(?id, "cursor boundary record no longer exists");
                }
                found
            }
            Err(e) => {
                warn!(?id, error = %e, "cursor boundary lookup failed");
                None
            }
        }
    }
}

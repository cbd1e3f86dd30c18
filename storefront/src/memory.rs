//! In-memory store

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::query::FindMany;
use crate::traits::{Record, Store};
use crate::value::Value;

/// A store that keeps records in a vector.
///
/// Cloning is cheap: clones share the same rows. Each query runs under a
/// read lock, so it sees one consistent snapshot even while other tasks
/// insert.
///
/// # Example
///
/// ```ignore
/// use storefront::MemoryStore;
///
/// let store = MemoryStore::with_rows(products);
/// store.insert(new_product).await;
/// ```
#[derive(Debug)]
pub struct MemoryStore<R> {
    rows: Arc<RwLock<Vec<R>>>,
}

impl<R> Clone for MemoryStore<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::with_rows(Vec::new())
    }
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<R>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    pub async fn insert(&self, record: R) {
        self.rows.write().await.push(record);
    }

    pub async fn extend(&self, records: impl IntoIterator<Item = R>) {
        self.rows.write().await.extend(records);
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl<R> Store<R> for MemoryStore<R>
where
    R: Record + Clone + Send + Sync,
{
    async fn find_many(&self, query: &FindMany) -> Result<Vec<R>> {
        let rows = self.rows.read().await;
        let mut matched: Vec<R> = rows
            .iter()
            .filter(|r| query.filter.matches(*r))
            .cloned()
            .collect();
        drop(rows);

        matched.sort_by(|a, b| query.order.compare(a, b));
        matched.truncate(query.limit);
        Ok(matched)
    }

    async fn find_unique(&self, id: &Value) -> Result<Option<R>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| r.id().compare(id) == Some(Ordering::Equal))
            .cloned())
    }
}

//! Query descriptions handed to stores

use crate::filter::Filter;
use crate::sort::SortSpec;

/// A "find many ordered, filtered, limited" query.
///
/// Stores translate this into their native form: the in-memory store
/// evaluates it directly, the MySQL store renders
/// `SELECT ... WHERE filter ORDER BY order LIMIT limit`.
///
/// # Example
///
/// ```ignore
/// use storefront::{Filter, FindMany, SortDirection, SortSpec};
///
/// let query = FindMany::new(Filter::eq("is_active", true))
///     .order_by(SortSpec::by("created_at", SortDirection::Desc))
///     .limit(11);
/// let rows: Vec<Product> = store.find_many(&query).await?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FindMany {
    /// Rows must match this predicate
    pub filter: Filter,
    /// Rows are returned in this order
    pub order: SortSpec,
    /// At most this many rows are returned
    pub limit: usize,
}

impl FindMany {
    /// Create an unordered query with no row limit.
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            order: SortSpec::new(),
            limit: usize::MAX,
        }
    }

    /// Set the result order.
    pub fn order_by(mut self, order: SortSpec) -> Self {
        self.order = order;
        self
    }

    /// Set the maximum number of rows.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Whether the query caps the number of rows.
    pub fn is_limited(&self) -> bool {
        self.limit != usize::MAX
    }
}

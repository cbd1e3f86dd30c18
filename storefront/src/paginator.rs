//! Cursor pagination facade

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PaginationConfig;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::executor::QueryExecutor;
use crate::filter::Filter;
use crate::page::{self, Page};
use crate::predicate;
use crate::sort::{Direction, SortSpec};
use crate::traits::{Record, Store};

/// What the caller asks for: where to resume, how many rows, which way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Token from a previous page's `nextCursor` or `previousCursor`
    #[serde(default)]
    pub cursor: Option<String>,

    /// Page size; the paginator's default applies when absent
    #[serde(default, alias = "take")]
    pub limit: Option<u32>,

    #[serde(default)]
    pub direction: Direction,
}

impl PageRequest {
    /// First page, default size, forward.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume forward after `cursor`.
    pub fn after(cursor: impl Into<String>) -> Self {
        Self {
            cursor: Some(cursor.into()),
            ..Self::default()
        }
    }

    /// Walk backward from `cursor`.
    pub fn before(cursor: impl Into<String>) -> Self {
        Self {
            cursor: Some(cursor.into()),
            direction: Direction::Backward,
            ..Self::default()
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

/// Entry point of the pagination engine.
///
/// Stateless apart from its configuration, so one instance can serve any
/// number of concurrent requests.
///
/// # Example
///
/// ```ignore
/// use storefront::{Filter, PageRequest, Paginator};
///
/// let paginator = Paginator::default();
/// let first: Page<Product> = paginator
///     .paginate(&store, &PageRequest::new().limit(20), Filter::eq("is_active", true), None)
///     .await?;
/// if let Some(next) = first.pagination.next_cursor {
///     let second = paginator
///         .paginate(&store, &PageRequest::after(next).limit(20), Filter::eq("is_active", true), None)
///         .await?;
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    config: PaginationConfig,
}

impl Paginator {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// The page size for `request`, rejecting sizes outside `1..=max_limit`.
    pub fn page_limit(&self, request: &PageRequest) -> Result<usize> {
        let limit = request.limit.unwrap_or(self.config.default_limit);
        if limit == 0 || limit > self.config.max_limit {
            return Err(Error::InvalidPageRequest(format!(
                "limit must be between 1 and {}, got {}",
                self.config.max_limit, limit
            )));
        }
        Ok(limit as usize)
    }

    /// The sort spec a request runs with: the caller's or the configured
    /// default, tie-broken by the record identifier and validated.
    pub fn sort_spec<R: Record>(&self, sort: Option<SortSpec>) -> Result<SortSpec> {
        let sort = sort.unwrap_or_else(|| self.config.default_sort());
        if sort.is_empty() {
            return Err(Error::InvalidPageRequest("sort spec is empty".into()));
        }
        let sort = sort.with_tie_break(R::id_field());
        sort.validate::<R>()?;
        Ok(sort)
    }

    /// Fetch one page of `R` from `store`.
    ///
    /// The request and sort spec are validated before the store is touched.
    /// Exactly one `find_many` is issued (plus one `find_unique` when
    /// `resolve_cursor_fields` is on and the cursor lacks sort values).
    pub async fn paginate<R, S>(
        &self,
        store: &S,
        request: &PageRequest,
        base_filter: Filter,
        sort: Option<SortSpec>,
    ) -> Result<Page<R>>
    where
        R: Record + Send,
        S: Store<R> + ?Sized,
    {
        let limit = self.page_limit(request)?;
        let sort = self.sort_spec::<R>(sort)?;
        let cursor = request
            .cursor
            .as_deref()
            .map(Cursor::decode)
            .transpose()?;

        debug!(
            limit,
            direction = ?request.direction,
            sort = %sort,
            has_cursor = cursor.is_some(),
            "paginating"
        );

        let executor = QueryExecutor::new(store);
        let cursor = match cursor {
            Some(cursor) if self.config.resolve_cursor_fields => {
                Some(complete_cursor::<R, S>(&executor, cursor, &sort).await?)
            }
            other => other,
        };

        let (filter, order) =
            predicate::build::<R>(cursor.as_ref(), base_filter, &sort, request.direction)?;
        let rows = executor.execute::<R>(filter, order, limit).await?;
        let page = page::assemble(rows, limit, request.direction, &sort)?;

        debug!(
            rows = page.data.len(),
            has_next = page.pagination.has_next,
            "page assembled"
        );
        Ok(page)
    }
}

/// Fill sort values missing from `cursor` from its boundary record.
///
/// When the record is gone the cursor is returned as-is, and the predicate
/// builder falls back to comparing identifiers only.
async fn complete_cursor<R, S>(
    executor: &QueryExecutor<'_, S>,
    mut cursor: Cursor,
    sort: &SortSpec,
) -> Result<Cursor>
where
    R: Record + Send,
    S: Store<R> + ?Sized,
{
    let missing: Vec<&str> = sort
        .fields()
        .iter()
        .map(|f| f.field.as_str())
        .filter(|field| *field != R::id_field())
        .filter(|field| cursor.get(field).map_or(true, |v| v.is_null()))
        .collect();
    if missing.is_empty() {
        return Ok(cursor);
    }

    let id = R::parse_field(R::id_field(), cursor.id())?;
    match executor.find_by_id::<R>(&id).await {
        Some(record) => {
            for field in missing {
                if let Some(value) = record.get(field) {
                    cursor.insert(field, value.to_json());
                }
            }
        }
        None => debug!(?id, "boundary record missing; comparing identifiers only"),
    }
    Ok(cursor)
}

//! Page results and their assembly from over-fetched rows

use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::error::Result;
use crate::sort::{Direction, SortSpec};
use crate::traits::Record;

/// Navigation metadata of a [`Page`].
///
/// `next_cursor` is present only when `has_next` is true and the page has
/// data; `previous_cursor` only on non-empty backward pages. Forward pages
/// leave `has_previous` unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_previous: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_cursor: Option<String>,
}

/// One page of records in natural sort order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

/// Turn the `limit + 1` rows fetched for a page into a [`Page`].
///
/// `sort` is the natural (not direction-flipped) spec; boundary cursors are
/// built from it.
pub fn assemble<R: Record>(
    mut rows: Vec<R>,
    limit: usize,
    direction: Direction,
    sort: &SortSpec,
) -> Result<Page<R>> {
    let has_more = rows.len() > limit;
    rows.truncate(limit);

    if direction.is_backward() {
        // Backward pages were fetched in flipped order
        rows.reverse();
    }

    let has_next = !direction.is_backward() && has_more;
    let has_previous = direction.is_backward().then(|| !rows.is_empty());

    let next_cursor = match rows.last() {
        Some(last) if has_next => Some(Cursor::from_record(last, sort)?.encode()?),
        _ => None,
    };
    let previous_cursor = match rows.first() {
        Some(first) if direction.is_backward() => Some(Cursor::from_record(first, sort)?.encode()?),
        _ => None,
    };

    Ok(Page {
        data: rows,
        pagination: PageInfo {
            has_next,
            has_previous,
            next_cursor,
            previous_cursor,
        },
    })
}

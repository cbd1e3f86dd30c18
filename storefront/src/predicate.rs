//! Keyset predicates that resume a traversal after a cursor

use tracing::debug;

use crate::cursor::Cursor;
use crate::error::Result;
use crate::filter::{CompareOp, Filter};
use crate::sort::{Direction, SortDirection, SortField, SortSpec};
use crate::traits::Record;
use crate::value::Value;

/// Operator that selects rows strictly past the cursor for one sort field.
///
/// | traversal | field direction | op  |
/// |-----------|-----------------|-----|
/// | forward   | descending      | `<` |
/// | forward   | ascending       | `>` |
/// | backward  | descending      | `>` |
/// | backward  | ascending       | `<` |
pub fn cursor_op(direction: Direction, field_direction: SortDirection) -> CompareOp {
    match (direction, field_direction) {
        (Direction::Forward, SortDirection::Desc) | (Direction::Backward, SortDirection::Asc) => {
            CompareOp::Lt
        }
        (Direction::Forward, SortDirection::Asc) | (Direction::Backward, SortDirection::Desc) => {
            CompareOp::Gt
        }
    }
}

/// Build the filter and effective order for the page after (or before) `cursor`.
///
/// `sort` must already end with the record's identifier (see
/// [`SortSpec::with_tie_break`]). Without a cursor the base filter is used
/// unchanged. With one, the base filter is narrowed by
///
/// ```text
/// (f1 op v1) OR (f1 = v1 AND id op idVal)
/// ```
///
/// generalized lexicographically when the spec has more fields. A cursor
/// missing any sort value (or carrying null for one) degrades to
/// `id op idVal`. Backward traversal flips every sort direction; the page
/// assembler restores natural order afterwards.
pub fn build<R: Record>(
    cursor: Option<&Cursor>,
    base_filter: Filter,
    sort: &SortSpec,
    direction: Direction,
) -> Result<(Filter, SortSpec)> {
    let effective = match direction {
        Direction::Forward => sort.clone(),
        Direction::Backward => sort.reversed(),
    };

    let Some(cursor) = cursor else {
        return Ok((base_filter, effective));
    };

    let keys = cursor_keys::<R>(cursor, sort)?;
    let predicate = keyset_predicate(&keys, direction);
    Ok((base_filter.and(predicate), effective))
}

/// Typed cursor values for every sort field, in sort order.
///
/// When the cursor lacks a value for any non-identifier field only the
/// identifier key is returned.
fn cursor_keys<'s, R: Record>(cursor: &Cursor, sort: &'s SortSpec) -> Result<Vec<(&'s SortField, Value)>> {
    let id_field = R::id_field();
    let mut keys = Vec::with_capacity(sort.len());
    let mut complete = true;

    for f in sort.fields() {
        if f.field == id_field {
            keys.push((f, R::parse_field(id_field, cursor.id())?));
            continue;
        }
        match cursor.get(&f.field) {
            Some(json) if !json.is_null() => keys.push((f, R::parse_field(&f.field, json)?)),
            _ => {
                debug!(field = %f.field, "cursor has no value for sort field; using the identifier only");
                complete = false;
            }
        }
    }

    if !complete {
        keys.retain(|(f, _)| f.field == id_field);
    }
    Ok(keys)
}

fn keyset_predicate(keys: &[(&SortField, Value)], direction: Direction) -> Filter {
    let mut branches: Vec<Filter> = keys
        .iter()
        .enumerate()
        .map(|(i, (f, value))| {
            let mut parts: Vec<Filter> = keys[..i]
                .iter()
                .map(|(prev, prev_value)| Filter::eq(prev.field.clone(), prev_value))
                .collect();
            parts.push(Filter::compare(
                f.field.clone(),
                cursor_op(direction, f.direction),
                value,
            ));
            if parts.len() == 1 {
                parts.remove(0)
            } else {
                Filter::And(parts)
            }
        })
        .collect();

    match branches.len() {
        0 => Filter::All,
        1 => branches.remove(0),
        _ => Filter::Or(branches),
    }
}

//! Rendering of store queries into MySQL statements

use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::query::FindMany;
use crate::sort::SortSpec;
use crate::value::Value;

/// A rendered statement and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Backtick-quote a table or column name.
///
/// Names come from record definitions and caller sort specs, so anything
/// other than ASCII letters, digits and underscores is rejected rather than
/// escaped.
pub fn quote_identifier(name: &str) -> Result<String> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if !valid {
        return Err(Error::Query(format!("invalid identifier `{}`", name)));
    }
    Ok(format!("`{}`", name))
}

/// Placeholder for a bound operand.
///
/// Decimals travel as strings, and MySQL compares a DECIMAL column with a
/// string as a double, so the operand is cast back to DECIMAL.
fn placeholder(value: &Value) -> &'static str {
    match value {
        Value::Decimal(_) => "CAST(? AS DECIMAL(65, 30))",
        _ => "?",
    }
}

/// Render `filter` as a WHERE condition, appending its operands to `params`.
pub fn render_filter(filter: &Filter, params: &mut Vec<Value>) -> Result<String> {
    match filter {
        Filter::All => Ok("TRUE".to_string()),
        Filter::Compare { field, op, value } => {
            params.push(value.clone());
            Ok(format!(
                "{} {} {}",
                quote_identifier(field)?,
                op.as_sql(),
                placeholder(value)
            ))
        }
        Filter::In { values, .. } if values.is_empty() => Ok("FALSE".to_string()),
        Filter::In { field, values } => {
            params.extend(values.iter().cloned());
            let placeholders: Vec<&str> = values.iter().map(placeholder).collect();
            Ok(format!(
                "{} IN ({})",
                quote_identifier(field)?,
                placeholders.join(", ")
            ))
        }
        Filter::And(children) => join(children, " AND ", "TRUE", params),
        Filter::Or(children) => join(children, " OR ", "FALSE", params),
    }
}

fn join(children: &[Filter], sep: &str, empty: &str, params: &mut Vec<Value>) -> Result<String> {
    if children.is_empty() {
        return Ok(empty.to_string());
    }
    let parts = children
        .iter()
        .map(|child| render_filter(child, params).map(|sql| format!("({})", sql)))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(sep))
}

/// Render an ORDER BY list (without the keyword).
pub fn render_order(order: &SortSpec) -> Result<String> {
    let parts = order
        .fields()
        .iter()
        .map(|f| Ok(format!("{} {}", quote_identifier(&f.field)?, f.direction.as_sql())))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(", "))
}

fn select_list(columns: &[&str]) -> Result<String> {
    let quoted = columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Result<Vec<_>>>()?;
    Ok(quoted.join(", "))
}

/// `SELECT columns FROM table WHERE filter ORDER BY order LIMIT ?`
pub fn select(table: &str, columns: &[&str], query: &FindMany) -> Result<Statement> {
    let mut params = Vec::new();
    let mut sql = format!(
        "SELECT {} FROM {} WHERE {}",
        select_list(columns)?,
        quote_identifier(table)?,
        render_filter(&query.filter, &mut params)?
    );

    if !query.order.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&render_order(&query.order)?);
    }

    if query.is_limited() {
        sql.push_str(" LIMIT ?");
        params.push(Value::U64(query.limit as u64));
    }

    Ok(Statement { sql, params })
}

/// `SELECT columns FROM table WHERE id_column = ? LIMIT 1`
pub fn select_by_id(table: &str, columns: &[&str], id_column: &str, id: &Value) -> Result<Statement> {
    Ok(Statement {
        sql: format!(
            "SELECT {} FROM {} WHERE {} = ? LIMIT 1",
            select_list(columns)?,
            quote_identifier(table)?,
            quote_identifier(id_column)?
        ),
        params: vec![id.clone()],
    })
}

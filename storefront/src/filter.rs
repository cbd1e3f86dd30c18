//! Filter predicates evaluated by stores

use std::cmp::Ordering;

use crate::traits::{Record, ToValue};
use crate::value::Value;

/// Comparison operator of a [`Filter::Compare`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    /// SQL spelling of the operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        }
    }

    /// Whether `ordering` (left compared to right) satisfies the operator.
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
        }
    }
}

/// A boolean predicate over record fields.
///
/// Comparisons follow SQL semantics: any comparison involving NULL, or two
/// values that cannot be ordered against each other, is false.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// Matches every record
    #[default]
    All,
    /// `field <op> value`
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
    /// `field IN (values...)`; an empty list matches nothing
    In { field: String, values: Vec<Value> },
    /// Every child matches; empty matches everything
    And(Vec<Filter>),
    /// Some child matches; empty matches nothing
    Or(Vec<Filter>),
}

impl Filter {
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl ToValue) -> Self {
        Filter::Compare {
            field: field.into(),
            op,
            value: value.to_value(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl ToValue) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    pub fn lt(field: impl Into<String>, value: impl ToValue) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    pub fn gt(field: impl Into<String>, value: impl ToValue) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    pub fn is_in<T: ToValue>(field: impl Into<String>, values: &[T]) -> Self {
        Filter::In {
            field: field.into(),
            values: values.iter().map(ToValue::to_value).collect(),
        }
    }

    /// Conjunction of `self` and `other`, flattening nested `And`s and
    /// dropping `All`.
    pub fn and(self, other: Filter) -> Filter {
        let mut parts = Vec::new();
        for filter in [self, other] {
            match filter {
                Filter::All => {}
                Filter::And(children) => parts.extend(children),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => Filter::All,
            1 => parts.remove(0),
            _ => Filter::And(parts),
        }
    }

    /// Evaluate the filter against a record.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            Filter::All => true,
            Filter::Compare { field, op, value } => match record.get(field) {
                Some(actual) if !actual.is_null() && !value.is_null() => actual
                    .compare(value)
                    .map(|ordering| op.accepts(ordering))
                    .unwrap_or(false),
                _ => false,
            },
            Filter::In { field, values } => match record.get(field) {
                Some(actual) if !actual.is_null() => values
                    .iter()
                    .any(|v| actual.compare(v) == Some(Ordering::Equal)),
                _ => false,
            },
            Filter::And(children) => children.iter().all(|c| c.matches(record)),
            Filter::Or(children) => children.iter().any(|c| c.matches(record)),
        }
    }
}

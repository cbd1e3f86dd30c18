//! Sort specifications and traversal direction

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::traits::Record;

/// Direction of a single sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(Error::InvalidPageRequest(format!(
                "unknown sort direction `{}`",
                other
            ))),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// Which way a page request walks relative to the natural sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward later records in sort order
    #[default]
    Forward,
    /// Toward earlier records in sort order
    Backward,
}

impl Direction {
    pub fn is_backward(self) -> bool {
        self == Direction::Backward
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Direction::Forward),
            "backward" => Ok(Direction::Backward),
            other => Err(Error::InvalidPageRequest(format!(
                "direction must be `forward` or `backward`, got `{}`",
                other
            ))),
        }
    }
}

/// One `field direction` entry of a [`SortSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

impl SortField {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    /// Parses `field` or `field:asc|desc`; a bare field sorts ascending.
    fn from_str(s: &str) -> Result<Self> {
        let (field, direction) = match s.split_once(':') {
            Some((field, direction)) => (field.trim(), direction.parse()?),
            None => (s.trim(), SortDirection::Asc),
        };
        if field.is_empty() {
            return Err(Error::InvalidPageRequest("sort field name is empty".into()));
        }
        Ok(SortField::new(field, direction))
    }
}

/// Ordered list of sort fields; earlier fields take precedence, later ones
/// break ties.
///
/// For pagination to be stable the last field must be unique per record.
/// [`SortSpec::with_tie_break`] appends the identifier when it is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SortSpec {
    fields: Vec<SortField>,
}

impl SortSpec {
    /// Create an empty sort spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sort spec with a single field.
    pub fn by(field: impl Into<String>, direction: SortDirection) -> Self {
        Self::new().then(field, direction)
    }

    /// Append a lower-precedence field.
    pub fn then(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.fields.push(SortField::new(field, direction));
        self
    }

    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// The highest-precedence field.
    pub fn primary(&self) -> Option<&SortField> {
        self.fields.first()
    }

    /// The same fields with every direction flipped.
    pub fn reversed(&self) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .map(|f| SortField::new(f.field.clone(), f.direction.reversed()))
                .collect(),
        }
    }

    /// Make `id_field` the final tie-breaker.
    ///
    /// Fields after an existing occurrence of `id_field` are dropped, since a
    /// unique field already decides every comparison. When the identifier is
    /// absent it is appended with the primary field's direction.
    pub fn with_tie_break(mut self, id_field: &str) -> Self {
        if let Some(pos) = self.fields.iter().position(|f| f.field == id_field) {
            self.fields.truncate(pos + 1);
            return self;
        }
        let direction = self
            .primary()
            .map(|f| f.direction)
            .unwrap_or(SortDirection::Asc);
        self.fields.push(SortField::new(id_field, direction));
        self
    }

    /// Check the spec against a record type.
    ///
    /// Rejects empty specs, unknown or nullable fields, duplicates, and specs
    /// whose last field is not the record's identifier.
    pub fn validate<R: Record>(&self) -> Result<()> {
        let last = self
            .fields
            .last()
            .ok_or_else(|| Error::InvalidPageRequest("sort spec is empty".into()))?;

        for (i, f) in self.fields.iter().enumerate() {
            if !R::has_field(&f.field) {
                return Err(Error::InvalidPageRequest(format!(
                    "unknown sort field `{}`",
                    f.field
                )));
            }
            if R::is_nullable(&f.field) {
                return Err(Error::InvalidPageRequest(format!(
                    "sort field `{}` is nullable",
                    f.field
                )));
            }
            if self.fields[..i].iter().any(|prev| prev.field == f.field) {
                return Err(Error::InvalidPageRequest(format!(
                    "sort field `{}` listed twice",
                    f.field
                )));
            }
        }

        if last.field != R::id_field() {
            return Err(Error::InvalidPageRequest(format!(
                "last sort field must be the unique `{}` field",
                R::id_field()
            )));
        }
        Ok(())
    }

    /// Compare two records under this spec.
    pub fn compare<R: Record>(&self, a: &R, b: &R) -> Ordering {
        for f in &self.fields {
            let ordering = match (a.get(&f.field), b.get(&f.field)) {
                (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            };
            let ordering = match f.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl FromIterator<SortField> for SortSpec {
    fn from_iter<I: IntoIterator<Item = SortField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl FromStr for SortSpec {
    type Err = Error;

    /// Parses a comma-separated list such as `price:asc,id:asc`.
    fn from_str(s: &str) -> Result<Self> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", field.field, field.direction)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_break_appended_with_primary_direction() {
        let spec = SortSpec::by("created_at", SortDirection::Desc).with_tie_break("id");
        assert_eq!(spec.to_string(), "created_at:desc,id:desc");
    }

    #[test]
    fn test_tie_break_truncates_after_identifier() {
        let spec = SortSpec::by("id", SortDirection::Asc)
            .then("name", SortDirection::Desc)
            .with_tie_break("id");
        assert_eq!(spec.to_string(), "id:asc");
    }

    #[test]
    fn test_reversed_flips_every_field() {
        let spec: SortSpec = "price:asc,id:desc".parse().unwrap();
        assert_eq!(spec.reversed().to_string(), "price:desc,id:asc");
    }

    #[test]
    fn test_parse_rejects_bad_direction() {
        assert!("price:sideways".parse::<SortSpec>().is_err());
        assert!(":asc".parse::<SortField>().is_err());
        assert_eq!(
            "name".parse::<SortField>().unwrap(),
            SortField::new("name", SortDirection::Asc)
        );
    }

    #[derive(crate::Record)]
    struct Listing {
        id: String,
        rank: i64,
        restocked_at: Option<chrono::NaiveDateTime>,
        #[storefront(nullable)]
        note: String,
    }

    #[test]
    fn test_validate_rejects_nullable_fields() {
        assert_eq!(Listing::nullable_fields(), &["restocked_at", "note"]);

        let ok = SortSpec::by("rank", SortDirection::Asc).with_tie_break("id");
        assert!(ok.validate::<Listing>().is_ok());

        for field in ["restocked_at", "note"] {
            let spec = SortSpec::by(field, SortDirection::Desc).with_tie_break("id");
            let err = spec.validate::<Listing>().unwrap_err();
            assert!(matches!(err, Error::InvalidPageRequest(msg) if msg.contains("nullable")));
        }
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("Backward".parse::<Direction>().unwrap(), Direction::Backward);
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::default(), Direction::Forward);
    }
}

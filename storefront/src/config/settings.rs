//! Configuration settings passed to the paginator and the checkout calculator

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::defaults;
use crate::error::{Error, Result};
use crate::sort::{SortDirection, SortSpec};

/// Settings of the [`Paginator`](crate::Paginator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size when a request names none
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Largest accepted page size
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,

    /// Field sorted on when the caller gives no sort spec
    #[serde(default = "default_sort_field")]
    pub default_sort_field: String,

    /// Direction of `default_sort_field`
    #[serde(default = "default_sort_direction")]
    pub default_sort_direction: SortDirection,

    /// Fill sort values missing from a cursor by looking the boundary record up
    #[serde(default = "default_resolve_cursor_fields")]
    pub resolve_cursor_fields: bool,
}

// Default value functions for serde
fn default_limit() -> u32 {
    defaults::PAGE_LIMIT
}
fn default_max_limit() -> u32 {
    defaults::MAX_PAGE_LIMIT
}
fn default_sort_field() -> String {
    defaults::SORT_FIELD.to_string()
}
fn default_sort_direction() -> SortDirection {
    if defaults::SORT_DESCENDING {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    }
}
fn default_resolve_cursor_fields() -> bool {
    defaults::RESOLVE_CURSOR_FIELDS
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            default_sort_field: default_sort_field(),
            default_sort_direction: default_sort_direction(),
            resolve_cursor_fields: default_resolve_cursor_fields(),
        }
    }
}

impl PaginationConfig {
    /// The sort spec used when a caller passes none (before tie-breaking).
    pub fn default_sort(&self) -> SortSpec {
        SortSpec::by(self.default_sort_field.clone(), self.default_sort_direction)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_limit == 0 {
            return Err(Error::Config("max_limit must be at least 1".into()));
        }
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(Error::Config(format!(
                "default_limit must be between 1 and {}",
                self.max_limit
            )));
        }
        if self.default_sort_field.trim().is_empty() {
            return Err(Error::Config("default_sort_field is required".into()));
        }
        Ok(())
    }
}

/// Settings of the checkout calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Fraction of the subtotal charged as tax
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,

    /// ISO currency code of quoted amounts
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_tax_rate() -> Decimal {
    defaults::TAX_RATE
}
fn default_currency() -> String {
    defaults::CURRENCY.to_string()
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            currency: default_currency(),
        }
    }
}

impl CheckoutConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tax_rate.is_sign_negative() || self.tax_rate >= Decimal::ONE {
            return Err(Error::Config(format!(
                "tax_rate must be in [0, 1), got {}",
                self.tax_rate
            )));
        }
        if self.currency.len() != 3 {
            return Err(Error::Config(format!(
                "currency must be a three-letter code, got `{}`",
                self.currency
            )));
        }
        Ok(())
    }
}

//! Checkout quoting: cart validation and amount calculation

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::config::CheckoutConfig;
use crate::error::{Error, Result};

/// One cart line as submitted by the buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

impl CartItem {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Parses `product_id` or `product_id:quantity`.
impl FromStr for CartItem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (id, quantity) = match s.rsplit_once(':') {
            Some((id, qty)) => {
                let quantity = qty
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| Error::InvalidQuantity(format!("`{}` is not a whole number", qty)))?;
                (id.trim(), quantity)
            }
            None => (s.trim(), 1),
        };
        if id.is_empty() {
            return Err(Error::InvalidQuantity(format!("`{}` names no product", s)));
        }
        Ok(Self::new(id, quantity))
    }
}

/// A priced cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

/// Amounts owed for a cart, in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutQuote {
    pub lines: Vec<QuoteLine>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub currency: String,
}

/// Check the cart itself, before any product is looked up.
///
/// Rejects an empty cart and zero quantities. Lines naming the same product
/// are merged, keeping the position of the first one.
pub fn normalize_cart(items: &[CartItem]) -> Result<Vec<CartItem>> {
    if items.is_empty() {
        return Err(Error::EmptyCart);
    }

    let mut merged: Vec<CartItem> = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity < 1 {
            return Err(Error::InvalidQuantity(format!(
                "quantity for {} must be at least 1",
                item.product_id
            )));
        }
        match merged.iter_mut().find(|m| m.product_id == item.product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(item.quantity).ok_or_else(|| {
                    Error::InvalidQuantity(format!("quantity for {} is too large", item.product_id))
                })?;
            }
            None => merged.push(item.clone()),
        }
    }
    Ok(merged)
}

/// Check a normalized cart against the products it references.
///
/// Errors are reported in this order: missing products (by id), inactive
/// products (by name), then the first line whose quantity exceeds the
/// stock on hand. Products with untracked stock never run out.
pub fn validate_products<'p>(
    items: &[CartItem],
    products: &'p [Product],
) -> Result<Vec<(&'p Product, u32)>> {
    let by_id: HashMap<&str, &Product> = products.iter().map(|p| (p.id.as_str(), p)).collect();

    let missing: Vec<String> = items
        .iter()
        .filter(|item| !by_id.contains_key(item.product_id.as_str()))
        .map(|item| item.product_id.clone())
        .collect();
    if !missing.is_empty() {
        return Err(Error::ProductsNotFound(missing));
    }

    let lines: Vec<(&Product, u32)> = items
        .iter()
        .filter_map(|item| by_id.get(item.product_id.as_str()).map(|p| (*p, item.quantity)))
        .collect();

    let inactive: Vec<String> = lines
        .iter()
        .filter(|(p, _)| !p.is_active)
        .map(|(p, _)| p.name.clone())
        .collect();
    if !inactive.is_empty() {
        return Err(Error::InactiveProducts(inactive));
    }

    for (product, quantity) in &lines {
        if let Some(stock) = product.stock {
            if i64::from(stock) < i64::from(*quantity) {
                return Err(Error::InsufficientStock {
                    product: product.name.clone(),
                    available: stock,
                    requested: *quantity,
                });
            }
        }
    }

    Ok(lines)
}

/// Turns validated cart lines into a [`CheckoutQuote`].
#[derive(Debug, Clone)]
pub struct CheckoutCalculator {
    tax_rate: Decimal,
    currency: String,
}

impl Default for CheckoutCalculator {
    fn default() -> Self {
        Self::new(&CheckoutConfig::default())
    }
}

impl CheckoutCalculator {
    pub fn new(config: &CheckoutConfig) -> Self {
        Self {
            tax_rate: config.tax_rate,
            currency: config.currency.clone(),
        }
    }

    /// A price in major units converted to whole cents, half away from zero.
    pub fn to_cents(amount: Decimal) -> Result<i64> {
        let cents = (amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        cents.to_i64().ok_or_else(|| Error::TypeConversion {
            expected: "amount in cents",
            actual: cents.to_string(),
        })
    }

    /// Tax owed on `subtotal_cents`, rounded half away from zero.
    pub fn taxes(&self, subtotal_cents: i64) -> Result<i64> {
        let tax = (Decimal::from(subtotal_cents) * self.tax_rate)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        tax.to_i64().ok_or_else(|| Error::TypeConversion {
            expected: "tax in cents",
            actual: tax.to_string(),
        })
    }

    pub fn quote(&self, lines: &[(&Product, u32)]) -> Result<CheckoutQuote> {
        let overflow = || Error::TypeConversion {
            expected: "amount in cents",
            actual: "overflow".to_string(),
        };

        let mut quoted = Vec::with_capacity(lines.len());
        let mut subtotal_cents: i64 = 0;
        for (product, quantity) in lines {
            let unit_price_cents = Self::to_cents(product.price)?;
            let line_total_cents = unit_price_cents
                .checked_mul(i64::from(*quantity))
                .ok_or_else(overflow)?;
            subtotal_cents = subtotal_cents
                .checked_add(line_total_cents)
                .ok_or_else(overflow)?;
            quoted.push(QuoteLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                quantity: *quantity,
                unit_price_cents,
                line_total_cents,
            });
        }

        let tax_cents = self.taxes(subtotal_cents)?;
        Ok(CheckoutQuote {
            lines: quoted,
            subtotal_cents,
            tax_cents,
            total_cents: subtotal_cents.checked_add(tax_cents).ok_or_else(overflow)?,
            currency: self.currency.clone(),
        })
    }
}

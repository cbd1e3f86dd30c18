//! Product catalog: listing, lookup and checkout quotes

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::checkout::{self, CartItem, CheckoutCalculator, CheckoutQuote};
use crate::config::{CheckoutConfig, PaginationConfig};
use crate::error::Result;
use crate::filter::Filter;
use crate::page::Page;
use crate::paginator::{PageRequest, Paginator};
use crate::query::FindMany;
use crate::sort::SortSpec;
use crate::traits::Store;
use crate::value::Value;
use crate::{FromRow, Record};

/// A sellable product.
///
/// Serializes in camelCase; field (and column) names stay snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[storefront(id)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: String,
    /// `None` when stock is not tracked
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default = "active")]
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

fn active() -> bool {
    true
}

/// Catalog operations over any product store.
pub struct ProductCatalog<S> {
    store: S,
    paginator: Paginator,
    calculator: CheckoutCalculator,
}

impl<S: Store<Product>> ProductCatalog<S> {
    pub fn new(store: S, pagination: PaginationConfig, checkout: &CheckoutConfig) -> Self {
        Self {
            store,
            paginator: Paginator::new(pagination),
            calculator: CheckoutCalculator::new(checkout),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// One page of active products.
    pub async fn list(&self, request: &PageRequest, sort: Option<SortSpec>) -> Result<Page<Product>> {
        self.paginator
            .paginate(&self.store, request, Filter::eq("is_active", true), sort)
            .await
    }

    /// A product by id, active or not.
    pub async fn get(&self, id: &str) -> Result<Option<Product>> {
        self.store.find_unique(&Value::from(id)).await
    }

    /// Price a cart.
    ///
    /// The cart is checked first (empty, zero quantities), then every
    /// referenced product is fetched in one query and checked for
    /// existence, activity and stock.
    pub async fn quote_checkout(&self, items: &[CartItem]) -> Result<CheckoutQuote> {
        let items = checkout::normalize_cart(items)?;
        let ids: Vec<&str> = items.iter().map(|i| i.product_id.as_str()).collect();

        let products = self
            .store
            .find_many(&FindMany::new(Filter::is_in("id", &ids)))
            .await?;
        debug!(requested = ids.len(), found = products.len(), "loaded checkout products");

        let lines = checkout::validate_products(&items, &products)?;
        let quote = self.calculator.quote(&lines)?;
        info!(
            lines = quote.lines.len(),
            total_cents = quote.total_cents,
            currency = %quote.currency,
            "checkout quoted"
        );
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::memory::MemoryStore;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn product(id: &str, price: &str, day: u32, is_active: bool) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: None,
            price: price.parse().unwrap(),
            sku: format!("SKU-{}", id),
            stock: Some(5),
            is_active,
            created_at: at(day),
            updated_at: None,
        }
    }

    fn catalog() -> ProductCatalog<MemoryStore<Product>> {
        let store = MemoryStore::with_rows(vec![
            product("a", "10.00", 1, true),
            product("b", "20.00", 2, false),
            product("c", "30.00", 3, true),
        ]);
        ProductCatalog::new(store, PaginationConfig::default(), &CheckoutConfig::default())
    }

    #[test]
    fn test_record_derive() {
        assert_eq!(Product::id_field(), "id");
        assert!(Product::has_field("created_at"));
        assert!(Product::has_field("is_active"));
        assert_eq!(
            Product::nullable_fields(),
            &["description", "stock", "updated_at"]
        );
        assert_eq!(
            Product::parse_field("created_at", &serde_json::json!("2024-05-01T09:00:00")).unwrap(),
            Value::DateTime(at(1))
        );
        assert!(Product::parse_field("created_at", &serde_json::json!(12)).is_err());
    }

    #[test]
    fn test_seed_json_shape() {
        let json = r#"{
            "id": "p-1",
            "name": "Lamp",
            "price": "49.90",
            "sku": "LAMP-1",
            "createdAt": "2024-05-01T09:00:00"
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert!(p.is_active);
        assert_eq!(p.stock, None);
        assert_eq!(p.created_at, at(1));
    }

    #[tokio::test]
    async fn test_list_skips_inactive_newest_first() {
        let page = catalog().list(&PageRequest::new(), None).await.unwrap();
        let ids: Vec<&str> = page.data.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert!(!page.pagination.has_next);
    }

    #[tokio::test]
    async fn test_get_returns_inactive() {
        let found = catalog().get("b").await.unwrap();
        assert_eq!(found.map(|p| p.is_active), Some(false));
        assert!(catalog().get("zz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_quote_checkout() {
        let quote = catalog()
            .quote_checkout(&[CartItem::new("a", 2), CartItem::new("c", 1)])
            .await
            .unwrap();
        assert_eq!(quote.subtotal_cents, 5000);
        assert_eq!(quote.tax_cents, 950);
        assert_eq!(quote.total_cents, 5950);

        let err = catalog()
            .quote_checkout(&[CartItem::new("b", 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InactiveProducts(_)));

        let err = catalog()
            .quote_checkout(&[CartItem::new("a", 6)])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientStock { available: 5, requested: 6, .. }));
    }
}

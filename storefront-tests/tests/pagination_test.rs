//! Pagination properties over the in-memory store
//!
//! Every test builds its own store, so these run in parallel and need no
//! database.

use chrono::{NaiveDate, NaiveDateTime};
use storefront::{
    CartItem, CheckoutConfig, Cursor, Error, Filter, MemoryStore, Page, PageRequest,
    PaginationConfig, Paginator, Product, ProductCatalog, Record, SortDirection, SortSpec,
};

#[derive(Debug, Clone, PartialEq, Record)]
struct Event {
    id: String,
    created_at: NaiveDateTime,
    score: i64,
    kind: Option<String>,
}

fn ts(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// `n` events whose timestamps and scores collide often. Ids are distinct
/// as long as `n` is not a multiple of 17.
fn events(n: usize) -> Vec<Event> {
    (0..n)
        .map(|i| Event {
            id: format!("evt-{:03}", (i * 17) % n),
            created_at: ts(1 + (i % 5) as u32, 8),
            score: ((i * 7) % 4) as i64,
            kind: if i % 3 == 0 { None } else { Some("click".into()) },
        })
        .collect()
}

fn ids<R: Record>(rows: &[R]) -> Vec<String> {
    rows.iter()
        .map(|r| match r.id() {
            storefront::Value::String(s) => s,
            other => format!("{:?}", other),
        })
        .collect()
}

fn paginator() -> Paginator {
    Paginator::default()
}

/// Follow `next_cursor` until the last page.
async fn walk_forward(
    store: &MemoryStore<Event>,
    sort: &SortSpec,
    limit: u32,
    filter: Filter,
) -> Vec<Event> {
    let mut seen = Vec::new();
    let mut request = PageRequest::new().limit(limit);
    loop {
        let page: Page<Event> = paginator()
            .paginate(store, &request, filter.clone(), Some(sort.clone()))
            .await
            .unwrap();
        assert!(page.data.len() <= limit as usize);
        seen.extend(page.data);
        match page.pagination.next_cursor {
            Some(cursor) => request = PageRequest::after(cursor).limit(limit),
            None => {
                assert!(!page.pagination.has_next);
                return seen;
            }
        }
    }
}

fn sorted(mut rows: Vec<Event>, sort: &SortSpec) -> Vec<Event> {
    let sort = sort.clone().with_tie_break("id");
    rows.sort_by(|a, b| sort.compare(a, b));
    rows
}

#[test]
fn test_cursor_round_trip() {
    let cursors = [
        Cursor::new("evt-1"),
        Cursor::new("evt-2").with("created_at", "2024-01-02T08:00:00"),
        Cursor::new(42).with("score", 3).with("kind", serde_json::Value::Null),
        Cursor::new("ünïcödé/+?&=").with("price", "19.99"),
    ];
    for cursor in cursors {
        let token = cursor.encode().unwrap();
        assert!(!token.contains('+') && !token.contains('/') && !token.contains('='));
        assert_eq!(Cursor::decode(&token).unwrap(), cursor);
    }
}

#[test]
fn test_malformed_cursors_rejected() {
    assert!(matches!(
        Cursor::decode("not-base64!!"),
        Err(Error::InvalidCursor(_))
    ));

    // base64 of {"noId":1}
    assert!(matches!(
        Cursor::decode("eyJub0lkIjoxfQ"),
        Err(Error::InvalidCursor(_))
    ));
}

#[tokio::test]
async fn test_forward_chain_visits_each_record_once() {
    let rows = events(37);
    let store = MemoryStore::with_rows(rows.clone());

    for sort in [
        SortSpec::by("created_at", SortDirection::Desc),
        SortSpec::by("created_at", SortDirection::Asc),
        SortSpec::by("score", SortDirection::Desc).then("created_at", SortDirection::Asc),
    ] {
        for limit in [1, 4, 10, 37, 100] {
            let seen = walk_forward(&store, &sort, limit, Filter::All).await;
            assert_eq!(
                ids(&seen),
                ids(&sorted(rows.clone(), &sort)),
                "sort {} limit {}",
                sort,
                limit
            );
        }
    }
}

#[tokio::test]
async fn test_backward_chain_reproduces_forward_sequence() {
    let rows = events(23);
    let store = MemoryStore::with_rows(rows.clone());
    let sort = SortSpec::by("created_at", SortDirection::Desc).with_tie_break("id");
    let forward = sorted(rows, &sort);

    let last = forward.last().unwrap();
    let mut cursor = Some(Cursor::from_record(last, &sort).unwrap().encode().unwrap());
    let mut collected: Vec<Event> = Vec::new();

    while let Some(token) = cursor {
        let page = paginator()
            .paginate(&store, &PageRequest::before(token).limit(4), Filter::All, Some(sort.clone()))
            .await
            .unwrap();
        assert!(!page.pagination.has_next);
        if page.data.is_empty() {
            assert_eq!(page.pagination.has_previous, Some(false));
            assert!(page.pagination.previous_cursor.is_none());
            break;
        }
        assert_eq!(page.pagination.has_previous, Some(true));
        collected.splice(0..0, page.data);
        cursor = page.pagination.previous_cursor;
    }

    assert_eq!(ids(&collected), ids(&forward[..forward.len() - 1]));
}

#[tokio::test]
async fn test_empty_store() {
    let store = MemoryStore::<Event>::new();
    let page = paginator()
        .paginate(&store, &PageRequest::new(), Filter::All, Some(SortSpec::by("score", SortDirection::Asc)))
        .await
        .unwrap();
    assert!(page.data.is_empty());
    assert!(!page.pagination.has_next);
    assert!(page.pagination.next_cursor.is_none());
}

#[tokio::test]
async fn test_exact_limit_has_no_next_page() {
    let store = MemoryStore::with_rows(events(5));
    let page = paginator()
        .paginate(
            &store,
            &PageRequest::new().limit(5),
            Filter::All,
            Some(SortSpec::by("created_at", SortDirection::Desc)),
        )
        .await
        .unwrap();
    assert_eq!(page.data.len(), 5);
    assert!(!page.pagination.has_next);
    assert!(page.pagination.next_cursor.is_none());
}

#[tokio::test]
async fn test_tied_primary_values_visited_once() {
    let rows: Vec<Event> = ["e", "a", "d", "b", "c"]
        .iter()
        .map(|id| Event {
            id: id.to_string(),
            created_at: ts(1, 12),
            score: 0,
            kind: None,
        })
        .collect();
    let store = MemoryStore::with_rows(rows);

    let seen = walk_forward(&store, &SortSpec::by("created_at", SortDirection::Desc), 1, Filter::All).await;
    assert_eq!(ids(&seen), vec!["e", "d", "c", "b", "a"]);
}

#[tokio::test]
async fn test_two_page_scenario() {
    let store = MemoryStore::with_rows(vec![
        Event { id: "a".into(), created_at: ts(1, 0), score: 0, kind: None },
        Event { id: "b".into(), created_at: ts(2, 0), score: 0, kind: None },
        Event { id: "c".into(), created_at: ts(3, 0), score: 0, kind: None },
    ]);
    let sort = Some(SortSpec::by("created_at", SortDirection::Desc));

    let first = paginator()
        .paginate(&store, &PageRequest::new().limit(2), Filter::All, sort.clone())
        .await
        .unwrap();
    assert_eq!(ids(&first.data), vec!["c", "b"]);
    assert!(first.pagination.has_next);

    let token = first.pagination.next_cursor.unwrap();
    assert_eq!(
        Cursor::decode(&token).unwrap(),
        Cursor::new("b").with("created_at", "2024-01-02T00:00:00")
    );

    let second = paginator()
        .paginate(&store, &PageRequest::after(token).limit(2), Filter::All, sort)
        .await
        .unwrap();
    assert_eq!(ids(&second.data), vec!["a"]);
    assert!(!second.pagination.has_next);
    assert!(second.pagination.next_cursor.is_none());
}

#[tokio::test]
async fn test_appends_during_traversal_do_not_repeat_rows() {
    let rows = events(12);
    let store = MemoryStore::with_rows(rows.clone());
    let sort = SortSpec::by("created_at", SortDirection::Desc);

    let mut seen = Vec::new();
    let mut request = PageRequest::new().limit(3);
    let mut day = 20;
    loop {
        let page = paginator()
            .paginate(&store, &request, Filter::All, Some(sort.clone()))
            .await
            .unwrap();
        seen.extend(page.data);

        // Newer rows land ahead of the cursor and never show up in this walk
        store
            .insert(Event {
                id: format!("new-{}", day),
                created_at: ts(day, 0),
                score: 0,
                kind: None,
            })
            .await;
        day += 1;

        match page.pagination.next_cursor {
            Some(cursor) => request = PageRequest::after(cursor).limit(3),
            None => break,
        }
    }

    assert_eq!(ids(&seen), ids(&sorted(rows, &sort)));
}

#[tokio::test]
async fn test_base_filter_and_cursor_compose() {
    let rows = events(30);
    let store = MemoryStore::with_rows(rows.clone());
    let sort = SortSpec::by("score", SortDirection::Asc);
    let filter = Filter::eq("kind", "click");

    let seen = walk_forward(&store, &sort, 4, filter.clone()).await;
    let expected: Vec<Event> = rows.into_iter().filter(|e| filter.matches(e)).collect();
    assert_eq!(ids(&seen), ids(&sorted(expected, &sort)));
}

#[tokio::test]
async fn test_request_validation_fails_fast() {
    let store = MemoryStore::with_rows(events(3));
    let sort = Some(SortSpec::by("score", SortDirection::Asc));

    for request in [PageRequest::new().limit(0), PageRequest::new().limit(101)] {
        let err = paginator()
            .paginate(&store, &request, Filter::All, sort.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPageRequest(_)));
        assert!(err.is_client_error());
    }

    let err = paginator()
        .paginate(&store, &PageRequest::new(), Filter::All, Some(SortSpec::by("missing", SortDirection::Asc)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPageRequest(_)));

    // A score cursor value that is not a number
    let token = Cursor::new("evt-001").with("score", "high").encode().unwrap();
    let err = paginator()
        .paginate(&store, &PageRequest::after(token), Filter::All, sort)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCursor(_)));
}

#[tokio::test]
async fn test_custom_limits_from_config() {
    let store = MemoryStore::with_rows(events(8));
    let paginator = Paginator::new(PaginationConfig {
        default_limit: 3,
        max_limit: 5,
        default_sort_field: "score".into(),
        default_sort_direction: SortDirection::Asc,
        resolve_cursor_fields: false,
    });

    let page = paginator
        .paginate(&store, &PageRequest::new(), Filter::All, None)
        .await
        .unwrap();
    assert_eq!(page.data.len(), 3);
    assert!(paginator
        .paginate(&store, &PageRequest::new().limit(6), Filter::All, None)
        .await
        .is_err());
}

// ============ Checkout ============

fn product(id: &str, price: &str, stock: Option<i32>, active: bool) -> Product {
    Product {
        id: id.into(),
        name: format!("Item {}", id),
        description: None,
        price: price.parse().unwrap(),
        sku: format!("SKU-{}", id),
        stock,
        is_active: active,
        created_at: ts(1, 0),
        updated_at: None,
    }
}

fn checkout_catalog() -> ProductCatalog<MemoryStore<Product>> {
    ProductCatalog::new(
        MemoryStore::with_rows(vec![
            product("p1", "4199990.00", Some(3), true),
            product("p2", "12.345", None, true),
            product("p3", "10.00", Some(1), false),
        ]),
        PaginationConfig::default(),
        &CheckoutConfig::default(),
    )
}

#[tokio::test]
async fn test_checkout_quote_totals() -> anyhow::Result<()> {
    let quote = checkout_catalog()
        .quote_checkout(&[CartItem::new("p1", 2), CartItem::new("p2", 3)])
        .await?;

    // 419999000 * 2 + 1235 * 3
    assert_eq!(quote.subtotal_cents, 839_998_000 + 3_705);
    // 840_001_705 * 0.19 = 159_600_323.95
    assert_eq!(quote.tax_cents, 159_600_324);
    assert_eq!(quote.total_cents, quote.subtotal_cents + quote.tax_cents);
    assert_eq!(quote.lines[1].unit_price_cents, 1235);
    Ok(())
}

#[tokio::test]
async fn test_checkout_rejections() {
    let catalog = checkout_catalog();
    let catalog = &catalog;
    let quote = move |items: Vec<CartItem>| async move {
        catalog.quote_checkout(&items).await.unwrap_err()
    };

    assert!(matches!(quote(vec![]).await, Error::EmptyCart));
    assert!(matches!(
        quote(vec![CartItem::new("p1", 0)]).await,
        Error::InvalidQuantity(_)
    ));
    assert!(matches!(
        quote(vec![CartItem::new("nope", 1), CartItem::new("p1", 1)]).await,
        Error::ProductsNotFound(ids) if ids == vec!["nope".to_string()]
    ));
    assert!(matches!(
        quote(vec![CartItem::new("p3", 1)]).await,
        Error::InactiveProducts(names) if names == vec!["Item p3".to_string()]
    ));

    let err = quote(vec![CartItem::new("p1", 4)]).await;
    assert!(err.is_client_error());
    assert_eq!(
        err.to_string(),
        "Insufficient stock for Item p1. Available: 3, Requested: 4"
    );
}

#[tokio::test]
async fn test_nullable_sort_fields_rejected() {
    let store = MemoryStore::with_rows(vec![
        product("a", "5.00", Some(3), true),
        product("b", "6.00", None, true),
        product("c", "7.00", Some(1), true),
        product("d", "8.00", None, true),
    ]);
    let catalog = ProductCatalog::new(store, PaginationConfig::default(), &CheckoutConfig::default());

    for spec in ["stock:asc", "stock:desc", "updated_at:desc"] {
        let sort: SortSpec = spec.parse().unwrap();
        let err = catalog
            .list(&PageRequest::new().limit(1), Some(sort))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPageRequest(_)), "{}", spec);
    }

    // A non-null field still walks every row one at a time
    let sort: SortSpec = "price:desc".parse().unwrap();
    let mut request = PageRequest::new().limit(1);
    let mut seen = Vec::new();
    loop {
        let page = catalog.list(&request, Some(sort.clone())).await.unwrap();
        seen.extend(page.data.iter().map(|p| p.id.clone()));
        match page.pagination.next_cursor {
            Some(cursor) => request = PageRequest::after(cursor).limit(1),
            None => break,
        }
    }
    assert_eq!(seen, vec!["d", "c", "b", "a"]);
}

//! Integration tests for the MySQL store with a MySQL testcontainer
//!
//! These tests run the pagination engine and the catalog against a real
//! MySQL database and check that it pages exactly like the in-memory store.
//!
//! A single container is shared across all tests using the `ctor` pattern.
//! Tests run sequentially with `serial_test` and clean up tables between runs.
//!
//! Container cleanup:
//! - The `watchdog` feature handles cleanup on CTRL+C or SIGTERM signals
//! - For normal process exit, we use `shutdown_hooks` to signal the container thread to stop
//! - The container lives inside the thread, so it's dropped when the thread exits

use chrono::{NaiveDate, NaiveDateTime};
use ctor::ctor;
use serial_test::serial;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::thread::{self, JoinHandle};
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mysql::Mysql;

use storefront::mysql::sql::quote_identifier;
use storefront::{
    CartItem, CheckoutConfig, Cursor, Error, Filter, MemoryStore, MySqlPool, MySqlStore, Page,
    PageRequest, PaginationConfig, Paginator, Product, ProductCatalog, Record, SortDirection,
    SortSpec, Store, Value,
};

// Holds the connection URL (container lives in the thread)
static DB_URL: OnceLock<String> = OnceLock::new();
// Flag to signal the container thread to exit
static SHUTDOWN: AtomicBool = AtomicBool::new(false);
// Thread handle for joining on exit
static CONTAINER_THREAD: OnceLock<JoinHandle<()>> = OnceLock::new();

/// Cleanup function called on process exit.
/// Signals the container thread to stop and waits for it to finish.
extern "C" fn cleanup_on_exit() {
    SHUTDOWN.store(true, Ordering::SeqCst);
    // Give the container thread time to clean up
    std::thread::sleep(std::time::Duration::from_millis(500));
}

#[ctor]
fn setup_container() {
    use std::time::Duration;

    // Register cleanup function for normal process exit (safe wrapper around atexit)
    shutdown_hooks::add_shutdown_hook(cleanup_on_exit);

    // Channel for signaling when the container is ready
    let (ready_tx, ready_rx) = std::sync::mpsc::channel();

    // Spawn container in a separate thread with its own runtime.
    // The container lives inside this thread, so it will be dropped when the thread exits.
    let handle = thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let container: ContainerAsync<Mysql> = Mysql::default().start().await.unwrap();
            let port = container.get_host_port_ipv4(3306).await.unwrap();
            let url = format!("mysql://root@127.0.0.1:{}/test", port);

            // Run schema
            let pool = MySqlPool::new(&url).unwrap();
            let schema = include_str!("../schema.sql");
            for stmt in schema.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                pool.execute(stmt, &[]).await.unwrap();
            }

            ready_tx.send(url).unwrap();

            // Keep container alive until shutdown is signaled.
            while !SHUTDOWN.load(Ordering::Relaxed) {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }

            // Container is dropped here, which stops it
        });
    });

    let _ = CONTAINER_THREAD.set(handle);

    // Block until container is ready
    let url = ready_rx.recv().unwrap();
    DB_URL.set(url).unwrap();
}

fn get_db_url() -> &'static str {
    DB_URL.get().expect("Container not initialized")
}

fn ts(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// 19 products; timestamps collide in groups and every fifth is inactive.
fn products() -> Vec<Product> {
    (0..19u32)
        .map(|i| Product {
            id: format!("prod-{:03}", (i * 7) % 19),
            name: format!("Product {}", i),
            description: (i % 2 == 0).then(|| format!("Description {}", i)),
            price: format!("{}.{:02}", 10 + (i % 6) * 5, (i * 13) % 100).parse().unwrap(),
            sku: format!("SKU-{:04}", i),
            stock: (i % 3 != 0).then_some((i * 3) as i32),
            is_active: i % 5 != 4,
            created_at: ts(1 + i % 4, if i % 2 == 0 { 0 } else { 15 }),
            updated_at: (i % 4 == 0).then(|| ts(20, 10)),
        })
        .collect()
}

async fn setup() -> (MySqlPool, Vec<Product>) {
    let pool = MySqlPool::new(get_db_url()).unwrap();
    pool.execute("DELETE FROM `products`", &[]).await.unwrap();

    let rows = products();
    for product in &rows {
        insert(&pool, product).await.unwrap();
    }
    (pool, rows)
}

/// Insert a record using its field names as columns.
async fn insert<R: Record>(pool: &MySqlPool, record: &R) -> storefront::Result<u64> {
    let columns = R::field_names()
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<storefront::Result<Vec<_>>>()?;
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO `products` ({}) VALUES ({})",
        columns.join(", "),
        placeholders
    );
    let params: Vec<Value> = R::field_names()
        .iter()
        .map(|f| record.get(f).unwrap_or(Value::Null))
        .collect();
    pool.execute(&sql, &params).await
}

fn ids(page: &Page<Product>) -> Vec<&str> {
    page.data.iter().map(|p| p.id.as_str()).collect()
}

/// Walk forward over both stores in lock step, asserting identical pages.
async fn assert_same_pages(
    mysql: &MySqlStore<Product>,
    memory: &MemoryStore<Product>,
    sort: Option<SortSpec>,
    limit: u32,
) -> usize {
    let paginator = Paginator::default();
    let filter = Filter::eq("is_active", true);
    let mut request = PageRequest::new().limit(limit);
    let mut seen = 0;

    loop {
        let from_db = paginator
            .paginate(mysql, &request, filter.clone(), sort.clone())
            .await
            .unwrap();
        let from_memory = paginator
            .paginate(memory, &request, filter.clone(), sort.clone())
            .await
            .unwrap();

        assert_eq!(ids(&from_db), ids(&from_memory));
        assert_eq!(from_db.pagination, from_memory.pagination);
        seen += from_db.data.len();

        match from_db.pagination.next_cursor {
            Some(cursor) => request = PageRequest::after(cursor).limit(limit),
            None => return seen,
        }
    }
}

// ============ Store Tests ============

#[tokio::test]
#[serial]
async fn test_rows_map_back_to_products() {
    let (pool, rows) = setup().await;
    let store = MySqlStore::<Product>::new(pool, "products").unwrap();

    for expected in &rows {
        let found = store
            .find_unique(&Value::from(expected.id.as_str()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&found, expected);
    }
    assert!(store.find_unique(&Value::from("nope")).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn test_invalid_table_name_rejected() {
    let pool = MySqlPool::new(get_db_url()).unwrap();
    assert!(MySqlStore::<Product>::new(pool, "products; DROP TABLE x").is_err());
}

// ============ Pagination Tests ============

#[tokio::test]
#[serial]
async fn test_pages_match_memory_store() {
    let (pool, rows) = setup().await;
    let mysql = MySqlStore::<Product>::new(pool, "products").unwrap();
    let memory = MemoryStore::with_rows(rows.clone());
    let active = rows.iter().filter(|p| p.is_active).count();

    for sort in [
        None,
        Some(SortSpec::by("created_at", SortDirection::Asc)),
        Some(SortSpec::by("price", SortDirection::Asc)),
        Some(SortSpec::by("price", SortDirection::Desc).then("created_at", SortDirection::Asc)),
    ] {
        for limit in [1, 3, 7, 100] {
            assert_eq!(assert_same_pages(&mysql, &memory, sort.clone(), limit).await, active);
        }
    }
}

#[tokio::test]
#[serial]
async fn test_backward_page_over_mysql() {
    let (pool, _) = setup().await;
    let store = MySqlStore::<Product>::new(pool, "products").unwrap();
    let paginator = Paginator::default();
    let filter = Filter::eq("is_active", true);

    let first = paginator
        .paginate(&store, &PageRequest::new().limit(4), filter.clone(), None)
        .await
        .unwrap();
    let second = paginator
        .paginate(
            &store,
            &PageRequest::after(first.pagination.next_cursor.clone().unwrap()).limit(4),
            filter.clone(),
            None,
        )
        .await
        .unwrap();

    // Step back from the first row of page two
    let sort = paginator.sort_spec::<Product>(None).unwrap();
    let token = Cursor::from_record(&second.data[0], &sort)
        .unwrap()
        .encode()
        .unwrap();
    let back = paginator
        .paginate(&store, &PageRequest::before(token).limit(4), filter, None)
        .await
        .unwrap();

    assert_eq!(ids(&back), ids(&first));
    assert_eq!(back.pagination.has_previous, Some(true));
    assert!(!back.pagination.has_next);
}

#[tokio::test]
#[serial]
async fn test_id_only_cursor_resolved_from_database() {
    let (pool, _) = setup().await;
    let store = MySqlStore::<Product>::new(pool, "products").unwrap();
    let filter = Filter::eq("is_active", true);

    let plain = Paginator::default();
    let first = plain
        .paginate(&store, &PageRequest::new().limit(5), filter.clone(), None)
        .await
        .unwrap();
    let expected = plain
        .paginate(
            &store,
            &PageRequest::after(first.pagination.next_cursor.unwrap()).limit(5),
            filter.clone(),
            None,
        )
        .await
        .unwrap();

    let resolving = Paginator::new(PaginationConfig {
        resolve_cursor_fields: true,
        ..Default::default()
    });
    let id_only = Cursor::new(first.data[4].id.as_str()).encode().unwrap();
    let resolved = resolving
        .paginate(&store, &PageRequest::after(id_only).limit(5), filter, None)
        .await
        .unwrap();

    assert_eq!(ids(&resolved), ids(&expected));
}

#[tokio::test]
#[serial]
async fn test_bad_cursor_never_queries() {
    let (pool, _) = setup().await;
    let store = MySqlStore::<Product>::new(pool, "products").unwrap();

    let err = Paginator::default()
        .paginate(&store, &PageRequest::after("%%%"), Filter::All, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCursor(_)));
}

// ============ Catalog Tests ============

#[tokio::test]
#[serial]
async fn test_catalog_over_mysql() -> anyhow::Result<()> {
    let (pool, rows) = setup().await;
    let catalog = ProductCatalog::new(
        MySqlStore::<Product>::new(pool, "products")?,
        PaginationConfig::default(),
        &CheckoutConfig::default(),
    );

    let page = catalog.list(&PageRequest::new(), None).await?;
    assert_eq!(page.data.len(), 10);
    assert!(page.data.iter().all(|p| p.is_active));

    let inactive = rows.iter().find(|p| !p.is_active).unwrap();
    assert_eq!(catalog.get(&inactive.id).await?.as_ref(), Some(inactive));

    let tracked = rows
        .iter()
        .find(|p| p.is_active && p.stock.map_or(false, |s| s >= 2))
        .unwrap();
    let quote = catalog
        .quote_checkout(&[CartItem::new(tracked.id.clone(), 2)])
        .await?;
    let unit = storefront::CheckoutCalculator::to_cents(tracked.price)?;
    assert_eq!(quote.subtotal_cents, unit * 2);
    assert_eq!(quote.lines[0].product_id, tracked.id);

    let err = catalog
        .quote_checkout(&[CartItem::new(inactive.id.clone(), 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InactiveProducts(_)));
    Ok(())
}

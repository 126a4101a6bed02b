//! Repository tests against sea-orm's `MockDatabase`.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{
    DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Transaction, Value,
};

use gonzagas_catalog::domain::{
    Money, MovementOutcome, NewProduct, ProductFilter, ProductInput, StockMovement,
    TransactionType,
};
use gonzagas_catalog::errors::AppError;
use gonzagas_catalog::infra::{
    FamilyRepository, FamilyStore, InventoryRepository, InventoryStore, ProductRepository,
    ProductStore,
};
use gonzagas_catalog::types::PaginationParams;

fn stamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
}

/// Statements recorded by a mock connection once its store is gone.
fn transaction_log(db: Arc<DatabaseConnection>) -> Vec<Transaction> {
    Arc::try_unwrap(db)
        .ok()
        .expect("store still holds the connection")
        .into_transaction_log()
}

/// Every statement the mock connection saw, in order.
fn statements(log: &[Transaction]) -> Vec<String> {
    log.iter()
        .flat_map(|t| t.statements().iter().map(|s| s.sql.clone()))
        .collect()
}

fn statement_values(log: &[Transaction]) -> String {
    log.iter()
        .flat_map(|t| t.statements().iter().map(|s| format!("{:?}", s.values)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn inserted() -> MockExecResult {
    MockExecResult {
        last_insert_id: 1,
        rows_affected: 1,
    }
}

fn product_columns(
    prefix: &str,
    id: i32,
    reference: &str,
    stock: i32,
    sold: i32,
) -> BTreeMap<String, Value> {
    let key = |column: &str| format!("{}{}", prefix, column);
    BTreeMap::from([
        (key("id"), Value::from(id)),
        (key("reference"), Value::from(reference)),
        (key("family_id"), Value::from(1)),
        (key("name"), Value::from("Solitaire Ring")),
        (key("description"), Value::String(None)),
        (key("sale_price"), Value::from(45_000i64)),
        (key("purchase_price"), Value::from(20_000i64)),
        (key("current_stock"), Value::from(stock)),
        (key("total_sold"), Value::from(sold)),
        (key("style"), Value::String(None)),
        (key("material"), Value::from("Silver")),
        (key("weight"), Value::Double(None)),
        (key("dimensions"), Value::String(None)),
        (key("is_active"), Value::from(true)),
        (key("featured"), Value::from(true)),
        (key("created_at"), Value::from(stamp())),
        (key("updated_at"), Value::from(stamp())),
    ])
}

fn product_row(id: i32, reference: &str, stock: i32, sold: i32) -> BTreeMap<String, Value> {
    product_columns("", id, reference, stock, sold)
}

/// Product joined with its family, as `find_also_related` selects it.
fn product_with_family_row(id: i32, reference: &str) -> BTreeMap<String, Value> {
    let mut row = product_columns("A_", id, reference, 3, 0);
    row.extend([
        ("B_id".to_string(), Value::from(1)),
        ("B_code".to_string(), Value::from("AN")),
        ("B_name".to_string(), Value::from("Rings")),
        ("B_description".to_string(), Value::String(None)),
        ("B_created_at".to_string(), Value::from(stamp())),
        ("B_updated_at".to_string(), Value::from(stamp())),
    ]);
    row
}

fn image_row(id: i32, product_id: i32, filename: &str, primary: bool) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("id", Value::from(id)),
        ("product_id", Value::from(product_id)),
        ("filename", Value::from(filename)),
        ("is_primary", Value::from(primary)),
        ("sort_order", Value::from(0)),
        ("created_at", Value::from(stamp())),
    ])
}

fn ledger_row(
    id: i32,
    product_id: i32,
    kind: TransactionType,
    quantity: i32,
    unit_price: i64,
) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("id", Value::from(id)),
        ("product_id", Value::from(product_id)),
        ("transaction_type", Value::from(kind.as_str())),
        ("quantity", Value::from(quantity)),
        ("unit_price", Value::from(unit_price)),
        ("total_amount", Value::from(unit_price * i64::from(quantity.abs()))),
        ("notes", Value::String(None)),
        ("created_by", Value::from("admin")),
        ("created_at", Value::from(stamp())),
    ])
}

fn count_result(total: i32) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::from(total))])
}

fn product_input(initial_stock: i32) -> ProductInput {
    ProductInput {
        reference: "AN-0042".to_string(),
        family_id: 1,
        name: "Solitaire Ring".to_string(),
        description: None,
        sale_price: Money::from_cents(45_000),
        purchase_price: Money::from_cents(20_000),
        initial_stock,
        style: None,
        material: Some("Silver".to_string()),
        weight: None,
        dimensions: None,
        is_active: true,
        featured: true,
    }
}

fn family_row(id: i32, code: &str, name: &str) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("id", Value::from(id)),
        ("code", Value::from(code)),
        ("name", Value::from(name)),
        ("description", Value::String(None)),
        ("created_at", Value::from(stamp())),
        ("updated_at", Value::from(stamp())),
    ])
}

fn count_row(family_id: i32, count: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("family_id", Value::from(family_id)),
        ("product_count", Value::from(count)),
    ])
}

#[tokio::test]
async fn test_family_list_maps_rows() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([vec![family_row(2, "BR", "Bracelets"), family_row(1, "AN", "Rings")]])
        .into_connection();
    let store = FamilyStore::new(db);

    let families = store.list().await.unwrap();

    assert_eq!(families.len(), 2);
    assert_eq!(families[0].code, "BR");
    assert_eq!(families[1].name, "Rings");
    assert!(families[1].description.is_none());
}

#[tokio::test]
async fn test_family_counts_default_to_zero() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([vec![family_row(1, "AN", "Rings"), family_row(2, "BR", "Bracelets")]])
        .append_query_results([vec![count_row(1, 4)]])
        .into_connection();
    let store = FamilyStore::new(db);

    let families = store.list_with_counts().await.unwrap();

    assert_eq!(families[0].product_count, 4);
    assert_eq!(families[1].product_count, 0);
}

#[tokio::test]
async fn test_family_find_missing_is_none() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
        .into_connection();
    let store = FamilyStore::new(db);

    assert!(store.find_by_code("ZZ").await.unwrap().is_none());
}

#[tokio::test]
async fn test_family_delete_without_rows_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let store = FamilyStore::new(db);

    let err = store.delete(42).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_product_search_filters_and_orders_public_catalog() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([vec![count_result(2)]])
        .append_query_results([vec![
            product_with_family_row(1, "AN-0001"),
            product_with_family_row(2, "AN-0002"),
        ]])
        .append_query_results([vec![
            image_row(10, 2, "b.png", false),
            image_row(11, 2, "a.png", true),
        ]])
        .into_connection();
    let db = Arc::new(db);
    let store = ProductStore::new(db.clone());

    let filter = ProductFilter {
        family_id: Some(1),
        search: Some("ring".to_string()),
        ..ProductFilter::public()
    };
    let (rows, total) = store
        .search(filter, PaginationParams::new(2, 12))
        .await
        .unwrap();

    assert_eq!(total, 2);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].family_name.as_deref(), Some("Rings"));
    assert!(rows[0].primary_image.is_none());
    // Images arrive primary first, so the first one seen per product wins
    assert_eq!(rows[1].primary_image.as_deref(), Some("b.png"));
}

#[tokio::test]
async fn test_product_search_sql() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([vec![count_result(0)]])
        .append_query_results([Vec::<BTreeMap<String, Value>>::new()])
        .into_connection();
    let db = Arc::new(db);
    let store = ProductStore::new(db.clone());

    let filter = ProductFilter {
        family_id: Some(4),
        search: Some("50%_off".to_string()),
        ..ProductFilter::public()
    };
    let (rows, _) = store
        .search(filter, PaginationParams::new(1, 12))
        .await
        .unwrap();
    assert!(rows.is_empty());

    drop(store);
    let log = transaction_log(db);
    let sql = statements(&log);

    assert_eq!(sql.len(), 2, "no image lookup for an empty page: {:?}", sql);
    assert!(sql[0].contains("COUNT(*) AS num_items"));
    let page = &sql[1];
    assert!(page.contains("`products`.`family_id` = ?"));
    assert!(page.contains("`products`.`is_active` = ?"));
    assert!(page.contains("`products`.`reference` LIKE ?"));
    assert!(page.contains("`products`.`name` LIKE ?"));
    assert!(page.contains("LEFT JOIN `product_families`"));
    assert!(page.contains("ORDER BY `products`.`featured` DESC, `products`.`reference` ASC"));
    assert!(page.contains("LIMIT ?"));
    assert!(statement_values(&log).contains(r"%50\\%\\_off%"));
}

#[tokio::test]
async fn test_product_listing_sort_falls_back_to_reference() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([Vec::<BTreeMap<String, Value>>::new()])
        .into_connection();
    let db = Arc::new(db);
    let store = ProductStore::new(db.clone());

    let filter = ProductFilter::from_query(None, None, Some("colour"), Some("sideways"));
    store.list(filter).await.unwrap();

    drop(store);
    let sql = statements(&transaction_log(db));
    assert!(sql[0].ends_with("ORDER BY `products`.`reference` ASC"));
    assert!(!sql[0].contains("WHERE"));
}

#[tokio::test]
async fn test_product_listing_newest_first_breaks_ties_by_id() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([Vec::<BTreeMap<String, Value>>::new()])
        .into_connection();
    let db = Arc::new(db);
    let store = ProductStore::new(db.clone());

    let filter = ProductFilter::from_query(None, None, Some("newest"), Some("desc"));
    store.list(filter).await.unwrap();

    drop(store);
    let sql = statements(&transaction_log(db));
    assert!(sql[0].ends_with("ORDER BY `products`.`created_at` DESC, `products`.`id` DESC"));
}

#[tokio::test]
async fn test_product_create_writes_opening_stock_and_images_in_one_transaction() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_exec_results([inserted(), inserted(), inserted()])
        .append_query_results([vec![product_row(1, "AN-0042", 5, 0)]])
        .append_query_results([vec![ledger_row(1, 1, TransactionType::Purchase, 5, 20_000)]])
        .append_query_results([vec![image_row(1, 1, "ring.png", true)]])
        .into_connection();
    let db = Arc::new(db);
    let store = ProductStore::new(db.clone());

    let product = store
        .create(NewProduct {
            input: product_input(5),
            created_by: Some("admin".to_string()),
            images: vec!["ring.png".to_string()],
        })
        .await
        .unwrap();
    assert_eq!(product.current_stock, 5);

    drop(store);
    let log = transaction_log(db);
    assert_eq!(log.len(), 1, "everything runs in one transaction");
    let sql = statements(&log);
    assert_eq!(sql.first().map(String::as_str), Some("BEGIN"));
    assert_eq!(sql.last().map(String::as_str), Some("COMMIT"));

    let inserts: Vec<&String> = sql.iter().filter(|s| s.starts_with("INSERT")).collect();
    assert_eq!(inserts.len(), 3);
    assert!(inserts[0].contains("INTO `products`"));
    assert!(inserts[1].contains("INTO `inventory_transactions`"));
    assert!(inserts[2].contains("INTO `product_images`"));

    let values = statement_values(&log);
    assert!(values.contains("\"purchase\""));
    assert!(values.contains("\"Initial stock\""));
    assert!(values.contains("BigInt(Some(100000))"), "5 x 200,00: {}", values);
}

#[tokio::test]
async fn test_product_create_without_stock_skips_ledger() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_exec_results([inserted()])
        .append_query_results([vec![product_row(1, "AN-0042", 0, 0)]])
        .into_connection();
    let db = Arc::new(db);
    let store = ProductStore::new(db.clone());

    store
        .create(NewProduct {
            input: product_input(0),
            created_by: None,
            images: Vec::new(),
        })
        .await
        .unwrap();

    drop(store);
    let sql = statements(&transaction_log(db));
    assert!(!sql.iter().any(|s| s.contains("`inventory_transactions`")));
}

// ============================================================================
// Inventory
// ============================================================================

fn sale(quantity: i32) -> StockMovement {
    StockMovement {
        product_id: 1,
        transaction_type: TransactionType::Sale,
        quantity,
        unit_price: Money::from_cents(45_000),
        notes: None,
        created_by: Some("admin".to_string()),
    }
}

#[tokio::test]
async fn test_apply_movement_writes_ledger_and_counters_together() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([vec![product_row(1, "AN-0001", 5, 2)]])
        .append_exec_results([inserted()])
        .append_query_results([vec![ledger_row(7, 1, TransactionType::Sale, 3, 45_000)]])
        .append_exec_results([inserted()])
        .append_query_results([vec![product_row(1, "AN-0001", 2, 5)]])
        .into_connection();
    let db = Arc::new(db);
    let store = InventoryStore::new(db.clone());

    let outcome = store.apply_movement(sale(3)).await.unwrap();
    let MovementOutcome::Recorded(row) = outcome else {
        panic!("expected a ledger row");
    };
    assert_eq!(row.id, 7);
    assert_eq!(row.stock_delta(), -3);

    drop(store);
    let log = transaction_log(db);
    assert_eq!(log.len(), 1);
    let sql = statements(&log);
    assert_eq!(sql.first().map(String::as_str), Some("BEGIN"));
    assert!(sql[1].contains("FOR UPDATE"));
    assert!(sql.iter().any(|s| s.starts_with("INSERT INTO `inventory_transactions`")));
    let update = sql
        .iter()
        .find(|s| s.starts_with("UPDATE `products`"))
        .expect("counters updated");
    assert!(update.contains("`current_stock` = ?"));
    assert!(update.contains("`total_sold` = ?"));
    assert_eq!(sql.last().map(String::as_str), Some("COMMIT"));

    let values = statement_values(&log);
    assert!(values.contains("BigInt(Some(135000))"), "3 x 450,00: {}", values);
}

#[tokio::test]
async fn test_apply_movement_refuses_oversell_without_writing() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([vec![product_row(1, "AN-0001", 2, 0)]])
        .into_connection();
    let db = Arc::new(db);
    let store = InventoryStore::new(db.clone());

    let err = store.apply_movement(sale(3)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    drop(store);
    let sql = statements(&transaction_log(db));
    assert!(!sql.iter().any(|s| s.starts_with("INSERT") || s.starts_with("UPDATE")));
}

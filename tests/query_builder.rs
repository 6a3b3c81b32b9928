//! Query builder integration tests: compilation of full chains and
//! execution against the recording stub driver.

use serde_json::json;
use strata_orm::{
    AttributeMap, CrudOperations, Model, ModelResult, QueryBuilder, Row, SqlDialect, StubDriver,
};

#[derive(Debug, Clone, PartialEq)]
struct Product {
    id: Option<i64>,
    name: String,
    price: i64,
}

impl Model for Product {
    type PrimaryKey = i64;

    fn table_name() -> &'static str {
        "products"
    }

    fn primary_key(&self) -> Option<i64> {
        self.id
    }

    fn set_primary_key(&mut self, key: i64) {
        self.id = Some(key);
    }

    fn clear_primary_key(&mut self) {
        self.id = None;
    }

    fn from_attributes(attributes: &AttributeMap) -> ModelResult<Self> {
        Ok(Product {
            id: attributes.get("id").and_then(|v| v.as_i64()),
            name: attributes
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            price: attributes.get("price").and_then(|v| v.as_i64()).unwrap_or(0),
        })
    }

    fn to_attributes(&self) -> AttributeMap {
        AttributeMap::from([
            ("id", json!(self.id)),
            ("name", json!(self.name)),
            ("price", json!(self.price)),
        ])
    }
}

fn product_row(id: i64, name: &str, price: i64) -> Row {
    Row::from([("id", json!(id)), ("name", json!(name)), ("price", json!(price))])
}

#[test]
fn full_chain_compiles_in_clause_order() {
    let (sql, params) = QueryBuilder::<()>::new()
        .from("products")
        .select(&["products.id", "products.name"])
        .distinct()
        .join("categories", "products.category_id", "categories.id")
        .where_eq("categories.active", true)
        .where_between("price", 10, 100)
        .where_not_null("published_at")
        .order_by_desc("price")
        .limit(25)
        .offset(50)
        .to_sql_with_params()
        .unwrap();

    assert_eq!(
        sql,
        "SELECT DISTINCT `products`.`id`, `products`.`name` FROM `products` \
         INNER JOIN `categories` ON `products`.`category_id` = `categories`.`id` \
         WHERE `categories`.`active` = ? AND `price` BETWEEN ? AND ? \
         AND `published_at` IS NOT NULL \
         ORDER BY `price` DESC LIMIT 25 OFFSET 50"
    );
    assert_eq!(params, vec![json!(true), json!(10), json!(100)]);
}

#[test]
fn reusing_a_builder_clone_leaves_the_original_untouched() {
    let base = QueryBuilder::<()>::new().from("products").where_eq("active", true);
    let narrowed = base.clone().where_eq("featured", true);

    assert_eq!(
        base.to_sql().unwrap(),
        "SELECT * FROM `products` WHERE `active` = ?"
    );
    assert_eq!(
        narrowed.to_sql().unwrap(),
        "SELECT * FROM `products` WHERE `active` = ? AND `featured` = ?"
    );
}

#[tokio::test]
async fn all_hydrates_models_from_rows() {
    let driver = StubDriver::new();
    driver.push_result(vec![product_row(1, "bolt", 3), product_row(2, "nut", 2)]);

    let products = Product::query().where_eq("price", 3).all(&driver).await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "bolt");
    assert_eq!(products[1].id, Some(2));

    let statements = driver.statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].sql,
        "SELECT * FROM `products` WHERE `price` = ?"
    );
    assert_eq!(statements[0].bindings, vec![json!(3)]);
}

#[tokio::test]
async fn one_applies_limit_without_mutating_the_builder() {
    let driver = StubDriver::new();
    driver.push_result(vec![product_row(7, "gear", 12)]);

    let query = Product::query().order_by_asc("name");
    let first = query.one(&driver).await.unwrap();
    assert_eq!(first.map(|p| p.id), Some(Some(7)));

    assert_eq!(
        driver.statements()[0].sql,
        "SELECT * FROM `products` ORDER BY `name` ASC LIMIT 1"
    );
    // Original chain still has no LIMIT
    assert_eq!(
        query.to_sql().unwrap(),
        "SELECT * FROM `products` ORDER BY `name` ASC"
    );
}

#[tokio::test]
async fn count_reads_the_aggregate_row() {
    let driver = StubDriver::new();
    driver.push_result(vec![Row::from([("aggregate", json!(42))])]);

    let count = Product::query()
        .where_condition("price", ">", 10)
        .count(&driver)
        .await
        .unwrap();
    assert_eq!(count, 42);

    assert_eq!(
        driver.statements()[0].sql,
        "SELECT COUNT(1) AS aggregate FROM `products` WHERE `price` > ?"
    );
}

#[tokio::test]
async fn exists_is_a_count_probe() {
    let driver = StubDriver::new();
    driver.push_result(vec![Row::from([("aggregate", json!(0))])]);
    assert!(!Product::query().exists(&driver).await.unwrap());

    driver.push_result(vec![Row::from([("aggregate", json!(3))])]);
    assert!(Product::query().exists(&driver).await.unwrap());
}

#[tokio::test]
async fn aggregates_over_empty_sets_are_none() {
    let driver = StubDriver::new();
    driver.push_result(vec![Row::from([("aggregate", json!(null))])]);

    let sum = Product::query().sum("price", &driver).await.unwrap();
    assert_eq!(sum, None);

    assert_eq!(
        driver.statements()[0].sql,
        "SELECT SUM(`price`) AS aggregate FROM `products`"
    );
}

#[tokio::test]
async fn max_returns_the_raw_value() {
    let driver = StubDriver::new();
    driver.push_result(vec![Row::from([("aggregate", json!(99))])]);

    let max = Product::query().max("price", &driver).await.unwrap();
    assert_eq!(max, Some(json!(99)));
}

#[tokio::test]
async fn documents_serialize_rows_as_json_objects() {
    let driver = StubDriver::new();
    driver.push_result(vec![product_row(1, "bolt", 3)]);

    let docs = Product::query().documents(&driver).await.unwrap();
    assert_eq!(docs, vec![json!({"id": 1, "name": "bolt", "price": 3})]);
}

#[tokio::test]
async fn chunk_stops_at_the_first_short_batch() {
    let driver = StubDriver::new();
    driver.push_result(vec![product_row(1, "a", 1), product_row(2, "b", 2)]);
    driver.push_result(vec![product_row(3, "c", 3)]);

    let mut seen = Vec::new();
    Product::query()
        .chunk(2, &driver, |batch| {
            seen.push(batch.len());
            Ok(true)
        })
        .await
        .unwrap();

    assert_eq!(seen, vec![2, 1]);
    let statements = driver.statements();
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].sql, "SELECT * FROM `products` LIMIT 2 OFFSET 0");
    assert_eq!(statements[1].sql, "SELECT * FROM `products` LIMIT 2 OFFSET 2");
}

#[tokio::test]
async fn chunk_by_id_pages_on_the_primary_key() {
    let driver = StubDriver::new();
    driver.push_result(vec![product_row(1, "a", 1), product_row(2, "b", 2)]);
    driver.push_result(vec![product_row(5, "c", 3)]);

    let mut ids = Vec::new();
    Product::query()
        .chunk_by_id(2, &driver, |batch| {
            ids.extend(batch.iter().map(|p| p.id));
            Ok(true)
        })
        .await
        .unwrap();

    assert_eq!(ids, vec![Some(1), Some(2), Some(5)]);
    let statements = driver.statements();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[0].sql,
        "SELECT * FROM `products` ORDER BY `id` ASC LIMIT 2"
    );
    assert_eq!(
        statements[1].sql,
        "SELECT * FROM `products` WHERE `id` > ? ORDER BY `id` ASC LIMIT 2"
    );
    assert_eq!(statements[1].bindings, vec![json!(2)]);
}

#[tokio::test]
async fn chunk_callback_can_stop_iteration() {
    let driver = StubDriver::new();
    driver.push_result(vec![product_row(1, "a", 1), product_row(2, "b", 2)]);
    driver.push_result(vec![product_row(3, "c", 3), product_row(4, "d", 4)]);

    let mut batches = 0;
    Product::query()
        .chunk(2, &driver, |_| {
            batches += 1;
            Ok(false)
        })
        .await
        .unwrap();

    assert_eq!(batches, 1);
    assert_eq!(driver.statement_count(), 1);
}

#[tokio::test]
async fn rejects_non_positive_chunk_sizes() {
    let driver = StubDriver::new();
    let result = Product::query().chunk(0, &driver, |_| Ok(true)).await;
    assert!(result.is_err());
    assert_eq!(driver.statement_count(), 0);
}

#[tokio::test]
async fn postgres_dialect_flows_from_the_driver() {
    let driver = StubDriver::new().with_dialect(SqlDialect::Postgres);
    driver.push_result(vec![]);

    Product::query()
        .where_in("id", vec![1, 2])
        .all(&driver)
        .await
        .unwrap();

    assert_eq!(
        driver.statements()[0].sql,
        "SELECT * FROM \"products\" WHERE \"id\" IN ($1, $2)"
    );
}

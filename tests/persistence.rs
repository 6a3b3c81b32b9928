//! Persistence integration tests: create/update/delete/save contracts
//! against the recording stub driver.

use serde_json::json;
use strata_orm::{
    AttributeMap, Condition, CrudOperations, Model, ModelError, ModelResult, Row, StubDriver,
};

#[derive(Debug, Clone, PartialEq)]
struct Account {
    id: Option<i64>,
    email: String,
    active: bool,
}

impl Account {
    fn new(email: &str) -> Self {
        Account {
            id: None,
            email: email.to_string(),
            active: true,
        }
    }
}

impl Model for Account {
    type PrimaryKey = i64;

    fn table_name() -> &'static str {
        "accounts"
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
        Ok(Account {
            id: attributes.get("id").and_then(|v| v.as_i64()),
            email: attributes
                .get("email")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            active: attributes
                .get("active")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        })
    }

    fn to_attributes(&self) -> AttributeMap {
        AttributeMap::from([
            ("id", json!(self.id)),
            ("email", json!(self.email)),
            ("active", json!(self.active)),
        ])
    }
}

#[tokio::test]
async fn create_captures_the_generated_key_without_a_select() {
    let driver = StubDriver::new();

    let created = Account::new("a@example.com")
        .create(&driver)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.id, Some(1));
    assert_eq!(created.email, "a@example.com");

    // Exactly one statement: the INSERT. The key comes from the driver,
    // not from a follow-up SELECT.
    let statements = driver.statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].sql,
        "INSERT INTO `accounts` (`email`, `active`) VALUES (?, ?)"
    );
    assert_eq!(statements[0].bindings, vec![json!("a@example.com"), json!(true)]);
}

#[tokio::test]
async fn each_create_adopts_the_key_from_its_own_insert() {
    let driver = StubDriver::new();

    let first = Account::new("one@example.com")
        .create(&driver)
        .await
        .unwrap()
        .unwrap();
    let second = Account::new("two@example.com")
        .create(&driver)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.id, Some(1));
    assert_eq!(second.id, Some(2));

    // One statement per create: the generated key arrives with the
    // INSERT itself, never from a separate session-scoped lookup that
    // another insert could interleave with
    assert_eq!(driver.statement_count(), 2);
}

#[tokio::test]
async fn create_keeps_a_preassigned_key() {
    let driver = StubDriver::new();
    let mut account = Account::new("b@example.com");
    account.id = Some(99);

    let created = account.create(&driver).await.unwrap().unwrap();
    assert_eq!(created.id, Some(99));
    assert_eq!(
        driver.statements()[0].sql,
        "INSERT INTO `accounts` (`id`, `email`, `active`) VALUES (?, ?, ?)"
    );
}

#[tokio::test]
async fn update_without_a_key_is_a_silent_no_op() {
    let driver = StubDriver::new();
    let account = Account::new("c@example.com");

    assert!(!account.update(&driver).await.unwrap());
    assert_eq!(driver.statement_count(), 0);
}

#[tokio::test]
async fn update_binds_the_key_last() {
    let driver = StubDriver::new();
    let mut account = Account::new("d@example.com");
    account.id = Some(7);

    assert!(account.update(&driver).await.unwrap());
    let statements = driver.statements();
    assert_eq!(
        statements[0].sql,
        "UPDATE `accounts` SET `email` = ?, `active` = ? WHERE `id` = ?"
    );
    assert_eq!(
        statements[0].bindings,
        vec![json!("d@example.com"), json!(true), json!(7)]
    );
}

#[tokio::test]
async fn repeated_updates_of_unchanged_state_are_byte_identical() {
    let driver = StubDriver::new();
    let mut account = Account::new("e@example.com");
    account.id = Some(3);

    account.update(&driver).await.unwrap();
    account.update(&driver).await.unwrap();

    let statements = driver.statements();
    assert_eq!(statements[0], statements[1]);
}

#[tokio::test]
async fn delete_clears_the_key_so_save_reinserts() {
    let driver = StubDriver::new();
    let mut account = Account::new("f@example.com");
    account.id = Some(5);

    assert!(account.delete(&driver).await.unwrap());
    assert_eq!(account.id, None);

    // A second delete has nothing to target: no SQL, false
    let count_after_first = driver.statement_count();
    assert!(!account.delete(&driver).await.unwrap());
    assert_eq!(driver.statement_count(), count_after_first);

    // Saving the same model now inserts a fresh row
    assert!(account.save(&driver).await.unwrap());
    let statements = driver.statements();
    assert_eq!(
        statements[0].sql,
        "DELETE FROM `accounts` WHERE `id` = ?"
    );
    assert!(statements[1].sql.starts_with("INSERT INTO `accounts`"));
    assert_eq!(account.id, Some(1));
}

#[tokio::test]
async fn save_routes_on_key_presence() {
    let driver = StubDriver::new();
    let mut account = Account::new("g@example.com");

    // Transient: save inserts and adopts the generated key
    assert!(account.save(&driver).await.unwrap());
    assert_eq!(account.id, Some(1));

    // Persisted: save updates in place
    account.email = "g2@example.com".to_string();
    assert!(account.save(&driver).await.unwrap());

    let statements = driver.statements();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].sql.starts_with("INSERT INTO `accounts`"));
    assert!(statements[1].sql.starts_with("UPDATE `accounts` SET"));
    assert_eq!(statements[1].bindings.last(), Some(&json!(1)));
}

#[tokio::test]
async fn find_by_key_and_by_map() {
    let driver = StubDriver::new();
    driver.push_result(vec![Row::from([
        ("id", json!(4)),
        ("email", json!("h@example.com")),
        ("active", json!(true)),
    ])]);

    let found = Account::find(4, &driver).await.unwrap().unwrap();
    assert_eq!(found.email, "h@example.com");
    assert_eq!(
        driver.statements()[0].sql,
        "SELECT * FROM `accounts` WHERE `id` = ? LIMIT 1"
    );

    driver.clear_log();
    driver.push_result(vec![]);
    let missing = Account::find(
        Condition::from([("email", json!("x@example.com")), ("active", json!(true))]),
        &driver,
    )
    .await
    .unwrap();
    assert!(missing.is_none());
    assert_eq!(
        driver.statements()[0].sql,
        "SELECT * FROM `accounts` WHERE `email` = ? AND `active` = ? LIMIT 1"
    );
}

#[tokio::test]
async fn find_all_returns_every_match() {
    let driver = StubDriver::new();
    driver.push_result(vec![
        Row::from([("id", json!(1)), ("email", json!("a@x")), ("active", json!(true))]),
        Row::from([("id", json!(2)), ("email", json!("b@x")), ("active", json!(true))]),
    ]);

    let accounts = Account::find_all(Condition::expr("active", "=", true), &driver)
        .await
        .unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts.first().map(|a| a.id), Some(Some(1)));
}

#[tokio::test]
async fn find_or_fail_names_entity_and_condition() {
    let driver = StubDriver::new();
    driver.push_result(vec![]);

    let err = Account::find_or_fail(42, &driver).await.unwrap_err();
    assert!(matches!(err, ModelError::NotFound { .. }));
    assert_eq!(err.to_string(), "accounts not found for id = 42");
}

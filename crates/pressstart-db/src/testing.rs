//! Test harness: each database test gets its own freshly migrated schema.
//!
//! Database tests are `#[ignore]`d by default. Run them with
//! `PRESSSTART_TEST_DATABASE_URL` set and `cargo test -- --ignored`;
//! [`TestDb::new`] panics if the variable is missing.

use pressstart_core::{
    Employee, Item, Member, NewEmployee, NewItem, NewMember, NewStore, Store,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{Database, DbConfig};

pub(crate) const TEST_DATABASE_URL: &str = "PRESSSTART_TEST_DATABASE_URL";

fn database_url<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(TEST_DATABASE_URL) {
        Some(url) if !url.trim().is_empty() => url,
        _ => panic!("{TEST_DATABASE_URL} must be set to run database tests"),
    }
}

pub(crate) struct TestDb {
    pub db: Database,
    admin: PgPool,
    schema: String,
}

impl TestDb {
    pub async fn new() -> Self {
        let url = database_url(|key| std::env::var(key).ok());

        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .expect("connect to test database");

        let schema = format!("test_{}", Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&admin)
            .await
            .expect("create test schema");

        let db = Database::connect(DbConfig::new(url).max_connections(4).schema(schema.clone()))
            .await
            .expect("connect and migrate test schema");

        TestDb { db, admin, schema }
    }

    pub async fn teardown(self) {
        self.db.close().await;
        sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.schema))
            .execute(&self.admin)
            .await
            .expect("drop test schema");
        self.admin.close().await;
    }

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------

    pub async fn store(&self) -> Store {
        self.db
            .stores()
            .create(&NewStore {
                store_address: "100 Queen St W, Toronto".into(),
                store_postal_code: "M5H2N2".into(),
                store_province: "ON".into(),
                store_phone: "4165550100".into(),
            })
            .await
            .expect("create store")
    }

    pub async fn item_type(&self, name: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO tbl_item_types (item_type_name, item_type_value_cents) \
             VALUES ($1, 500) RETURNING item_type_id",
        )
        .bind(name)
        .fetch_one(self.db.pool())
        .await
        .expect("create item type")
    }

    pub fn new_item(store_id: i64, item_type_id: i64, name: &str) -> NewItem {
        NewItem {
            item_type_id,
            store_id,
            condition_id: 1,
            item_name: name.into(),
            item_cost_cents: 1500,
            item_sale_price_cents: 2999,
            item_msrp_cents: 3999,
            item_stock_quantity: 5,
            item_description: None,
        }
    }

    pub async fn item(&self, store_id: i64, item_type_id: i64, name: &str) -> Item {
        self.db
            .inventory()
            .create(&Self::new_item(store_id, item_type_id, name))
            .await
            .expect("create item")
    }

    pub fn new_member(email: &str, first: &str, last: &str) -> NewMember {
        NewMember {
            preferred_store_id: None,
            member_first_name: first.into(),
            member_last_name: last.into(),
            member_postal_code: None,
            member_phone: None,
            member_email: email.into(),
            member_mailing_list: false,
            password: "password123".into(),
        }
    }

    pub async fn member(&self, email: &str) -> Member {
        self.db
            .members()
            .create(&Self::new_member(email, "Test", "Member"))
            .await
            .expect("create member")
    }

    pub fn new_employee(email: &str, first: &str, job_title: &str) -> NewEmployee {
        NewEmployee {
            employee_first_name: first.into(),
            employee_last_name: "Staff".into(),
            employee_job_title: job_title.into(),
            employee_phone: None,
            employee_email: email.into(),
            employee_address: None,
            employee_postal_code: None,
            employee_availability: None,
            employee_wage_cents: 1650,
            employee_manager: false,
            password: "password123".into(),
        }
    }

    pub async fn employee(&self, email: &str) -> Employee {
        self.db
            .employees()
            .create(&Self::new_employee(email, "Test", "Sales Associate"))
            .await
            .expect("create employee")
    }

    /// Row count of `table`, for asserting nothing was persisted.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.db.pool())
            .await
            .expect("count rows")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_from_lookup() {
        let url = database_url(|_| Some("postgres://ci@localhost/ci".to_string()));
        assert_eq!(url, "postgres://ci@localhost/ci");
    }

    #[test]
    #[should_panic(expected = "PRESSSTART_TEST_DATABASE_URL must be set")]
    fn test_missing_database_url_panics() {
        database_url(|_| None);
    }

    #[test]
    #[should_panic(expected = "PRESSSTART_TEST_DATABASE_URL must be set")]
    fn test_blank_database_url_panics() {
        database_url(|_| Some("  ".to_string()));
    }
}

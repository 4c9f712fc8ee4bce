//! # Inventory Repository
//!
//! Database operations for stocked items and item types.
//!
//! ## Search Fields
//! ```text
//! ┌──────────────┬──────────────┬──────────────────────────────┐
//! │ key          │ column       │ match                        │
//! ├──────────────┼──────────────┼──────────────────────────────┤
//! │ id           │ item_id      │ = (overrides everything)     │
//! │ storeId      │ store_id     │ =                            │
//! │ name         │ item_name    │ ILIKE prefix                 │
//! │ itemType     │ item_type_id │ =                            │
//! └──────────────┴──────────────┴──────────────────────────────┘
//! ```

use pressstart_core::search::entities::INVENTORY;
use pressstart_core::{Item, ItemType, NewItem, SearchCriteria, DEFAULT_PAGE_LIMIT};
use sqlx::PgPool;
use tracing::debug;

use super::{clamp_limit, fetch_all, fetch_by_id, fetch_search, validated, write_failed};
use crate::error::{DbError, DbResult};

/// Repository for inventory.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: PgPool) -> Self {
        InventoryRepository { pool }
    }

    /// Searches inventory by `id`, `storeId`, `name` (prefix) and `itemType`.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let criteria = SearchCriteria::new().with("storeId", 2).with("name", "Zelda");
    /// let items = db.inventory().search(&criteria).await?;
    /// ```
    pub async fn search(&self, criteria: &SearchCriteria) -> DbResult<Vec<Item>> {
        fetch_search(&self.pool, &INVENTORY, criteria).await
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        fetch_by_id(&self.pool, &INVENTORY, id).await
    }

    pub async fn all(&self) -> DbResult<Vec<Item>> {
        fetch_all(&self.pool, &INVENTORY).await
    }

    /// One page of inventory ordered by id.
    ///
    /// ## Arguments
    /// * `page` - 1-based; anything below 1 is treated as 1
    /// * `page_limit` - rows per page, clamped to `1..=MAX_PAGE_LIMIT`
    pub async fn page(&self, page: i64, page_limit: i64) -> DbResult<Vec<Item>> {
        let limit = clamp_limit(page_limit);
        let offset = (page.max(1) - 1).saturating_mul(limit);

        debug!(page, limit, offset, "Fetching inventory page");

        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM tbl_items ORDER BY item_id LIMIT $1 OFFSET $2",
            INVENTORY.columns
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// The first page at the default page size.
    pub async fn first_page(&self) -> DbResult<Vec<Item>> {
        self.page(1, DEFAULT_PAGE_LIMIT).await
    }

    /// All item types, ordered by id.
    pub async fn item_types(&self) -> DbResult<Vec<ItemType>> {
        let types = sqlx::query_as::<_, ItemType>(
            r#"
            SELECT item_type_id, item_type_name, item_type_description, item_type_value_cents
            FROM tbl_item_types
            ORDER BY item_type_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    /// Adds an item to inventory.
    pub async fn create(&self, item: &NewItem) -> DbResult<Item> {
        validated("item", item)?;
        debug!(store_id = item.store_id, name = %item.item_name, "Creating item");

        let created = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO tbl_items (
                item_type_id, store_id, condition_id, item_name,
                item_cost_cents, item_sale_price_cents, item_msrp_cents,
                item_stock_quantity, item_description
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            INVENTORY.columns
        ))
        .bind(item.item_type_id)
        .bind(item.store_id)
        .bind(item.condition_id)
        .bind(&item.item_name)
        .bind(item.item_cost_cents)
        .bind(item.item_sale_price_cents)
        .bind(item.item_msrp_cents)
        .bind(item.item_stock_quantity)
        .bind(&item.item_description)
        .fetch_one(&self.pool)
        .await
        .map_err(write_failed("item", "insert"))?;

        Ok(created)
    }

    /// Replaces every mutable column of `item`.
    ///
    /// ## Errors
    /// `DbError::NotFound` when no item has `item.item_id`.
    pub async fn update(&self, item: &Item) -> DbResult<Item> {
        validated("item", item)?;
        debug!(id = item.item_id, "Updating item");

        let updated = sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE tbl_items SET
                item_type_id = $1,
                store_id = $2,
                condition_id = $3,
                item_name = $4,
                item_cost_cents = $5,
                item_sale_price_cents = $6,
                item_msrp_cents = $7,
                item_stock_quantity = $8,
                item_description = $9
            WHERE item_id = $10
            RETURNING {}
            "#,
            INVENTORY.columns
        ))
        .bind(item.item_type_id)
        .bind(item.store_id)
        .bind(item.condition_id)
        .bind(&item.item_name)
        .bind(item.item_cost_cents)
        .bind(item.item_sale_price_cents)
        .bind(item.item_msrp_cents)
        .bind(item.item_stock_quantity)
        .bind(&item.item_description)
        .bind(item.item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_failed("item", "update"))?;

        updated.ok_or_else(|| DbError::not_found("Item", item.item_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::testing::TestDb;
    use pressstart_core::{SearchCriteria, ValidationError};

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_create_then_get_round_trip() {
        let test = TestDb::new().await;
        let store = test.store().await;
        let games = test.item_type("Game").await;

        let new_item = TestDb::new_item(store.store_id, games, "Chrono Trigger");
        let created = test.db.inventory().create(&new_item).await.unwrap();
        let fetched = test.db.inventory().get_by_id(created.item_id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.item_name, new_item.item_name);
        assert_eq!(fetched.store_id, new_item.store_id);
        assert_eq!(fetched.item_sale_price_cents, new_item.item_sale_price_cents);
        assert_eq!(fetched.item_stock_quantity, new_item.item_stock_quantity);

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_search_store_and_name() {
        let test = TestDb::new().await;
        let downtown = test.store().await;
        let uptown = test.store().await;
        let games = test.item_type("Game").await;

        let botw = test.item(downtown.store_id, games, "Zelda: Breath of the Wild").await;
        test.item(downtown.store_id, games, "Metroid Dread").await;
        test.item(uptown.store_id, games, "Zelda: Tears of the Kingdom").await;

        let criteria = SearchCriteria::new()
            .with("name", "zel")
            .with("storeId", downtown.store_id);
        let found = test.db.inventory().search(&criteria).await.unwrap();

        assert_eq!(found, vec![botw]);

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_search_by_id_ignores_other_keys() {
        let test = TestDb::new().await;
        let store = test.store().await;
        let games = test.item_type("Game").await;
        let item = test.item(store.store_id, games, "F-Zero").await;

        let criteria = SearchCriteria::new()
            .with("id", item.item_id)
            .with("name", "does not match");
        assert_eq!(test.db.inventory().search(&criteria).await.unwrap(), vec![item.clone()]);

        let missing = SearchCriteria::new().with("id", item.item_id + 1000);
        assert!(test.db.inventory().search(&missing).await.unwrap().is_empty());

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_search_without_criteria_is_validation_error() {
        let test = TestDb::new().await;

        let err = test
            .db
            .inventory()
            .search(&SearchCriteria::new().with("colour", "red"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Invalid(ValidationError::NoSearchCriteria { .. })
        ));

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_page() {
        let test = TestDb::new().await;
        let store = test.store().await;
        let games = test.item_type("Game").await;
        for n in 0..5 {
            test.item(store.store_id, games, &format!("Mega Man {}", n + 1)).await;
        }

        let inventory = test.db.inventory();
        let first = inventory.page(1, 2).await.unwrap();
        let third = inventory.page(3, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].item_name, "Mega Man 5");
        assert_eq!(inventory.page(0, 2).await.unwrap(), first);
        assert_eq!(inventory.first_page().await.unwrap().len(), 5);

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_update() {
        let test = TestDb::new().await;
        let store = test.store().await;
        let games = test.item_type("Game").await;
        let mut item = test.item(store.store_id, games, "Earthbound").await;

        item.item_sale_price_cents = 19_999;
        item.item_stock_quantity = 1;
        let updated = test.db.inventory().update(&item).await.unwrap();
        assert_eq!(updated, item);

        item.item_id += 1000;
        assert!(test.db.inventory().update(&item).await.unwrap_err().is_not_found());

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_create_with_unknown_store_is_foreign_key_violation() {
        let test = TestDb::new().await;
        let games = test.item_type("Game").await;

        let err = test
            .db
            .inventory()
            .create(&TestDb::new_item(4242, games, "Orphan"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_item_types() {
        let test = TestDb::new().await;
        test.item_type("Console").await;
        test.item_type("Game").await;

        let names: Vec<String> = test
            .db
            .inventory()
            .item_types()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.item_type_name)
            .collect();
        assert_eq!(names, ["Console", "Game"]);

        test.teardown().await;
    }
}

//! # Store Repository
//!
//! Store locations. Stores are reference data: listed, fetched and opened,
//! never searched.

use pressstart_core::{NewStore, Store};
use sqlx::PgPool;
use tracing::debug;

use super::{validated, write_failed};
use crate::error::DbResult;

const COLUMNS: &str = "store_id, store_address, store_postal_code, store_province, store_phone";

/// Repository for store locations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: PgPool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: PgPool) -> Self {
        StoreRepository { pool }
    }

    /// All stores, ordered by id.
    pub async fn all(&self) -> DbResult<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>(&format!(
            "SELECT {COLUMNS} FROM tbl_stores ORDER BY store_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "SELECT {COLUMNS} FROM tbl_stores WHERE store_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Opens a new store.
    pub async fn create(&self, store: &NewStore) -> DbResult<Store> {
        validated("store", store)?;
        debug!(province = %store.store_province, "Creating store");

        let created = sqlx::query_as::<_, Store>(&format!(
            r#"
            INSERT INTO tbl_stores (store_address, store_postal_code, store_province, store_phone)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&store.store_address)
        .bind(store.store_postal_code.to_ascii_uppercase())
        .bind(&store.store_province)
        .bind(&store.store_phone)
        .fetch_one(&self.pool)
        .await
        .map_err(write_failed("store", "insert"))?;

        Ok(created)
    }
}

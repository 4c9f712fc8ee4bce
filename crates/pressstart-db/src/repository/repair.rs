//! # Repair Repository
//!
//! Repair tickets, the parts used on them and the status workflow.
//!
//! ```text
//! Received → Diagnosing → In Progress → Ready → Collected
//! ```
//!
//! Statuses are rows in `tbl_repair_status`; the ordering above is seeded by
//! the initial migration and is not enforced on transitions.

use pressstart_core::search::entities::REPAIRS;
use pressstart_core::validation::validate_id;
use pressstart_core::{
    Invoice, NewRepairInvoice, NewRepairItem, RepairInvoice, RepairItem, RepairStatus,
    SearchCriteria,
};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use tracing::info;

use super::{fetch_all, fetch_by_id, fetch_search, write_failed};
use crate::error::{DbError, DbResult};
use crate::transaction::{write_invoice, InvoiceWrite, LineItemWrite};

/// Repository for repairs.
#[derive(Debug, Clone)]
pub struct RepairRepository {
    pool: PgPool,
}

impl RepairRepository {
    /// Creates a new RepairRepository.
    pub fn new(pool: PgPool) -> Self {
        RepairRepository { pool }
    }

    /// Searches repairs by `id`, `customerId`, `employeeId`, `statusId` and
    /// `description` (prefix).
    pub async fn search(&self, criteria: &SearchCriteria) -> DbResult<Vec<RepairInvoice>> {
        fetch_search(&self.pool, &REPAIRS, criteria).await
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<RepairInvoice>> {
        fetch_by_id(&self.pool, &REPAIRS, id).await
    }

    pub async fn all(&self) -> DbResult<Vec<RepairInvoice>> {
        fetch_all(&self.pool, &REPAIRS).await
    }

    /// Parts used on a repair.
    pub async fn line_items(&self, repair_invoice_id: i64) -> DbResult<Vec<RepairItem>> {
        let items = sqlx::query_as::<_, RepairItem>(
            r#"
            SELECT repair_item_id, repair_invoice_id, repair_part_name,
                   repair_item_part_description, repair_item_cost_cents
            FROM tbl_repair_items
            WHERE repair_invoice_id = $1
            ORDER BY repair_item_id
            "#,
        )
        .bind(repair_invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Opens a repair ticket with its parts.
    pub async fn create(
        &self,
        repair: &NewRepairInvoice,
        parts: &[NewRepairItem],
    ) -> DbResult<Invoice<RepairInvoice, RepairItem>> {
        write_invoice(&self.pool, repair, parts).await
    }

    /// Every workflow status, in workflow order.
    pub async fn statuses(&self) -> DbResult<Vec<RepairStatus>> {
        let statuses = sqlx::query_as::<_, RepairStatus>(
            r#"
            SELECT repair_status_id, repair_status_name, repair_status_description
            FROM tbl_repair_status
            ORDER BY repair_status_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(statuses)
    }

    /// Moves a repair to another status.
    ///
    /// ## Errors
    /// - `DbError::NotFound` when the repair doesn't exist
    /// - `DbError::ForeignKeyViolation` when the status doesn't exist
    pub async fn set_status(&self, repair_invoice_id: i64, status_id: i64) -> DbResult<RepairInvoice> {
        validate_id("repair_status_id", status_id)?;

        let updated = sqlx::query_as::<_, RepairInvoice>(&format!(
            r#"
            UPDATE tbl_repair_invoices SET repair_status_id = $1
            WHERE repair_invoice_id = $2
            RETURNING {}
            "#,
            REPAIRS.columns
        ))
        .bind(status_id)
        .bind(repair_invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_failed("repair", "set_status"))?
        .ok_or_else(|| DbError::not_found("Repair", repair_invoice_id))?;

        info!(id = repair_invoice_id, status_id, "Repair status changed");
        Ok(updated)
    }
}

impl InvoiceWrite for NewRepairInvoice {
    type Row = RepairInvoice;
    const ENTITY: &'static str = "repair";

    fn insert(&self) -> QueryAs<'_, Postgres, RepairInvoice, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO tbl_repair_invoices (
                customer_id, employee_id, repair_status_id,
                repair_invoice_description, repair_invoice_labour_cost_cents
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING repair_invoice_id, customer_id, employee_id, repair_status_id,
                      repair_invoice_description, repair_invoice_labour_cost_cents
            "#,
        )
        .bind(self.customer_id)
        .bind(self.employee_id)
        .bind(self.repair_status_id)
        .bind(&self.repair_invoice_description)
        .bind(self.repair_invoice_labour_cost_cents)
    }

    fn id_of(row: &RepairInvoice) -> i64 {
        row.repair_invoice_id
    }
}

impl LineItemWrite for NewRepairItem {
    type Row = RepairItem;

    fn insert(&self, repair_invoice_id: i64) -> QueryAs<'_, Postgres, RepairItem, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO tbl_repair_items (
                repair_invoice_id, repair_part_name, repair_item_part_description,
                repair_item_cost_cents
            ) VALUES ($1, $2, $3, $4)
            RETURNING repair_item_id, repair_invoice_id, repair_part_name,
                      repair_item_part_description, repair_item_cost_cents
            "#,
        )
        .bind(repair_invoice_id)
        .bind(&self.repair_part_name)
        .bind(&self.repair_item_part_description)
        .bind(self.repair_item_cost_cents)
    }
}

//! # Sale Repository
//!
//! Point-of-sale invoices and their lines.
//!
//! A sale is written as one unit: the invoice header and every line go in
//! together or not at all (see `transaction.rs`).

use pressstart_core::search::entities::SALES;
use pressstart_core::{Invoice, NewSaleInvoice, NewSaleItem, SaleInvoice, SaleItem, SearchCriteria};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use super::{fetch_all, fetch_by_id, fetch_search};
use crate::error::DbResult;
use crate::transaction::{write_invoice, InvoiceWrite, LineItemWrite};

/// Repository for sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: PgPool) -> Self {
        SaleRepository { pool }
    }

    /// Searches sales by `id`, `customerId`, `employeeId` and `storeId`.
    pub async fn search(&self, criteria: &SearchCriteria) -> DbResult<Vec<SaleInvoice>> {
        fetch_search(&self.pool, &SALES, criteria).await
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<SaleInvoice>> {
        fetch_by_id(&self.pool, &SALES, id).await
    }

    pub async fn all(&self) -> DbResult<Vec<SaleInvoice>> {
        fetch_all(&self.pool, &SALES).await
    }

    /// Lines of a sale in the order they were rung up.
    pub async fn line_items(&self, invoice_id: i64) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT sale_item_id, invoice_id, item_id, sale_item_quantity, sale_item_price_cents
            FROM tbl_sale_items
            WHERE invoice_id = $1
            ORDER BY sale_item_id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Records a sale and all its lines atomically.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let sale = db.sales().create(&header, &[line_a, line_b]).await?;
    /// println!("{} lines, total {}", sale.items.len(), sale.lines_total());
    /// ```
    pub async fn create(
        &self,
        invoice: &NewSaleInvoice,
        items: &[NewSaleItem],
    ) -> DbResult<Invoice<SaleInvoice, SaleItem>> {
        write_invoice(&self.pool, invoice, items).await
    }
}

impl InvoiceWrite for NewSaleInvoice {
    type Row = SaleInvoice;
    const ENTITY: &'static str = "sale";

    fn insert(&self) -> QueryAs<'_, Postgres, SaleInvoice, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO tbl_sale_invoices (
                customer_id, employee_id, store_id, sale_invoice_date,
                sale_invoice_trade_value_paid_cents
            ) VALUES ($1, $2, $3, COALESCE($4, now()), $5)
            RETURNING invoice_id, customer_id, employee_id, store_id, sale_invoice_date,
                      sale_invoice_trade_value_paid_cents
            "#,
        )
        .bind(self.customer_id)
        .bind(self.employee_id)
        .bind(self.store_id)
        .bind(self.sale_invoice_date)
        .bind(self.sale_invoice_trade_value_paid_cents)
    }

    fn id_of(row: &SaleInvoice) -> i64 {
        row.invoice_id
    }
}

impl LineItemWrite for NewSaleItem {
    type Row = SaleItem;

    fn insert(&self, invoice_id: i64) -> QueryAs<'_, Postgres, SaleItem, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO tbl_sale_items (invoice_id, item_id, sale_item_quantity, sale_item_price_cents)
            VALUES ($1, $2, $3, $4)
            RETURNING sale_item_id, invoice_id, item_id, sale_item_quantity, sale_item_price_cents
            "#,
        )
        .bind(invoice_id)
        .bind(self.item_id)
        .bind(self.sale_item_quantity)
        .bind(self.sale_item_price_cents)
    }
}

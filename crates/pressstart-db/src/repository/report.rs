//! # Report Repository
//!
//! Read-only aggregates over sales for the back office.
//!
//! ```text
//! tbl_sale_invoices ──< tbl_sale_items >── tbl_items
//!        │
//!        └── tbl_stores
//!
//! items_report  → one row per item sold:  quantity, revenue
//! store_sales   → one row per store:      invoices, revenue, trade credit
//! ```
//!
//! Both reports take an optional [`DateRange`]; without one they cover all
//! time. Revenue is `quantity × unit price` summed over lines.

use pressstart_core::{DateRange, ItemsReportRow, StoreSalesRow};
use sqlx::PgPool;
use tracing::debug;

use super::clamp_limit;
use crate::error::DbResult;

/// Repository for reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: PgPool) -> Self {
        ReportRepository { pool }
    }

    /// Best-selling items, by revenue then id.
    ///
    /// ## Arguments
    /// * `range` - restrict to invoices dated in `[from, to)`
    /// * `limit` - maximum rows, clamped to `1..=MAX_PAGE_LIMIT`
    pub async fn items_report(
        &self,
        range: Option<DateRange>,
        limit: i64,
    ) -> DbResult<Vec<ItemsReportRow>> {
        let limit = clamp_limit(limit);
        debug!(?range, limit, "Running items report");

        let rows = sqlx::query_as::<_, ItemsReportRow>(
            r#"
            SELECT
                i.item_id,
                i.item_name,
                CAST(SUM(si.sale_item_quantity) AS BIGINT) AS quantity_sold,
                CAST(SUM(si.sale_item_quantity * si.sale_item_price_cents) AS BIGINT) AS revenue_cents
            FROM tbl_sale_items si
            JOIN tbl_items i ON i.item_id = si.item_id
            JOIN tbl_sale_invoices s ON s.invoice_id = si.invoice_id
            WHERE ($1::timestamptz IS NULL OR s.sale_invoice_date >= $1)
              AND ($2::timestamptz IS NULL OR s.sale_invoice_date < $2)
            GROUP BY i.item_id, i.item_name
            ORDER BY revenue_cents DESC, i.item_id
            LIMIT $3
            "#,
        )
        .bind(range.map(|r| r.from))
        .bind(range.map(|r| r.to))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Sales per store, ordered by store id. Stores without sales report zeros.
    pub async fn store_sales(&self, range: Option<DateRange>) -> DbResult<Vec<StoreSalesRow>> {
        debug!(?range, "Running store sales report");

        let rows = sqlx::query_as::<_, StoreSalesRow>(
            r#"
            WITH invoice_totals AS (
                SELECT
                    s.invoice_id,
                    s.store_id,
                    s.sale_invoice_trade_value_paid_cents,
                    COALESCE((
                        SELECT SUM(si.sale_item_quantity * si.sale_item_price_cents)
                        FROM tbl_sale_items si
                        WHERE si.invoice_id = s.invoice_id
                    ), 0) AS total_cents
                FROM tbl_sale_invoices s
                WHERE ($1::timestamptz IS NULL OR s.sale_invoice_date >= $1)
                  AND ($2::timestamptz IS NULL OR s.sale_invoice_date < $2)
            )
            SELECT
                st.store_id,
                st.store_address,
                COUNT(t.invoice_id) AS invoice_count,
                CAST(COALESCE(SUM(t.total_cents), 0) AS BIGINT) AS revenue_cents,
                CAST(COALESCE(SUM(t.sale_invoice_trade_value_paid_cents), 0) AS BIGINT)
                    AS trade_value_paid_cents
            FROM tbl_stores st
            LEFT JOIN invoice_totals t ON t.store_id = st.store_id
            GROUP BY st.store_id, st.store_address
            ORDER BY st.store_id
            "#,
        )
        .bind(range.map(|r| r.from))
        .bind(range.map(|r| r.to))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::TestDb;
    use chrono::{TimeZone, Utc};
    use pressstart_core::{DateRange, NewSaleInvoice, NewSaleItem};

    struct Fixture {
        store_id: i64,
        quiet_store_id: i64,
        mario: i64,
        zelda: i64,
    }

    /// Two sales: one in March 2024, one in April 2024.
    async fn seed(test: &TestDb) -> Fixture {
        let store = test.store().await;
        let quiet = test.store().await;
        let clerk = test.employee("reports@pressstart.ca").await;
        let games = test.item_type("Game").await;
        let mario = test.item(store.store_id, games, "Super Mario 64").await.item_id;
        let zelda = test.item(store.store_id, games, "Ocarina of Time").await.item_id;

        let header = |month: u32, trade_paid: i64| NewSaleInvoice {
            customer_id: None,
            employee_id: clerk.employee_id,
            store_id: store.store_id,
            sale_invoice_date: Some(Utc.with_ymd_and_hms(2024, month, 15, 12, 0, 0).unwrap()),
            sale_invoice_trade_value_paid_cents: trade_paid,
        };
        let line = |item_id, quantity, price| NewSaleItem {
            item_id,
            sale_item_quantity: quantity,
            sale_item_price_cents: price,
        };

        test.db
            .sales()
            .create(&header(3, 500), &[line(mario, 2, 3000), line(zelda, 1, 4000)])
            .await
            .unwrap();
        test.db
            .sales()
            .create(&header(4, 0), &[line(zelda, 3, 4000)])
            .await
            .unwrap();

        Fixture {
            store_id: store.store_id,
            quiet_store_id: quiet.store_id,
            mario,
            zelda,
        }
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_items_report_all_time() {
        let test = TestDb::new().await;
        let fx = seed(&test).await;

        let rows = test.db.reports().items_report(None, 10).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item_id, fx.zelda);
        assert_eq!(rows[0].quantity_sold, 4);
        assert_eq!(rows[0].revenue_cents, 16_000);
        assert_eq!(rows[1].item_id, fx.mario);
        assert_eq!(rows[1].revenue().to_string(), "$60.00");

        let top = test.db.reports().items_report(None, 1).await.unwrap();
        assert_eq!(top.len(), 1);

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_items_report_for_month() {
        let test = TestDb::new().await;
        let fx = seed(&test).await;

        let march = DateRange::month(2024, 3).unwrap();
        let rows = test.db.reports().items_report(Some(march), 10).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item_id, fx.mario);
        assert_eq!(rows[0].revenue_cents, 6000);
        assert_eq!(rows[1].revenue_cents, 4000);

        let may = DateRange::month(2024, 5).unwrap();
        assert!(test.db.reports().items_report(Some(may), 10).await.unwrap().is_empty());

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_store_sales() {
        let test = TestDb::new().await;
        let fx = seed(&test).await;

        let rows = test.db.reports().store_sales(None).await.unwrap();
        assert_eq!(rows.len(), 2);

        let busy = &rows[0];
        assert_eq!(busy.store_id, fx.store_id);
        assert_eq!(busy.invoice_count, 2);
        assert_eq!(busy.revenue_cents, 6000 + 4000 + 12_000);
        assert_eq!(busy.trade_value_paid_cents, 500);
        assert_eq!(busy.net().cents(), 21_500);

        let quiet = &rows[1];
        assert_eq!(quiet.store_id, fx.quiet_store_id);
        assert_eq!(quiet.invoice_count, 0);
        assert_eq!(quiet.revenue_cents, 0);

        let april = DateRange::month(2024, 4).unwrap();
        let rows = test.db.reports().store_sales(Some(april)).await.unwrap();
        assert_eq!(rows[0].invoice_count, 1);
        assert_eq!(rows[0].revenue_cents, 12_000);

        test.teardown().await;
    }
}

//! # Trade Repository
//!
//! Trade-in invoices. An unsigned trade is a quote; signing it commits the
//! store to the payout recorded on each line.

use pressstart_core::search::entities::TRADES;
use pressstart_core::{
    Invoice, NewTradeInvoice, NewTradeItem, SearchCriteria, TradeInvoice, TradeItem,
};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use tracing::info;

use super::{fetch_all, fetch_by_id, fetch_search, write_failed};
use crate::error::{DbError, DbResult};
use crate::transaction::{write_invoice, InvoiceWrite, LineItemWrite};

/// Repository for trade-ins.
#[derive(Debug, Clone)]
pub struct TradeRepository {
    pool: PgPool,
}

impl TradeRepository {
    /// Creates a new TradeRepository.
    pub fn new(pool: PgPool) -> Self {
        TradeRepository { pool }
    }

    /// Searches trades by `id`, `customerId`, `storeId` and `signed`.
    pub async fn search(&self, criteria: &SearchCriteria) -> DbResult<Vec<TradeInvoice>> {
        fetch_search(&self.pool, &TRADES, criteria).await
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<TradeInvoice>> {
        fetch_by_id(&self.pool, &TRADES, id).await
    }

    pub async fn all(&self) -> DbResult<Vec<TradeInvoice>> {
        fetch_all(&self.pool, &TRADES).await
    }

    pub async fn line_items(&self, trade_invoice_id: i64) -> DbResult<Vec<TradeItem>> {
        let items = sqlx::query_as::<_, TradeItem>(
            r#"
            SELECT trade_item_id, trade_invoice_id, item_id, trade_item_donation,
                   trade_item_value_offered_cents, trade_item_payout_type,
                   trade_item_final_trade_value_cents
            FROM tbl_trade_items
            WHERE trade_invoice_id = $1
            ORDER BY trade_item_id
            "#,
        )
        .bind(trade_invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Records a trade-in and its items atomically.
    pub async fn create(
        &self,
        trade: &NewTradeInvoice,
        items: &[NewTradeItem],
    ) -> DbResult<Invoice<TradeInvoice, TradeItem>> {
        write_invoice(&self.pool, trade, items).await
    }

    /// Marks a trade as signed by the customer.
    ///
    /// ## Errors
    /// `DbError::NotFound` when the trade doesn't exist.
    pub async fn mark_signed(&self, trade_invoice_id: i64) -> DbResult<TradeInvoice> {
        let signed = sqlx::query_as::<_, TradeInvoice>(&format!(
            r#"
            UPDATE tbl_trade_invoices SET trade_invoice_signed = TRUE
            WHERE trade_invoice_id = $1
            RETURNING {}
            "#,
            TRADES.columns
        ))
        .bind(trade_invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_failed("trade", "sign"))?
        .ok_or_else(|| DbError::not_found("Trade", trade_invoice_id))?;

        info!(id = trade_invoice_id, "Trade signed");
        Ok(signed)
    }
}

impl InvoiceWrite for NewTradeInvoice {
    type Row = TradeInvoice;
    const ENTITY: &'static str = "trade";

    fn insert(&self) -> QueryAs<'_, Postgres, TradeInvoice, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO tbl_trade_invoices (customer_id, store_id, trade_invoice_date, trade_invoice_signed)
            VALUES ($1, $2, COALESCE($3, now()), $4)
            RETURNING trade_invoice_id, customer_id, store_id, trade_invoice_date, trade_invoice_signed
            "#,
        )
        .bind(self.customer_id)
        .bind(self.store_id)
        .bind(self.trade_invoice_date)
        .bind(self.trade_invoice_signed)
    }

    fn id_of(row: &TradeInvoice) -> i64 {
        row.trade_invoice_id
    }
}

impl LineItemWrite for NewTradeItem {
    type Row = TradeItem;

    fn insert(&self, trade_invoice_id: i64) -> QueryAs<'_, Postgres, TradeItem, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO tbl_trade_items (
                trade_invoice_id, item_id, trade_item_donation, trade_item_value_offered_cents,
                trade_item_payout_type, trade_item_final_trade_value_cents
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING trade_item_id, trade_invoice_id, item_id, trade_item_donation,
                      trade_item_value_offered_cents, trade_item_payout_type,
                      trade_item_final_trade_value_cents
            "#,
        )
        .bind(trade_invoice_id)
        .bind(self.item_id)
        .bind(self.trade_item_donation)
        .bind(self.trade_item_value_offered_cents)
        .bind(self.trade_item_payout_type.as_str())
        .bind(self.trade_item_final_trade_value_cents)
    }
}

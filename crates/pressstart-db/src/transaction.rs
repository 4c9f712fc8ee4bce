//! # Invoice Transactions
//!
//! Writes a parent invoice and its line items as one atomic unit.
//!
//! ## Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  validate parent + every line   ──fail──►  Err(Invalid), no SQL sent   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │       │                                                                 │
//! │  INSERT parent RETURNING *  ──► invoice id                              │
//! │       │                                                                 │
//! │  INSERT line 1 (invoice id)                                             │
//! │  INSERT line 2 (invoice id)  ──fail──►  ROLLBACK, Err(..)              │
//! │  INSERT line 3 (invoice id)             nothing persisted               │
//! │       │                                                                 │
//! │  COMMIT  ──► Ok(Invoice { invoice, items })                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines are inserted one after another in input order; each insert waits
//! for the previous one on the same connection.

use pressstart_core::validation::Validate;
use pressstart_core::Invoice;
use sqlx::postgres::{PgArguments, PgConnection, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};

/// A parent invoice row that can be inserted.
pub(crate) trait InvoiceWrite: Validate + Sync {
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    /// Name used in logs and errors ("sale", "trade").
    const ENTITY: &'static str;

    /// `INSERT ... RETURNING` for this header.
    fn insert(&self) -> QueryAs<'_, Postgres, Self::Row, PgArguments>;

    /// The generated id of an inserted header.
    fn id_of(row: &Self::Row) -> i64;
}

/// A line item that can be inserted under a parent id.
pub(crate) trait LineItemWrite: Validate + Sync {
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    fn insert(&self, invoice_id: i64) -> QueryAs<'_, Postgres, Self::Row, PgArguments>;
}

/// Validates, then inserts `parent` and `lines` in one transaction.
pub(crate) async fn write_invoice<P, C>(
    pool: &PgPool,
    parent: &P,
    lines: &[C],
) -> DbResult<Invoice<P::Row, C::Row>>
where
    P: InvoiceWrite,
    C: LineItemWrite,
{
    if let Err(err) = parent.validate().and_then(|_| lines.validate()) {
        warn!(entity = P::ENTITY, error = %err, "Rejected invoice");
        return Err(DbError::Invalid(err));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    match insert_all(&mut tx, parent, lines).await {
        Ok(invoice) => {
            tx.commit()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

            info!(
                entity = P::ENTITY,
                id = P::id_of(&invoice.invoice),
                lines = invoice.items.len(),
                "Invoice created"
            );
            Ok(invoice)
        }
        Err(err) => {
            warn!(entity = P::ENTITY, error = %err, "Invoice failed, rolling back");

            if let Err(rollback_err) = tx.rollback().await {
                warn!(entity = P::ENTITY, error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

async fn insert_all<P, C>(
    conn: &mut PgConnection,
    parent: &P,
    lines: &[C],
) -> DbResult<Invoice<P::Row, C::Row>>
where
    P: InvoiceWrite,
    C: LineItemWrite,
{
    let invoice = parent.insert().fetch_one(&mut *conn).await?;
    let invoice_id = P::id_of(&invoice);

    debug!(entity = P::ENTITY, id = invoice_id, lines = lines.len(), "Header inserted");

    let mut items = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let row = line
            .insert(invoice_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                debug!(entity = P::ENTITY, line = index + 1, "Line insert failed");
                DbError::from(e)
            })?;
        items.push(row);
    }

    Ok(Invoice { invoice, items })
}

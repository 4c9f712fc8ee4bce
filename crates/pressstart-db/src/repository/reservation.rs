//! Reservations: items held at a store for a member until the stock arrives.

use pressstart_core::search::entities::RESERVATIONS;
use pressstart_core::{
    Invoice, NewReservation, NewReservationItem, Reservation, ReservationItem, SearchCriteria,
};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use tracing::info;

use super::{fetch_all, fetch_by_id, fetch_search, write_failed};
use crate::error::{DbError, DbResult};
use crate::transaction::{write_invoice, InvoiceWrite, LineItemWrite};

/// Repository for reservations.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(pool: PgPool) -> Self {
        ReservationRepository { pool }
    }

    /// Searches reservations by `id`, `storeId`, `customerId` and `received`.
    pub async fn search(&self, criteria: &SearchCriteria) -> DbResult<Vec<Reservation>> {
        fetch_search(&self.pool, &RESERVATIONS, criteria).await
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Reservation>> {
        fetch_by_id(&self.pool, &RESERVATIONS, id).await
    }

    pub async fn all(&self) -> DbResult<Vec<Reservation>> {
        fetch_all(&self.pool, &RESERVATIONS).await
    }

    pub async fn line_items(&self, reservation_id: i64) -> DbResult<Vec<ReservationItem>> {
        let items = sqlx::query_as::<_, ReservationItem>(
            r#"
            SELECT reservation_item_id, reservation_id, item_id
            FROM tbl_reservation_items
            WHERE reservation_id = $1
            ORDER BY reservation_item_id
            "#,
        )
        .bind(reservation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Places a reservation for one or more items.
    pub async fn create(
        &self,
        reservation: &NewReservation,
        items: &[NewReservationItem],
    ) -> DbResult<Invoice<Reservation, ReservationItem>> {
        write_invoice(&self.pool, reservation, items).await
    }

    /// Flags the reserved stock as arrived at the store.
    pub async fn mark_received(&self, reservation_id: i64) -> DbResult<Reservation> {
        let received = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            UPDATE tbl_reservations SET reservation_received = TRUE
            WHERE reservation_id = $1
            RETURNING {}
            "#,
            RESERVATIONS.columns
        ))
        .bind(reservation_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_failed("reservation", "receive"))?
        .ok_or_else(|| DbError::not_found("Reservation", reservation_id))?;

        info!(id = reservation_id, "Reservation received");
        Ok(received)
    }
}

impl InvoiceWrite for NewReservation {
    type Row = Reservation;
    const ENTITY: &'static str = "reservation";

    fn insert(&self) -> QueryAs<'_, Postgres, Reservation, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO tbl_reservations (
                store_id, customer_id, reservation_date_reserved, reservation_received
            ) VALUES ($1, $2, COALESCE($3, now()), $4)
            RETURNING reservation_id, store_id, customer_id, reservation_date_reserved,
                      reservation_received
            "#,
        )
        .bind(self.store_id)
        .bind(self.customer_id)
        .bind(self.reservation_date_reserved)
        .bind(self.reservation_received)
    }

    fn id_of(row: &Reservation) -> i64 {
        row.reservation_id
    }
}

impl LineItemWrite for NewReservationItem {
    type Row = ReservationItem;

    fn insert(&self, reservation_id: i64) -> QueryAs<'_, Postgres, ReservationItem, PgArguments> {
        sqlx::query_as(
            r#"
            INSERT INTO tbl_reservation_items (reservation_id, item_id)
            VALUES ($1, $2)
            RETURNING reservation_item_id, reservation_id, item_id
            "#,
        )
        .bind(reservation_id)
        .bind(self.item_id)
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::discount::{Discount, DiscountPayload};
use crate::models::ticket::{NewTicket, Ticket, TicketStatus};
use crate::store::{DiscountStore, StoreResult, TicketStore};

const TICKET_COLUMNS: &str = "id, user_id, purchased_at, activated_at, base_price, final_price, \
     discount_id, vehicle_code, status";

#[derive(Clone)]
pub struct PgTicketStore {
    pool: PgPool,
}

impl PgTicketStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn insert(&self, ticket: NewTicket) -> StoreResult<Ticket> {
        let sql = format!(
            "INSERT INTO tickets (id, user_id, purchased_at, base_price, final_price, discount_id, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {TICKET_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Ticket>(&sql)
            .bind(ticket.id)
            .bind(ticket.user_id)
            .bind(ticket.purchased_at)
            .bind(ticket.base_price)
            .bind(ticket.final_price)
            .bind(ticket.discount_id)
            .bind(TicketStatus::Purchased)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<Ticket>> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1");
        let row = sqlx::query_as::<_, Ticket>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn activate(
        &self,
        id: Uuid,
        activated_at: DateTime<Utc>,
        vehicle_code: &str,
    ) -> StoreResult<Option<Ticket>> {
        let sql = format!(
            "UPDATE tickets SET activated_at = $2, vehicle_code = $3, status = $4 \
             WHERE id = $1 AND status = $5 RETURNING {TICKET_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Ticket>(&sql)
            .bind(id)
            .bind(activated_at)
            .bind(vehicle_code)
            .bind(TicketStatus::Activated)
            .bind(TicketStatus::Purchased)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn mark_expired(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE tickets SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(TicketStatus::Expired)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<Ticket>> {
        let sql = format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE user_id = $1 ORDER BY purchased_at DESC"
        );
        let rows = sqlx::query_as::<_, Ticket>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_all(&self) -> StoreResult<Vec<Ticket>> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets ORDER BY purchased_at DESC");
        let rows = sqlx::query_as::<_, Ticket>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[derive(Clone)]
pub struct PgDiscountStore {
    pool: PgPool,
}

impl PgDiscountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DiscountStore for PgDiscountStore {
    async fn list(&self) -> StoreResult<Vec<Discount>> {
        let rows = sqlx::query_as::<_, Discount>(
            "SELECT id, name, percent FROM discounts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Discount>> {
        let row = sqlx::query_as::<_, Discount>(
            "SELECT id, name, percent FROM discounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, payload: &DiscountPayload) -> StoreResult<Discount> {
        let row = sqlx::query_as::<_, Discount>(
            "INSERT INTO discounts (name, percent) VALUES ($1, $2) RETURNING id, name, percent",
        )
        .bind(&payload.name)
        .bind(payload.percent)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, payload: &DiscountPayload) -> StoreResult<Option<Discount>> {
        let row = sqlx::query_as::<_, Discount>(
            "UPDATE discounts SET name = $2, percent = $3 WHERE id = $1 RETURNING id, name, percent",
        )
        .bind(id)
        .bind(&payload.name)
        .bind(payload.percent)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM discounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

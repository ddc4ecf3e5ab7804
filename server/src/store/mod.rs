//! Persistence seams for tickets and discounts.
//!
//! The lifecycle service only talks to these traits, so it runs the same way
//! against PostgreSQL and against the in-memory store used in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::discount::{Discount, DiscountPayload};
use crate::models::ticket::{NewTicket, Ticket};

pub mod fleet;
pub mod memory;
pub mod network;
pub mod postgres;

pub use memory::{MemoryDiscountStore, MemoryTicketStore};
pub use postgres::{PgDiscountStore, PgTicketStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn insert(&self, ticket: NewTicket) -> StoreResult<Ticket>;

    async fn find(&self, id: Uuid) -> StoreResult<Option<Ticket>>;

    /// Sets activation time, vehicle code and `Activated` status in one write.
    /// Returns `None` when the ticket is missing or no longer `Purchased`.
    async fn activate(
        &self,
        id: Uuid,
        activated_at: DateTime<Utc>,
        vehicle_code: &str,
    ) -> StoreResult<Option<Ticket>>;

    /// Unconditional, idempotent write of the `Expired` status.
    async fn mark_expired(&self, id: Uuid) -> StoreResult<()>;

    async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<Ticket>>;

    async fn list_all(&self) -> StoreResult<Vec<Ticket>>;
}

#[async_trait]
pub trait DiscountStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Discount>>;

    async fn find(&self, id: i64) -> StoreResult<Option<Discount>>;

    async fn create(&self, payload: &DiscountPayload) -> StoreResult<Discount>;

    async fn update(&self, id: i64, payload: &DiscountPayload) -> StoreResult<Option<Discount>>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

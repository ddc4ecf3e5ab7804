use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::discount::{Discount, DiscountPayload};
use crate::models::ticket::{NewTicket, Ticket, TicketStatus};
use crate::store::{DiscountStore, StoreResult, TicketStore};

#[derive(Default)]
pub struct MemoryTicketStore {
    tickets: RwLock<HashMap<Uuid, Ticket>>,
}

impl MemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops references to a deleted discount, keeping the charged prices.
    async fn clear_discount(&self, discount_id: i64) {
        for ticket in self.tickets.write().await.values_mut() {
            if ticket.discount_id == Some(discount_id) {
                ticket.discount_id = None;
            }
        }
    }
}

fn newest_first(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at));
    tickets
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn insert(&self, ticket: NewTicket) -> StoreResult<Ticket> {
        let ticket = ticket.into_ticket();
        self.tickets.write().await.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<Ticket>> {
        Ok(self.tickets.read().await.get(&id).cloned())
    }

    async fn activate(
        &self,
        id: Uuid,
        activated_at: DateTime<Utc>,
        vehicle_code: &str,
    ) -> StoreResult<Option<Ticket>> {
        let mut tickets = self.tickets.write().await;
        match tickets.get_mut(&id) {
            Some(ticket) if ticket.status.can_transition_to(TicketStatus::Activated) => {
                ticket.activated_at = Some(activated_at);
                ticket.vehicle_code = Some(vehicle_code.to_string());
                ticket.status = TicketStatus::Activated;
                Ok(Some(ticket.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn mark_expired(&self, id: Uuid) -> StoreResult<()> {
        if let Some(ticket) = self.tickets.write().await.get_mut(&id) {
            ticket.status = TicketStatus::Expired;
        }
        Ok(())
    }

    async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<Ticket>> {
        let tickets = self
            .tickets
            .read()
            .await
            .values()
            .filter(|t| t.user_id == Some(user_id))
            .cloned()
            .collect();
        Ok(newest_first(tickets))
    }

    async fn list_all(&self) -> StoreResult<Vec<Ticket>> {
        let tickets = self.tickets.read().await.values().cloned().collect();
        Ok(newest_first(tickets))
    }
}

#[derive(Default)]
struct DiscountTable {
    next_id: i64,
    rows: BTreeMap<i64, Discount>,
}

#[derive(Default)]
pub struct MemoryDiscountStore {
    table: RwLock<DiscountTable>,
    tickets: Option<Arc<MemoryTicketStore>>,
}

impl MemoryDiscountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog whose deletes null `discount_id` on the given tickets,
    /// like `ON DELETE SET NULL` in the schema.
    pub fn linked(tickets: Arc<MemoryTicketStore>) -> Self {
        Self {
            table: RwLock::default(),
            tickets: Some(tickets),
        }
    }
}

#[async_trait]
impl DiscountStore for MemoryDiscountStore {
    async fn list(&self) -> StoreResult<Vec<Discount>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Discount>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, payload: &DiscountPayload) -> StoreResult<Discount> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let discount = Discount {
            id: table.next_id,
            name: payload.name.clone(),
            percent: payload.percent,
        };
        table.rows.insert(discount.id, discount.clone());
        Ok(discount)
    }

    async fn update(&self, id: i64, payload: &DiscountPayload) -> StoreResult<Option<Discount>> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|discount| {
            discount.name = payload.name.clone();
            discount.percent = payload.percent;
            discount.clone()
        }))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let removed = self.table.write().await.rows.remove(&id).is_some();
        if let (true, Some(tickets)) = (removed, &self.tickets) {
            tickets.clear_discount(id).await;
        }
        Ok(removed)
    }
}

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::{Clock, TicketLifecycle, TicketPolicy};
use crate::store::{
    fleet::FleetStore, network::NetworkStore, DiscountStore, PgDiscountStore, PgTicketStore,
    TicketStore,
};

/// State behind the ticket and discount endpoints.
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: TicketLifecycle,
    pub discounts: Arc<dyn DiscountStore>,
}

impl AppState {
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        discounts: Arc<dyn DiscountStore>,
        clock: Arc<dyn Clock>,
        policy: TicketPolicy,
    ) -> Self {
        Self {
            lifecycle: TicketLifecycle::new(tickets, discounts.clone(), clock, policy),
            discounts,
        }
    }

    pub fn postgres(pool: PgPool, clock: Arc<dyn Clock>, policy: TicketPolicy) -> Self {
        Self::new(
            Arc::new(PgTicketStore::new(pool.clone())),
            Arc::new(PgDiscountStore::new(pool)),
            clock,
            policy,
        )
    }
}

/// State behind the fleet and network endpoints, which only run on PostgreSQL.
#[derive(Clone)]
pub struct OperationsState {
    pub fleet: FleetStore,
    pub network: NetworkStore,
    pub clock: Arc<dyn Clock>,
}

impl OperationsState {
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            fleet: FleetStore::new(pool.clone()),
            network: NetworkStore::new(pool),
            clock,
        }
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status")]
pub enum TicketStatus {
    Purchased,
    Activated,
    Expired,
}

impl TicketStatus {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        matches!(
            (self, next),
            (TicketStatus::Purchased, TicketStatus::Activated)
                | (TicketStatus::Activated, TicketStatus::Expired)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub user_id: Option<i64>,
    pub purchased_at: DateTime<Utc>,
    pub activated_at: Option<DateTime<Utc>>,
    pub base_price: Decimal,
    pub final_price: Decimal,
    pub discount_id: Option<i64>,
    pub vehicle_code: Option<String>,
    pub status: TicketStatus,
}

/// A ticket about to be inserted by a purchase.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub id: Uuid,
    pub user_id: Option<i64>,
    pub purchased_at: DateTime<Utc>,
    pub base_price: Decimal,
    pub final_price: Decimal,
    pub discount_id: Option<i64>,
}

impl NewTicket {
    pub fn into_ticket(self) -> Ticket {
        Ticket {
            id: self.id,
            user_id: self.user_id,
            purchased_at: self.purchased_at,
            activated_at: None,
            base_price: self.base_price,
            final_price: self.final_price,
            discount_id: self.discount_id,
            vehicle_code: None,
            status: TicketStatus::Purchased,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub user_id: Option<i64>,
    pub discount_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRequest {
    pub vehicle_code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateQuery {
    pub vehicle_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketListQuery {
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    #[serde(flatten)]
    pub ticket: Ticket,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

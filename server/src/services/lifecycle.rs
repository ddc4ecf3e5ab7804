//! Ticket lifecycle: purchase, activation and the validity window.
//!
//! ```text
//! Purchased --activate--> Activated --(now > expires_at, on read)--> Expired
//! ```
//!
//! Every ticket-facing handler goes through [`TicketLifecycle`]. Expiry is
//! evaluated lazily: a status check that finds the window elapsed persists
//! `Expired` before answering, and other readers rely on that stored status.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::ticket::{NewTicket, Ticket, TicketStatus};
use crate::services::clock::Clock;
use crate::store::{DiscountStore, StoreError, TicketStore};

/// How long a ticket stays valid after activation.
pub const TICKET_VALIDITY_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TicketPolicy {
    pub base_price: Decimal,
    pub validity: Duration,
}

impl Default for TicketPolicy {
    fn default() -> Self {
        Self {
            base_price: Decimal::ONE,
            validity: Duration::minutes(TICKET_VALIDITY_MINUTES),
        }
    }
}

#[derive(Debug, Error)]
pub enum TicketError {
    #[error("ticket already marked or invalid")]
    InvalidState,

    #[error("vehicle code must not be empty")]
    MissingVehicleCode,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckReason {
    #[serde(rename = "valid")]
    Valid,
    #[serde(rename = "not found")]
    NotFound,
    #[serde(rename = "not activated")]
    NotActivated,
    #[serde(rename = "expired")]
    Expired,
    #[serde(rename = "validated on a different vehicle")]
    VehicleMismatch,
}

/// Outcome of a passenger status check or an inspector validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCheck {
    pub ticket_id: Uuid,
    pub valid: bool,
    pub reason: CheckReason,
    pub status: Option<TicketStatus>,
    pub expires_at: Option<DateTime<Utc>>,
    pub vehicle_code: Option<String>,
}

impl TicketCheck {
    fn not_found(ticket_id: Uuid) -> Self {
        Self {
            ticket_id,
            valid: false,
            reason: CheckReason::NotFound,
            status: None,
            expires_at: None,
            vehicle_code: None,
        }
    }

    fn for_ticket(ticket: &Ticket, reason: CheckReason, validity: Duration) -> Self {
        Self {
            ticket_id: ticket.id,
            valid: reason == CheckReason::Valid,
            reason,
            status: Some(ticket.status),
            expires_at: ticket
                .activated_at
                .and_then(|at| at.checked_add_signed(validity)),
            vehicle_code: ticket.vehicle_code.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Purchase {
    pub ticket: Ticket,
    /// Set when the requested discount did not resolve and the full price was charged.
    pub ignored_discount: Option<i64>,
}

impl Purchase {
    pub fn warning(&self) -> Option<String> {
        self.ignored_discount
            .map(|id| format!("Discount {} not found; charged the base price", id))
    }
}

enum Evaluation {
    Missing,
    Inactive(Ticket),
    Expired(Ticket),
    Live(Ticket),
}

#[derive(Clone)]
pub struct TicketLifecycle {
    tickets: Arc<dyn TicketStore>,
    discounts: Arc<dyn DiscountStore>,
    clock: Arc<dyn Clock>,
    policy: TicketPolicy,
}

impl TicketLifecycle {
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        discounts: Arc<dyn DiscountStore>,
        clock: Arc<dyn Clock>,
        policy: TicketPolicy,
    ) -> Self {
        Self {
            tickets,
            discounts,
            clock,
            policy,
        }
    }

    pub async fn purchase(
        &self,
        user_id: Option<i64>,
        discount_id: Option<i64>,
    ) -> Result<Purchase, TicketError> {
        let base_price = to_cents(self.policy.base_price);

        let discount = match discount_id {
            Some(id) => self.discounts.find(id).await?,
            None => None,
        };
        let ignored_discount = match (discount_id, &discount) {
            (Some(id), None) => {
                warn!(discount_id = id, "Discount not found, charging base price");
                Some(id)
            }
            _ => None,
        };

        let final_price = discount
            .as_ref()
            .map(|d| apply_discount(base_price, d.percent))
            .unwrap_or(base_price);

        let ticket = self
            .tickets
            .insert(NewTicket {
                id: Uuid::new_v4(),
                user_id,
                purchased_at: self.clock.now(),
                base_price,
                final_price,
                discount_id: discount.as_ref().map(|d| d.id),
            })
            .await?;

        info!(
            ticket_id = %ticket.id,
            user_id = ?ticket.user_id,
            final_price = %ticket.final_price,
            "Ticket purchased"
        );

        Ok(Purchase {
            ticket,
            ignored_discount,
        })
    }

    pub async fn activate(&self, id: Uuid, vehicle_code: &str) -> Result<Ticket, TicketError> {
        let vehicle_code = vehicle_code.trim();
        if vehicle_code.is_empty() {
            return Err(TicketError::MissingVehicleCode);
        }

        match self.tickets.find(id).await? {
            Some(ticket) if ticket.status.can_transition_to(TicketStatus::Activated) => {}
            _ => return Err(TicketError::InvalidState),
        }

        let ticket = self
            .tickets
            .activate(id, self.clock.now(), vehicle_code)
            .await?
            .ok_or(TicketError::InvalidState)?;

        info!(ticket_id = %ticket.id, vehicle_code, "Ticket activated");
        Ok(ticket)
    }

    /// Passenger-facing validity check. May persist `Expired`.
    pub async fn check_status(&self, id: Uuid) -> Result<TicketCheck, TicketError> {
        let validity = self.policy.validity;
        let check = match self.evaluate(id).await? {
            Evaluation::Missing => TicketCheck::not_found(id),
            Evaluation::Inactive(ticket) => {
                TicketCheck::for_ticket(&ticket, CheckReason::NotActivated, validity)
            }
            Evaluation::Expired(ticket) => {
                TicketCheck::for_ticket(&ticket, CheckReason::Expired, validity)
            }
            Evaluation::Live(ticket) => {
                TicketCheck::for_ticket(&ticket, CheckReason::Valid, validity)
            }
        };
        Ok(check)
    }

    /// Inspector validation: the status check plus a soft vehicle-code comparison.
    pub async fn inspector_validate(
        &self,
        id: Uuid,
        vehicle_code: Option<&str>,
    ) -> Result<TicketCheck, TicketError> {
        let mut check = self.check_status(id).await?;

        if check.valid && vehicle_mismatch(check.vehicle_code.as_deref(), vehicle_code) {
            info!(
                ticket_id = %id,
                recorded = ?check.vehicle_code,
                presented = ?vehicle_code,
                "Ticket validated on a different vehicle"
            );
            check.valid = false;
            check.reason = CheckReason::VehicleMismatch;
        }

        Ok(check)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Ticket>, TicketError> {
        Ok(self.tickets.find(id).await?)
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Ticket>, TicketError> {
        Ok(self.tickets.list_for_user(user_id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<Ticket>, TicketError> {
        Ok(self.tickets.list_all().await?)
    }

    async fn evaluate(&self, id: Uuid) -> Result<Evaluation, TicketError> {
        let Some(mut ticket) = self.tickets.find(id).await? else {
            return Ok(Evaluation::Missing);
        };

        let activated_at = match (ticket.status, ticket.activated_at) {
            (TicketStatus::Activated, Some(at)) => at,
            _ => return Ok(Evaluation::Inactive(ticket)),
        };

        // An expiry past the representable range never arrives.
        let Some(expires_at) = activated_at.checked_add_signed(self.policy.validity) else {
            return Ok(Evaluation::Live(ticket));
        };
        if self.clock.now() > expires_at {
            self.tickets.mark_expired(id).await?;
            ticket.status = TicketStatus::Expired;
            info!(ticket_id = %id, %expires_at, "Ticket expired");
            return Ok(Evaluation::Expired(ticket));
        }

        Ok(Evaluation::Live(ticket))
    }
}

/// `base × (100 − percent) / 100`, rounded to cents.
pub fn apply_discount(base_price: Decimal, percent: i32) -> Decimal {
    let percent = Decimal::from(percent.clamp(0, 100));
    to_cents(base_price * (Decimal::ONE_HUNDRED - percent) / Decimal::ONE_HUNDRED)
}

fn to_cents(amount: Decimal) -> Decimal {
    let mut amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    amount.rescale(2);
    amount
}

fn vehicle_mismatch(recorded: Option<&str>, presented: Option<&str>) -> bool {
    match (recorded, presented.map(str::trim)) {
        (Some(recorded), Some(presented)) if !recorded.is_empty() && !presented.is_empty() => {
            !recorded.eq_ignore_ascii_case(presented)
        }
        _ => false,
    }
}

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::models::ticket::{
    MarkRequest, PurchaseRequest, PurchaseResponse, TicketListQuery, ValidateQuery,
};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

pub async fn purchase(
    State(state): State<AppState>,
    Json(req): Json<PurchaseRequest>,
) -> Result<Response, AppError> {
    let purchase = state.lifecycle.purchase(req.user_id, req.discount_id).await?;
    let warning = purchase.warning();
    let body = PurchaseResponse {
        ticket: purchase.ticket,
        warning,
    };
    Ok(created(body, "Ticket purchased").into_response())
}

pub async fn mark(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MarkRequest>,
) -> Result<Response, AppError> {
    let ticket = state.lifecycle.activate(id, &req.vehicle_code).await?;
    Ok(success(ticket, "Ticket activated").into_response())
}

pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let check = state.lifecycle.check_status(id).await?;
    Ok(success(check, "Ticket status evaluated").into_response())
}

pub async fn validate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ValidateQuery>,
) -> Result<Response, AppError> {
    let check = state
        .lifecycle
        .inspector_validate(id, query.vehicle_code.as_deref())
        .await?;
    Ok(success(check, "Ticket validated").into_response())
}

pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let ticket = state
        .lifecycle
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket '{}' was not found", id)))?;
    Ok(success(ticket, "Ticket retrieved").into_response())
}

pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<TicketListQuery>,
) -> Result<Response, AppError> {
    let tickets = match query.user_id {
        Some(user_id) => state.lifecycle.list_for_user(user_id).await?,
        None => state.lifecycle.list_all().await?,
    };
    Ok(success(tickets, "Tickets retrieved").into_response())
}

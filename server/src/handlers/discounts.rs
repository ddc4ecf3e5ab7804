use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::models::discount::DiscountPayload;
use crate::state::AppState;
use crate::store::DiscountStore;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Discount with id '{}' was not found", id))
}

pub async fn list_discounts(State(state): State<AppState>) -> Result<Response, AppError> {
    let discounts = state.discounts.list().await?;
    Ok(success(discounts, "Discounts retrieved").into_response())
}

pub async fn get_discount(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let discount = state.discounts.find(id).await?.ok_or_else(|| not_found(id))?;
    Ok(success(discount, "Discount retrieved").into_response())
}

pub async fn create_discount(
    State(state): State<AppState>,
    Json(payload): Json<DiscountPayload>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let discount = state.discounts.create(&payload).await?;
    tracing::info!(discount_id = discount.id, percent = discount.percent, "Discount created");
    Ok(created(discount, "Discount created").into_response())
}

pub async fn update_discount(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiscountPayload>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let discount = state
        .discounts
        .update(id, &payload)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(success(discount, "Discount updated").into_response())
}

pub async fn delete_discount(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if !state.discounts.delete(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(discount_id = id, "Discount deleted");
    Ok(empty_success("Discount deleted").into_response())
}

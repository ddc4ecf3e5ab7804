use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::models::network::{RoutePayload, RouteStopsPayload, SchedulePayload, StopPayload};
use crate::state::OperationsState;
use crate::utils::error::{foreign_key_violation, unique_violation, AppError};
use crate::utils::response::{created, empty_success, success};

fn route_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Route with id '{}' was not found", id))
}

fn stop_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Stop with id '{}' was not found", id))
}

pub async fn list_routes(State(state): State<OperationsState>) -> Result<Response, AppError> {
    let routes = state.network.list_routes().await?;
    Ok(success(routes, "Routes retrieved").into_response())
}

pub async fn get_route(
    State(state): State<OperationsState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let route = state
        .network
        .find_route(id)
        .await?
        .ok_or_else(|| route_not_found(id))?;
    Ok(success(route, "Route retrieved").into_response())
}

pub async fn create_route(
    State(state): State<OperationsState>,
    Json(payload): Json<RoutePayload>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let route = state
        .network
        .create_route(&payload)
        .await
        .map_err(|e| unique_violation(e, format!("Route code '{}' is taken", payload.code)))?;
    info!(route_id = route.id, code = %route.code, "Route created");
    Ok(created(route, "Route created").into_response())
}

pub async fn update_route(
    State(state): State<OperationsState>,
    Path(id): Path<i64>,
    Json(payload): Json<RoutePayload>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let route = state
        .network
        .update_route(id, &payload)
        .await
        .map_err(|e| unique_violation(e, format!("Route code '{}' is taken", payload.code)))?
        .ok_or_else(|| route_not_found(id))?;
    Ok(success(route, "Route updated").into_response())
}

pub async fn delete_route(
    State(state): State<OperationsState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if !state.network.delete_route(id).await? {
        return Err(route_not_found(id));
    }
    info!(route_id = id, "Route deleted");
    Ok(empty_success("Route deleted").into_response())
}

pub async fn list_stops(State(state): State<OperationsState>) -> Result<Response, AppError> {
    let stops = state.network.list_stops().await?;
    Ok(success(stops, "Stops retrieved").into_response())
}

pub async fn create_stop(
    State(state): State<OperationsState>,
    Json(payload): Json<StopPayload>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let stop = state.network.create_stop(&payload).await?;
    Ok(created(stop, "Stop created").into_response())
}

pub async fn update_stop(
    State(state): State<OperationsState>,
    Path(id): Path<i64>,
    Json(payload): Json<StopPayload>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let stop = state
        .network
        .update_stop(id, &payload)
        .await?
        .ok_or_else(|| stop_not_found(id))?;
    Ok(success(stop, "Stop updated").into_response())
}

pub async fn delete_stop(
    State(state): State<OperationsState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if !state.network.delete_stop(id).await? {
        return Err(stop_not_found(id));
    }
    Ok(empty_success("Stop deleted").into_response())
}

pub async fn route_stops(
    State(state): State<OperationsState>,
    Path(route_id): Path<i64>,
) -> Result<Response, AppError> {
    let stops = state.network.route_stops(route_id).await?;
    Ok(success(stops, "Route stops retrieved").into_response())
}

pub async fn replace_route_stops(
    State(state): State<OperationsState>,
    Path(route_id): Path<i64>,
    Json(payload): Json<RouteStopsPayload>,
) -> Result<Response, AppError> {
    payload.validate()?;
    state
        .network
        .find_route(route_id)
        .await?
        .ok_or_else(|| route_not_found(route_id))?;

    let stops = state
        .network
        .replace_route_stops(route_id, &payload.stop_ids)
        .await
        .map_err(|e| foreign_key_violation(e, "Route references an unknown stop"))?;
    info!(route_id, stops = stops.len(), "Route stops replaced");
    Ok(success(stops, "Route stops updated").into_response())
}

pub async fn list_schedules(
    State(state): State<OperationsState>,
    Path(route_id): Path<i64>,
) -> Result<Response, AppError> {
    let entries = state.network.list_schedules(route_id).await?;
    Ok(success(entries, "Schedule retrieved").into_response())
}

pub async fn create_schedule(
    State(state): State<OperationsState>,
    Path(route_id): Path<i64>,
    Json(payload): Json<SchedulePayload>,
) -> Result<Response, AppError> {
    state
        .network
        .find_route(route_id)
        .await?
        .ok_or_else(|| route_not_found(route_id))?;

    let entry = state
        .network
        .create_schedule(route_id, &payload)
        .await
        .map_err(|e| foreign_key_violation(e, "Schedule references an unknown vehicle"))?;
    Ok(created(entry, "Schedule entry created").into_response())
}

pub async fn delete_schedule(
    State(state): State<OperationsState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if !state.network.delete_schedule(id).await? {
        return Err(AppError::NotFound(format!(
            "Schedule entry with id '{}' was not found",
            id
        )));
    }
    Ok(empty_success("Schedule entry deleted").into_response())
}

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::models::fuel::{FuelLogPayload, FuelSummary};
use crate::models::malfunction::{MalfunctionListQuery, MalfunctionPayload, ResolvePayload};
use crate::models::vehicle::{PositionPayload, VehiclePayload};
use crate::services::Clock;
use crate::state::OperationsState;
use crate::utils::error::{unique_violation, AppError};
use crate::utils::response::{created, empty_success, success};

fn vehicle_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Vehicle with id '{}' was not found", id))
}

fn malfunction_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Malfunction report with id '{}' was not found", id))
}

pub async fn list_vehicles(State(state): State<OperationsState>) -> Result<Response, AppError> {
    let vehicles = state.fleet.list_vehicles().await?;
    Ok(success(vehicles, "Vehicles retrieved").into_response())
}

pub async fn get_vehicle(
    State(state): State<OperationsState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let vehicle = state
        .fleet
        .find_vehicle(id)
        .await?
        .ok_or_else(|| vehicle_not_found(id))?;
    Ok(success(vehicle, "Vehicle retrieved").into_response())
}

pub async fn create_vehicle(
    State(state): State<OperationsState>,
    Json(payload): Json<VehiclePayload>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let vehicle = state
        .fleet
        .create_vehicle(&payload, state.clock.now())
        .await
        .map_err(|e| unique_violation(e, format!("Vehicle code '{}' is taken", payload.code)))?;
    info!(vehicle_id = vehicle.id, code = %vehicle.code, "Vehicle registered");
    Ok(created(vehicle, "Vehicle created").into_response())
}

pub async fn update_vehicle(
    State(state): State<OperationsState>,
    Path(id): Path<i64>,
    Json(payload): Json<VehiclePayload>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let vehicle = state
        .fleet
        .update_vehicle(id, &payload)
        .await
        .map_err(|e| unique_violation(e, format!("Vehicle code '{}' is taken", payload.code)))?
        .ok_or_else(|| vehicle_not_found(id))?;
    Ok(success(vehicle, "Vehicle updated").into_response())
}

pub async fn delete_vehicle(
    State(state): State<OperationsState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if !state.fleet.delete_vehicle(id).await? {
        return Err(vehicle_not_found(id));
    }
    info!(vehicle_id = id, "Vehicle deleted");
    Ok(empty_success("Vehicle deleted").into_response())
}

pub async fn record_position(
    State(state): State<OperationsState>,
    Path(id): Path<i64>,
    Json(position): Json<PositionPayload>,
) -> Result<Response, AppError> {
    position.validate()?;
    let vehicle = state
        .fleet
        .record_position(id, position, state.clock.now())
        .await?
        .ok_or_else(|| vehicle_not_found(id))?;
    Ok(success(vehicle, "Position recorded").into_response())
}

pub async fn create_fuel_log(
    State(state): State<OperationsState>,
    Path(vehicle_id): Path<i64>,
    Json(payload): Json<FuelLogPayload>,
) -> Result<Response, AppError> {
    payload.validate()?;
    state
        .fleet
        .find_vehicle(vehicle_id)
        .await?
        .ok_or_else(|| vehicle_not_found(vehicle_id))?;

    let log = state
        .fleet
        .create_fuel_log(vehicle_id, &payload, state.clock.now())
        .await?;
    info!(vehicle_id, liters = %log.liters, "Fuel logged");
    Ok(created(log, "Fuel log created").into_response())
}

pub async fn list_fuel_logs(
    State(state): State<OperationsState>,
    Path(vehicle_id): Path<i64>,
) -> Result<Response, AppError> {
    let logs = state.fleet.list_fuel_logs(vehicle_id).await?;
    Ok(success(logs, "Fuel logs retrieved").into_response())
}

pub async fn fuel_summary(
    State(state): State<OperationsState>,
    Path(vehicle_id): Path<i64>,
) -> Result<Response, AppError> {
    state
        .fleet
        .find_vehicle(vehicle_id)
        .await?
        .ok_or_else(|| vehicle_not_found(vehicle_id))?;

    let logs = state.fleet.list_fuel_logs(vehicle_id).await?;
    let summary = FuelSummary::from_logs(vehicle_id, &logs);
    Ok(success(summary, "Fuel summary computed").into_response())
}

pub async fn report_malfunction(
    State(state): State<OperationsState>,
    Json(payload): Json<MalfunctionPayload>,
) -> Result<Response, AppError> {
    payload.validate()?;
    state
        .fleet
        .find_vehicle(payload.vehicle_id)
        .await?
        .ok_or_else(|| vehicle_not_found(payload.vehicle_id))?;

    let report = state
        .fleet
        .report_malfunction(&payload, state.clock.now())
        .await?;
    info!(
        report_id = report.id,
        vehicle_id = report.vehicle_id,
        severity = ?report.severity,
        "Malfunction reported"
    );
    Ok(created(report, "Malfunction reported").into_response())
}

pub async fn list_malfunctions(
    State(state): State<OperationsState>,
    Query(filter): Query<MalfunctionListQuery>,
) -> Result<Response, AppError> {
    let reports = state.fleet.list_malfunctions(&filter).await?;
    Ok(success(reports, "Malfunction reports retrieved").into_response())
}

pub async fn get_malfunction(
    State(state): State<OperationsState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let report = state
        .fleet
        .find_malfunction(id)
        .await?
        .ok_or_else(|| malfunction_not_found(id))?;
    Ok(success(report, "Malfunction report retrieved").into_response())
}

pub async fn resolve_malfunction(
    State(state): State<OperationsState>,
    Path(id): Path<i64>,
    Json(payload): Json<ResolvePayload>,
) -> Result<Response, AppError> {
    let note = payload
        .note
        .as_deref()
        .map(str::trim)
        .filter(|note| !note.is_empty());

    if let Some(report) = state
        .fleet
        .resolve_malfunction(id, note, state.clock.now())
        .await?
    {
        info!(report_id = id, "Malfunction resolved");
        return Ok(success(report, "Malfunction resolved").into_response());
    }

    // Distinguish a missing report from one that was already resolved.
    match state.fleet.find_malfunction(id).await? {
        Some(_) => Err(AppError::InvalidState(format!(
            "Malfunction report '{}' is already resolved",
            id
        ))),
        None => Err(malfunction_not_found(id)),
    }
}

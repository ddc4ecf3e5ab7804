use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::fuel::{FuelLog, FuelLogPayload};
use crate::models::malfunction::{
    MalfunctionListQuery, MalfunctionPayload, MalfunctionReport, MalfunctionStatus,
};
use crate::models::vehicle::{PositionPayload, Vehicle, VehiclePayload};

const VEHICLE_COLUMNS: &str =
    "id, code, kind, model, capacity, active, latitude, longitude, last_seen_at, created_at";

const MALFUNCTION_COLUMNS: &str = "id, vehicle_id, reported_by, description, severity, status, \
     reported_at, resolved_at, resolution_note";

/// Vehicles, fuel logs and malfunction reports.
#[derive(Clone)]
pub struct FleetStore {
    pool: PgPool,
}

impl FleetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>, sqlx::Error> {
        let sql = format!("SELECT {VEHICLE_COLUMNS} FROM vehicles ORDER BY code");
        sqlx::query_as::<_, Vehicle>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn find_vehicle(&self, id: i64) -> Result<Option<Vehicle>, sqlx::Error> {
        let sql = format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = $1");
        sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create_vehicle(
        &self,
        payload: &VehiclePayload,
        now: DateTime<Utc>,
    ) -> Result<Vehicle, sqlx::Error> {
        let sql = format!(
            "INSERT INTO vehicles (code, kind, model, capacity, active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {VEHICLE_COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&sql)
            .bind(payload.code.trim())
            .bind(payload.kind)
            .bind(&payload.model)
            .bind(payload.capacity)
            .bind(payload.active)
            .bind(now)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn update_vehicle(
        &self,
        id: i64,
        payload: &VehiclePayload,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let sql = format!(
            "UPDATE vehicles SET code = $2, kind = $3, model = $4, capacity = $5, active = $6 \
             WHERE id = $1 RETURNING {VEHICLE_COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .bind(payload.code.trim())
            .bind(payload.kind)
            .bind(&payload.model)
            .bind(payload.capacity)
            .bind(payload.active)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn delete_vehicle(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn record_position(
        &self,
        id: i64,
        position: PositionPayload,
        seen_at: DateTime<Utc>,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let sql = format!(
            "UPDATE vehicles SET latitude = $2, longitude = $3, last_seen_at = $4 \
             WHERE id = $1 RETURNING {VEHICLE_COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .bind(position.latitude)
            .bind(position.longitude)
            .bind(seen_at)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create_fuel_log(
        &self,
        vehicle_id: i64,
        payload: &FuelLogPayload,
        logged_at: DateTime<Utc>,
    ) -> Result<FuelLog, sqlx::Error> {
        sqlx::query_as::<_, FuelLog>(
            "INSERT INTO fuel_logs (vehicle_id, liters, cost, odometer_km, logged_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, vehicle_id, liters, cost, odometer_km, logged_at",
        )
        .bind(vehicle_id)
        .bind(payload.liters)
        .bind(payload.cost)
        .bind(payload.odometer_km)
        .bind(logged_at)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_fuel_logs(&self, vehicle_id: i64) -> Result<Vec<FuelLog>, sqlx::Error> {
        sqlx::query_as::<_, FuelLog>(
            "SELECT id, vehicle_id, liters, cost, odometer_km, logged_at FROM fuel_logs \
             WHERE vehicle_id = $1 ORDER BY logged_at DESC",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn report_malfunction(
        &self,
        payload: &MalfunctionPayload,
        reported_at: DateTime<Utc>,
    ) -> Result<MalfunctionReport, sqlx::Error> {
        let sql = format!(
            "INSERT INTO malfunction_reports (vehicle_id, reported_by, description, severity, status, reported_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {MALFUNCTION_COLUMNS}"
        );
        sqlx::query_as::<_, MalfunctionReport>(&sql)
            .bind(payload.vehicle_id)
            .bind(payload.reported_by)
            .bind(payload.description.trim())
            .bind(payload.severity)
            .bind(MalfunctionStatus::Open)
            .bind(reported_at)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn list_malfunctions(
        &self,
        filter: &MalfunctionListQuery,
    ) -> Result<Vec<MalfunctionReport>, sqlx::Error> {
        let status = filter.open_only.then_some(MalfunctionStatus::Open);
        let sql = format!(
            "SELECT {MALFUNCTION_COLUMNS} FROM malfunction_reports \
             WHERE ($1::malfunction_status IS NULL OR status = $1) \
             AND ($2::BIGINT IS NULL OR vehicle_id = $2) \
             ORDER BY reported_at DESC"
        );
        sqlx::query_as::<_, MalfunctionReport>(&sql)
            .bind(status)
            .bind(filter.vehicle_id)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn find_malfunction(
        &self,
        id: i64,
    ) -> Result<Option<MalfunctionReport>, sqlx::Error> {
        let sql = format!("SELECT {MALFUNCTION_COLUMNS} FROM malfunction_reports WHERE id = $1");
        sqlx::query_as::<_, MalfunctionReport>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Resolves an open report. `None` when the report is missing or already resolved.
    pub async fn resolve_malfunction(
        &self,
        id: i64,
        note: Option<&str>,
        resolved_at: DateTime<Utc>,
    ) -> Result<Option<MalfunctionReport>, sqlx::Error> {
        let sql = format!(
            "UPDATE malfunction_reports SET status = $2, resolved_at = $3, resolution_note = $4 \
             WHERE id = $1 AND status = $5 RETURNING {MALFUNCTION_COLUMNS}"
        );
        sqlx::query_as::<_, MalfunctionReport>(&sql)
            .bind(id)
            .bind(MalfunctionStatus::Resolved)
            .bind(resolved_at)
            .bind(note)
            .bind(MalfunctionStatus::Open)
            .fetch_optional(&self.pool)
            .await
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vehicle_kind")]
pub enum VehicleKind {
    Bus,
    Tram,
    Trolleybus,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i64,
    pub code: String,
    pub kind: VehicleKind,
    pub model: String,
    pub capacity: i32,
    pub active: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePayload {
    pub code: String,
    pub kind: VehicleKind,
    pub model: String,
    pub capacity: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl VehiclePayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.code.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Vehicle code must not be empty".to_string(),
            ));
        }
        if self.capacity <= 0 {
            return Err(AppError::ValidationError(
                "Vehicle capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PositionPayload {
    pub latitude: f64,
    pub longitude: f64,
}

impl PositionPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_coordinates(self.latitude, self.longitude)
    }
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), AppError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::ValidationError(format!(
            "Coordinates out of range: ({}, {})",
            latitude, longitude
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_payload_defaults_to_active() {
        let payload: VehiclePayload = serde_json::from_str(
            r#"{"code": "BUS-1", "kind": "Bus", "model": "Solaris Urbino", "capacity": 90}"#,
        )
        .unwrap();
        assert!(payload.active);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_vehicle_payload_rejects_zero_capacity() {
        let payload = VehiclePayload {
            code: "TRAM-4".to_string(),
            kind: VehicleKind::Tram,
            model: "Tatra".to_string(),
            capacity: 0,
            active: true,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_coordinates_range() {
        assert!(validate_coordinates(44.8, 20.46).is_ok());
        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }
}

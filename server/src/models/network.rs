use std::collections::HashSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::vehicle::validate_coordinates;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TransitRoute {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePayload {
    pub code: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl RoutePayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.code.trim().is_empty() || self.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Route code and name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPayload {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl StopPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Stop name must not be empty".to_string(),
            ));
        }
        validate_coordinates(self.latitude, self.longitude)
    }
}

/// A stop as it appears in a route's ordered sequence.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    pub position: i32,
    pub stop_id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStopsPayload {
    pub stop_ids: Vec<i64>,
}

/// Longest stop sequence a single route may carry.
pub const MAX_ROUTE_STOPS: usize = 500;

impl RouteStopsPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.stop_ids.len() > MAX_ROUTE_STOPS {
            return Err(AppError::ValidationError(format!(
                "A route may have at most {} stops",
                MAX_ROUTE_STOPS
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.stop_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(AppError::ValidationError(format!(
                "Stop {} appears more than once in the route",
                dup
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "service_day")]
pub enum ServiceDay {
    Weekday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: i64,
    pub route_id: i64,
    pub vehicle_id: Option<i64>,
    pub departs_at: NaiveTime,
    pub service_day: ServiceDay,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    pub vehicle_id: Option<i64>,
    pub departs_at: NaiveTime,
    pub service_day: ServiceDay,
}

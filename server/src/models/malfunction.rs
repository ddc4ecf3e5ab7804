use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "malfunction_severity")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "malfunction_status")]
pub enum MalfunctionStatus {
    Open,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MalfunctionReport {
    pub id: i64,
    pub vehicle_id: i64,
    pub reported_by: Option<i64>,
    pub description: String,
    pub severity: Severity,
    pub status: MalfunctionStatus,
    pub reported_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MalfunctionPayload {
    pub vehicle_id: i64,
    pub reported_by: Option<i64>,
    pub description: String,
    pub severity: Severity,
}

impl MalfunctionPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.description.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Malfunction description must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvePayload {
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MalfunctionListQuery {
    #[serde(default)]
    pub open_only: bool,
    pub vehicle_id: Option<i64>,
}

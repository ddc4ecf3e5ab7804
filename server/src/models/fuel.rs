use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FuelLog {
    pub id: i64,
    pub vehicle_id: i64,
    pub liters: Decimal,
    pub cost: Decimal,
    pub odometer_km: i32,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelLogPayload {
    pub liters: Decimal,
    pub cost: Decimal,
    pub odometer_km: i32,
}

impl FuelLogPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.liters <= Decimal::ZERO {
            return Err(AppError::ValidationError(
                "Fuel amount must be positive".to_string(),
            ));
        }
        if self.cost < Decimal::ZERO {
            return Err(AppError::ValidationError(
                "Fuel cost must not be negative".to_string(),
            ));
        }
        if self.odometer_km < 0 {
            return Err(AppError::ValidationError(
                "Odometer reading must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelSummary {
    pub vehicle_id: i64,
    pub entries: usize,
    pub total_liters: Decimal,
    pub total_cost: Decimal,
    pub distance_km: i32,
    /// Absent until the logs span a non-zero distance.
    pub liters_per_100_km: Option<Decimal>,
}

impl FuelSummary {
    pub fn from_logs(vehicle_id: i64, logs: &[FuelLog]) -> Self {
        let total_liters: Decimal = logs.iter().map(|log| log.liters).sum();
        let total_cost: Decimal = logs.iter().map(|log| log.cost).sum();

        let min_odo = logs.iter().map(|log| log.odometer_km).min();
        let max_odo = logs.iter().map(|log| log.odometer_km).max();
        let distance_km = match (min_odo, max_odo) {
            (Some(min), Some(max)) => max - min,
            _ => 0,
        };

        let liters_per_100_km = if distance_km > 0 {
            Some((total_liters * Decimal::ONE_HUNDRED / Decimal::from(distance_km)).round_dp(2))
        } else {
            None
        };

        Self {
            vehicle_id,
            entries: logs.len(),
            total_liters,
            total_cost,
            distance_km,
            liters_per_100_km,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(liters: i64, cost: i64, odometer_km: i32) -> FuelLog {
        FuelLog {
            id: 0,
            vehicle_id: 3,
            liters: Decimal::from(liters),
            cost: Decimal::from(cost),
            odometer_km,
            logged_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_of_no_logs() {
        let summary = FuelSummary::from_logs(3, &[]);
        assert_eq!(summary.entries, 0);
        assert_eq!(summary.total_liters, Decimal::ZERO);
        assert_eq!(summary.distance_km, 0);
        assert!(summary.liters_per_100_km.is_none());
    }

    #[test]
    fn test_summary_consumption() {
        let logs = vec![log(60, 90, 12_400), log(30, 45, 12_100), log(40, 60, 12_600)];
        let summary = FuelSummary::from_logs(3, &logs);

        assert_eq!(summary.entries, 3);
        assert_eq!(summary.total_liters, Decimal::from(130));
        assert_eq!(summary.total_cost, Decimal::from(195));
        assert_eq!(summary.distance_km, 500);
        assert_eq!(summary.liters_per_100_km, Some(Decimal::from(26)));
    }

    #[test]
    fn test_payload_validation() {
        let ok = FuelLogPayload {
            liters: Decimal::new(455, 1),
            cost: Decimal::new(6825, 2),
            odometer_km: 10_000,
        };
        assert!(ok.validate().is_ok());

        let empty = FuelLogPayload {
            liters: Decimal::ZERO,
            ..ok.clone()
        };
        assert!(empty.validate().is_err());

        let rewound = FuelLogPayload {
            odometer_km: -5,
            ..ok
        };
        assert!(rewound.validate().is_err());
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub id: i64,
    pub name: String,
    pub percent: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountPayload {
    pub name: String,
    pub percent: i32,
}

impl DiscountPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Discount name must not be empty".to_string(),
            ));
        }
        if !(0..=100).contains(&self.percent) {
            return Err(AppError::ValidationError(format!(
                "Discount percent must be between 0 and 100, got {}",
                self.percent
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, percent: i32) -> DiscountPayload {
        DiscountPayload {
            name: name.to_string(),
            percent,
        }
    }

    #[test]
    fn test_percent_bounds() {
        assert!(payload("Student", 0).validate().is_ok());
        assert!(payload("Student", 100).validate().is_ok());
        assert!(payload("Student", -1).validate().is_err());
        assert!(payload("Student", 101).validate().is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = payload("   ", 10).validate().unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}

use std::env;
use std::str::FromStr;

use chrono::Duration;
use rust_decimal::Decimal;

use crate::services::lifecycle::{TicketPolicy, TICKET_VALIDITY_MINUTES};

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/transit";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
/// One week.
const MAX_VALIDITY_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub ticket_policy: TicketPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = TicketPolicy::default();

        let base_price = parse_or(&lookup, "TICKET_BASE_PRICE", defaults.base_price);
        let base_price = if base_price < Decimal::ZERO {
            tracing::warn!("Config: TICKET_BASE_PRICE must not be negative, using default");
            defaults.base_price
        } else {
            base_price
        };

        let validity_minutes = parse_or(&lookup, "TICKET_VALIDITY_MINUTES", TICKET_VALIDITY_MINUTES);
        let validity = if (1..=MAX_VALIDITY_MINUTES).contains(&validity_minutes) {
            Duration::try_minutes(validity_minutes).unwrap_or(defaults.validity)
        } else {
            tracing::warn!(
                "Config: TICKET_VALIDITY_MINUTES must be between 1 and {}, using default",
                MAX_VALIDITY_MINUTES
            );
            defaults.validity
        };

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            ticket_policy: TicketPolicy {
                base_price,
                validity,
            },
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Config: Invalid value '{}' for {}, using default", raw, key);
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 3001);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.ticket_policy, TicketPolicy::default());
        assert_eq!(config.ticket_policy.validity, Duration::minutes(30));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("TICKET_BASE_PRICE", "1.20"),
            ("TICKET_VALIDITY_MINUTES", "90"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.ticket_policy.base_price, Decimal::new(120, 2));
        assert_eq!(config.ticket_policy.validity, Duration::minutes(90));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("PORT", "not-a-port"),
            ("TICKET_VALIDITY_MINUTES", "-5"),
            ("TICKET_BASE_PRICE", "-1"),
        ]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.ticket_policy, TicketPolicy::default());
    }

    #[test]
    fn test_oversized_validity_falls_back() {
        for raw in ["9223372036854775807", "1000000000000", "10081"] {
            let config = config_from(&[("TICKET_VALIDITY_MINUTES", raw)]);
            assert_eq!(config.ticket_policy.validity, Duration::minutes(30), "{raw}");
        }

        let config = config_from(&[("TICKET_VALIDITY_MINUTES", "10080")]);
        assert_eq!(config.ticket_policy.validity, Duration::days(7));
    }
}

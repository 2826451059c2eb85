//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Payment compliance (TICO) thresholds.
    #[serde(default)]
    pub compliance: ComplianceConfig,
    /// Booking status report settings.
    #[serde(default)]
    pub reporting: ReportingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Regulatory thresholds applied to payment schedules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComplianceConfig {
    /// Final payment must be due at least this many days before departure.
    #[serde(default = "default_min_days_before_departure")]
    pub min_days_before_departure: i64,
    /// Smallest allowed single payment, in cents.
    #[serde(default = "default_min_payment_cents")]
    pub min_payment_cents: i64,
    /// Maximum number of payment items in one schedule.
    #[serde(default = "default_max_installments")]
    pub max_installments: usize,
    /// Deposits above this share of the total raise a warning.
    #[serde(default = "default_high_deposit_percent")]
    pub high_deposit_percent: i64,
}

fn default_min_days_before_departure() -> i64 {
    45
}

fn default_min_payment_cents() -> i64 {
    100
}

fn default_max_installments() -> usize {
    12
}

fn default_high_deposit_percent() -> i64 {
    50
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            min_days_before_departure: default_min_days_before_departure(),
            min_payment_cents: default_min_payment_cents(),
            max_installments: default_max_installments(),
            high_deposit_percent: default_high_deposit_percent(),
        }
    }
}

/// Booking status report settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportingConfig {
    /// Items due within this many days count as upcoming.
    #[serde(default = "default_upcoming_window_days")]
    pub upcoming_window_days: u32,
}

fn default_upcoming_window_days() -> u32 {
    7
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            upcoming_window_days: default_upcoming_window_days(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("WAYFARE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment_with_defaults() {
        temp_env::with_vars(
            [
                ("WAYFARE__DATABASE__URL", Some("sqlite::memory:")),
                ("RUN_MODE", Some("test")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.compliance, ComplianceConfig::default());
                assert_eq!(config.reporting.upcoming_window_days, 7);
            },
        );
    }

    #[test]
    fn test_compliance_override_from_environment() {
        temp_env::with_vars(
            [
                ("WAYFARE__DATABASE__URL", Some("sqlite::memory:")),
                ("WAYFARE__COMPLIANCE__MIN_DAYS_BEFORE_DEPARTURE", Some("60")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.compliance.min_days_before_departure, 60);
                assert_eq!(config.compliance.min_payment_cents, 100);
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars([("WAYFARE__DATABASE__URL", None::<&str>)], || {
            assert!(AppConfig::load().is_err());
        });
    }

    #[test]
    fn test_compliance_defaults() {
        let compliance = ComplianceConfig::default();
        assert_eq!(compliance.min_days_before_departure, 45);
        assert_eq!(compliance.min_payment_cents, 100);
        assert_eq!(compliance.max_installments, 12);
        assert_eq!(compliance.high_deposit_percent, 50);
    }
}

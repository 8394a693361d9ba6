use std::env;
use std::fmt;

use crate::workflows::allocation::AllocationConfig;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for an embedding application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub allocation: AllocationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = AllocationConfig::default();
        let oversample_factor = match env::var("ALLOCATION_OVERSAMPLE_FACTOR") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidOversampleFactor)?,
            Err(_) => defaults.oversample_factor,
        };
        let recency_cap_days = match env::var("ALLOCATION_RECENCY_CAP_DAYS") {
            Ok(raw) => raw
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidRecencyCap)?,
            Err(_) => defaults.recency_cap_days,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            allocation: AllocationConfig::new(oversample_factor, recency_cap_days),
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidOversampleFactor,
    InvalidRecencyCap,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidOversampleFactor => {
                write!(f, "ALLOCATION_OVERSAMPLE_FACTOR must be a positive integer")
            }
            ConfigError::InvalidRecencyCap => {
                write!(f, "ALLOCATION_RECENCY_CAP_DAYS must be a number of days")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

//! Main application configuration
//!
//! This module defines the top-level configuration of the smartrank tool,
//! including environment variable and TOML file loading and validation.

use crate::config::rating::{AdjustmentConfig, RatingConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub adjustments: AdjustmentConfig,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "smartrank".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Parse an environment variable into `target` when it is set
fn override_from_env<T: std::str::FromStr>(name: &str, target: &mut T) -> Result<()> {
    if let Ok(value) = env::var(name) {
        *target = value
            .parse()
            .map_err(|_| anyhow!("Invalid {} value: {}", name, value))?;
    }
    Ok(())
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still
    /// override values from the file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse configuration from TOML text without consulting the environment
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SMARTRANK_SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("SMARTRANK_LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating model
        override_from_env("SMARTRANK_DEFAULT_MEAN", &mut self.rating.default_mean)?;
        override_from_env(
            "SMARTRANK_DEFAULT_DEVIATION",
            &mut self.rating.default_deviation,
        )?;
        override_from_env(
            "SMARTRANK_DEFAULT_VOLATILITY",
            &mut self.rating.default_volatility,
        )?;
        override_from_env("SMARTRANK_TAU", &mut self.rating.tau)?;
        override_from_env("SMARTRANK_EPSILON", &mut self.rating.epsilon)?;
        override_from_env(
            "SMARTRANK_MAX_SOLVER_ITERATIONS",
            &mut self.rating.max_solver_iterations,
        )?;

        // Adjustments
        override_from_env(
            "SMARTRANK_OUTSIDER_GAP_THRESHOLD",
            &mut self.adjustments.outsider_gap_threshold,
        )?;
        override_from_env(
            "SMARTRANK_OUTSIDER_BONUS",
            &mut self.adjustments.outsider_bonus,
        )?;
        override_from_env(
            "SMARTRANK_RETIREMENT_PENALTY",
            &mut self.adjustments.retirement_penalty,
        )?;
        override_from_env(
            "SMARTRANK_WALKOVER_PENALTY",
            &mut self.adjustments.walkover_penalty,
        )?;

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.rating.validate()?;
    config.adjustments.validate()?;

    Ok(())
}

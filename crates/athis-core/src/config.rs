//! TOML configuration.
//!
//! ```toml
//! [routing]
//! base_url = "https://graphhopper.com/api/1"
//! api_key = "${GRAPHHOPPER_API_KEY}"
//! timeout_secs = 10
//!
//! [storage]
//! backend = "file"
//! path = "./athis-demands.json"
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```
//!
//! Every section is optional. `${VAR}` placeholders are replaced from the
//! environment; unknown variables are left as-is.

use std::path::Path;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::RetryPolicy;
use crate::domain::{Area, AreaCatalog, AthisError, Result};
use crate::impls::GraphHopperSettings;
use crate::impls::graphhopper::DEFAULT_BASE_URL;

/// Fallback variable consulted when `routing.api_key` is absent.
pub const API_KEY_ENV: &str = "GRAPHHOPPER_API_KEY";

/// Upper bound for `routing.max_attempts`.
pub const MAX_ROUTING_ATTEMPTS: u32 = 10;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AthisConfig {
    pub routing: RoutingConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    /// Replaces the seed catalog when present.
    pub areas: Option<Vec<Area>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub vehicle: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            vehicle: "car".to_string(),
            timeout_secs: 10,
            max_attempts: 1,
            base_delay_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: "./athis-demands.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl AthisConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AthisError::configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content)?;
        let mut config: Self = toml::from_str(&processed)
            .map_err(|e| AthisError::configuration(format!("TOML parsing error: {e}")))?;
        config.apply_env_fallbacks();
        Ok(config)
    }

    /// Defaults plus environment fallbacks.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_fallbacks();
        config
    }

    fn apply_env_fallbacks(&mut self) {
        let unresolved = self
            .routing
            .api_key
            .as_deref()
            .is_none_or(|key| key.trim().is_empty() || key.starts_with("${"));
        if unresolved && let Ok(key) = std::env::var(API_KEY_ENV) {
            self.routing.api_key = Some(key);
        }
    }

    /// Checks values; does not require an api key (routing may be unused).
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.routing.base_url).map_err(|e| {
            AthisError::configuration(format!(
                "routing.base_url '{}': {e}",
                self.routing.base_url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AthisError::configuration(format!(
                "routing.base_url: unsupported scheme {}",
                url.scheme()
            )));
        }
        if self.routing.timeout_secs == 0 {
            return Err(AthisError::configuration("routing.timeout_secs must be at least 1"));
        }
        if !(1..=MAX_ROUTING_ATTEMPTS).contains(&self.routing.max_attempts) {
            return Err(AthisError::configuration(format!(
                "routing.max_attempts must be between 1 and {MAX_ROUTING_ATTEMPTS}"
            )));
        }
        if self.storage.backend == StorageBackend::File && self.storage.path.trim().is_empty() {
            return Err(AthisError::configuration("storage.path cannot be empty"));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(AthisError::configuration(format!(
                "logging.level '{}' is not one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        self.area_catalog()
            .map_err(|e| AthisError::configuration(format!("areas: {e}")))?;
        Ok(())
    }

    pub fn routing_settings(&self) -> GraphHopperSettings {
        GraphHopperSettings {
            base_url: self.routing.base_url.clone(),
            api_key: self.routing.api_key.clone(),
            vehicle: self.routing.vehicle.clone(),
            timeout: Duration::from_secs(self.routing.timeout_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.routing.max_attempts,
            Duration::from_millis(self.routing.base_delay_ms),
        )
    }

    pub fn area_catalog(&self) -> Result<AreaCatalog> {
        match &self.areas {
            Some(areas) => AreaCatalog::new(areas.clone()),
            None => Ok(AreaCatalog::seed()),
        }
    }
}

/// Replaces `${VAR}` with the environment value, leaving unknown names untouched.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| AthisError::configuration(format!("placeholder pattern: {e}")))?;
    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{var_name}}}"))
    });
    Ok(result.into_owned())
}

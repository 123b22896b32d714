//! Configuration management for the spend scoring service

use crate::scoring::confidence::ConfidenceRange;
use crate::types::prediction::SpendThresholds;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Environment variable that overrides the configuration file location
pub const CONFIG_PATH_ENV: &str = "SPEND_SCORING_CONFIG";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scoring: ScoringConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Number of worker threads (0 = one per CPU)
    pub workers: usize,
    /// Maximum accepted JSON body size in bytes
    pub json_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: 0,
            json_limit_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Classification and confidence configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Spend ratio category boundaries
    pub thresholds: SpendThresholds,
    /// Range the placeholder confidence is drawn from
    pub confidence: ConfidenceRange,
    /// Fixed RNG seed; when unset every draw uses fresh entropy
    pub seed: Option<u64>,
}

/// Cross-origin policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allow any origin, method and header, with credentials
    pub permissive: bool,
    /// Origins accepted when `permissive` is off
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            permissive: true,
            allowed_origins: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Semantic problems found after a configuration was parsed
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("spend thresholds must be finite and satisfy 0 <= medium <= high (got medium={medium}, high={high})")]
    InvalidThresholds { medium: f64, high: f64 },

    #[error("confidence range must satisfy 0 <= min <= max <= 1 (got min={min}, max={max})")]
    InvalidConfidenceRange { min: f64, max: f64 },

    #[error("cors.allowed_origins must not be empty when cors.permissive is false")]
    NoAllowedOrigins,

    #[error("unknown logging format '{0}' (expected 'json' or 'pretty')")]
    UnknownLogFormat(String),
}

impl AppConfig {
    /// Load configuration from the path in `SPEND_SCORING_CONFIG`, or from
    /// `config/config.toml`. A missing default file yields built-in defaults.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load_from_path(path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load_from_path(DEFAULT_CONFIG_PATH)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = Config::builder()
            .add_source(File::from(path))
            .build()
            .with_context(|| format!("Failed to build configuration from {}", path.display()))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate().context("Invalid configuration")?;
        Ok(app_config)
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let t = &self.scoring.thresholds;
        if !t.is_valid() {
            return Err(ConfigError::InvalidThresholds {
                medium: t.medium,
                high: t.high,
            });
        }

        let c = &self.scoring.confidence;
        if !c.is_valid() {
            return Err(ConfigError::InvalidConfidenceRange {
                min: c.min,
                max: c.max,
            });
        }

        if !self.cors.permissive && self.cors.allowed_origins.is_empty() {
            return Err(ConfigError::NoAllowedOrigins);
        }

        match self.logging.format.as_str() {
            "json" | "pretty" => Ok(()),
            other => Err(ConfigError::UnknownLogFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.scoring.thresholds.medium, 0.10);
        assert_eq!(config.scoring.thresholds.high, 0.30);
        assert_eq!(config.scoring.confidence.min, 0.70);
        assert_eq!(config.scoring.confidence.max, 0.95);
        assert!(config.scoring.seed.is_none());
        assert!(config.cors.permissive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
            [server]
            port = 9100

            [scoring]
            seed = 7
            "#,
        );

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.scoring.seed, Some(7));
        assert_eq!(config.scoring.thresholds.high, 0.30);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let file = write_config(
            r#"
            [scoring.thresholds]
            medium = 0.5
            high = 0.2
            "#,
        );

        assert!(AppConfig::load_from_path(file.path()).is_err());
    }

    #[test]
    fn test_validate_errors() {
        let mut config = AppConfig::default();
        config.scoring.confidence.max = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidConfidenceRange { min: 0.70, max: 1.5 })
        );

        let mut config = AppConfig::default();
        config.cors.permissive = false;
        assert_eq!(config.validate(), Err(ConfigError::NoAllowedOrigins));

        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownLogFormat("xml".to_string()))
        );
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(ServerConfig::default().bind_address(), "0.0.0.0:8000");
    }
}

//! Configuration management for tallybook
//!
//! This module handles loading, validation, and management of
//! tallybook configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the ledger data directory
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Ledger data file name (JSON)
    #[serde(default = "default_ledger_file")]
    pub ledger_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            ledger_file: default_ledger_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_ledger_file() -> String {
    "ledger.json".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Report computation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Default range mode for summary reports
    #[serde(default)]
    pub default_range: RangeMode,
    /// Upper bound on concurrent per-month aggregations in yearly reports
    #[serde(default = "default_max_concurrent_months")]
    pub max_concurrent_months: usize,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            default_range: RangeMode::default(),
            max_concurrent_months: default_max_concurrent_months(),
        }
    }
}

fn default_max_concurrent_months() -> usize {
    4
}

/// Range mode enumeration for summary reports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMode {
    /// A single calendar month
    Monthly,
    /// A single calendar year
    Yearly,
    /// Trailing twelve months (explicit bounds)
    Last12Months,
    /// Everything since the earliest recorded transaction
    AllTime,
}

impl Default for RangeMode {
    fn default() -> Self {
        RangeMode::Monthly
    }
}

impl std::str::FromStr for RangeMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" | "month" => Ok(RangeMode::Monthly),
            "yearly" | "year" => Ok(RangeMode::Yearly),
            "last12months" | "last-12-months" => Ok(RangeMode::Last12Months),
            "alltime" | "all" => Ok(RangeMode::AllTime),
            _ => Err(format!("Invalid range mode: {}", s)),
        }
    }
}

impl std::fmt::Display for RangeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeMode::Monthly => write!(f, "monthly"),
            RangeMode::Yearly => write!(f, "yearly"),
            RangeMode::Last12Months => write!(f, "last12months"),
            RangeMode::AllTime => write!(f, "alltime"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,
    /// Report computation settings
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.to_string_lossy().to_string(),
                }
            } else {
                ConfigError::IoError
            }
        })?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.reports.max_concurrent_months == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reports.max_concurrent_months".to_string(),
                reason: "Concurrency bound must be at least 1".to_string(),
            });
        }

        match self.logging.level.as_str() {
            "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "logging.level".to_string(),
                    reason: format!("Unknown log level: {}", other),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.data.ledger_file, "ledger.json");
        assert_eq!(config.reports.max_concurrent_months, 4);
        assert_eq!(config.reports.default_range, RangeMode::Monthly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.reports.max_concurrent_months = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_range_mode_round_trip() {
        for mode in [
            RangeMode::Monthly,
            RangeMode::Yearly,
            RangeMode::Last12Months,
            RangeMode::AllTime,
        ] {
            assert_eq!(RangeMode::from_str(&mode.to_string()), Ok(mode));
        }
        assert!(RangeMode::from_str("fortnightly").is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
server:
  host: 127.0.0.1
  port: 9000
data:
  path: /var/lib/tallybook
  ledger_file: book.json
reports:
  default_range: yearly
  max_concurrent_months: 6
logging:
  level: debug
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.data.ledger_file, "book.json");
        assert_eq!(config.reports.default_range, RangeMode::Yearly);
        assert_eq!(config.reports.max_concurrent_months, 6);
        assert!(config.validate().is_ok());
    }
}

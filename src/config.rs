//! Configuration module
//!
//! The service reads a single TOML file. Every section and key is optional;
//! anything missing falls back to its default.
//!
//! ```toml
//! [server]
//! api_host = "0.0.0.0"
//! api_port = 8080
//! shutdown_timeout = 30
//!
//! [database]
//! url = "sqlite://./tourbook.db?mode=rwc"
//! max_connections = 10
//!
//! [logging]
//! level = "info"
//! format = "pretty"   # or "json"
//!
//! [booking]
//! enforce_capacity = false
//! places_released_rule = "reservation_count"   # or "seat_sum"
//! popular_limit = 5
//! default_page_size = 20
//! max_page_size = 100
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::{BookingSettings, QueryLimits};
use crate::domain::reservation::OccupancyRule;
use crate::infrastructure::database::{DatabaseConfig, DEFAULT_DATABASE_URL};

/// Environment variable pointing at the config file
pub const CONFIG_ENV: &str = "TOURBOOK_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub booking: BookingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests after a shutdown signal
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
        }
    }
}

impl From<&DatabaseSection> for DatabaseConfig {
    fn from(s: &DatabaseSection) -> Self {
        DatabaseConfig {
            url: s.url.clone(),
            max_connections: s.max_connections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `RUST_LOG` takes precedence when set
    pub level: String,
    /// `pretty` or `json`
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

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Refuse bookings that would overbook a departure
    pub enforce_capacity: bool,
    /// How released places are counted: `reservation_count` or `seat_sum`
    pub places_released_rule: OccupancyRule,
    pub popular_limit: u64,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        let limits = QueryLimits::default();
        Self {
            enforce_capacity: false,
            places_released_rule: OccupancyRule::BASELINE,
            popular_limit: limits.popular_limit,
            default_page_size: limits.default_page_size,
            max_page_size: limits.max_page_size,
        }
    }
}

impl From<&BookingConfig> for BookingSettings {
    fn from(c: &BookingConfig) -> Self {
        BookingSettings {
            enforce_capacity: c.enforce_capacity,
            occupancy_rule: c.places_released_rule,
            limits: QueryLimits {
                popular_limit: c.popular_limit,
                default_page_size: c.default_page_size,
                max_page_size: c.max_page_size,
            },
        }
    }
}

/// `$TOURBOOK_CONFIG`, else `<config dir>/tourbook/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tourbook")
        .join("config.toml")
}

impl AppConfig {
    /// Load and validate the file at `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text).map_err(|e| match e {
                ConfigError::Parse { source, .. } => ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.booking;
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url must not be empty".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }
        if b.popular_limit == 0 {
            return Err(ConfigError::Invalid("booking.popular_limit must be at least 1".into()));
        }
        if b.default_page_size == 0 || b.max_page_size == 0 {
            return Err(ConfigError::Invalid("booking page sizes must be at least 1".into()));
        }
        if b.default_page_size > b.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "booking.default_page_size ({}) exceeds booking.max_page_size ({})",
                b.default_page_size, b.max_page_size
            )));
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }

    pub fn booking_settings(&self) -> BookingSettings {
        BookingSettings::from(&self.booking)
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::from(&self.database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.api_port, 8080);
        assert!(!cfg.booking.enforce_capacity);
        assert_eq!(cfg.booking.places_released_rule, OccupancyRule::ReservationCount);
        assert_eq!(cfg.booking.popular_limit, 5);
        cfg.validate().unwrap();
    }

    #[test]
    fn booking_section_is_read() {
        let cfg = AppConfig::from_toml(
            r#"
            [booking]
            enforce_capacity = true
            places_released_rule = "seat_sum"
            popular_limit = 8
            "#,
        )
        .unwrap();
        let settings = cfg.booking_settings();
        assert!(settings.enforce_capacity);
        assert_eq!(settings.occupancy_rule, OccupancyRule::SeatSum);
        assert_eq!(settings.limits.popular_limit, 8);
        assert_eq!(settings.limits.max_page_size, 100);
    }

    #[test]
    fn nonsense_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.booking.default_page_size = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = AppConfig::default();
        cfg.database.max_connections = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.booking.default_page_size = 500;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.logging.format = "xml".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unknown_rule_fails_to_parse() {
        let err = AppConfig::from_toml("[booking]\nplaces_released_rule = \"guess\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("tourbook-no-such-dir/config.toml");
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.database.url, DEFAULT_DATABASE_URL);
    }
}

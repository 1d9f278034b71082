//! Process configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Missing or unparseable values fall back to defaults.

use std::fmt;
use std::str::FromStr;

use crate::error::MarketError;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(MarketError::Config(format!("unknown log format: {other}"))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Top-level market configuration.
///
/// Loaded once at startup via [`MarketConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    /// Capacity of the event bus broadcast channel.
    pub event_bus_capacity: usize,

    /// Whether to populate the store with the bootstrap data set.
    pub seed_enabled: bool,

    /// Identity registered as the bootstrap admin.
    pub seed_admin_id: u64,

    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            event_bus_capacity: 1024,
            seed_enabled: true,
            seed_admin_id: 1,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl MarketConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if `SEED_ADMIN_ID` is `0`.
    pub fn from_env() -> Result<Self, MarketError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if `SEED_ADMIN_ID` is `0`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MarketError> {
        let defaults = Self::default();

        let event_bus_capacity =
            parse_value(lookup("EVENT_BUS_CAPACITY"), defaults.event_bus_capacity);
        let seed_enabled = parse_bool(lookup("SEED_ENABLED"), defaults.seed_enabled);
        let seed_admin_id = parse_value(lookup("SEED_ADMIN_ID"), defaults.seed_admin_id);
        if seed_admin_id == 0 {
            return Err(MarketError::Config(
                "SEED_ADMIN_ID must be a positive integer".to_string(),
            ));
        }
        let log_level = lookup("LOG_LEVEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log_level);
        let log_format = parse_value(lookup("LOG_FORMAT"), defaults.log_format);

        Ok(Self {
            event_bus_capacity,
            seed_enabled,
            seed_admin_id,
            log_level,
            log_format,
        })
    }
}

/// Parses `raw` as `T`, returning `default` on missing or invalid values.
fn parse_value<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Parses a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool(raw: Option<String>, default: bool) -> bool {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}

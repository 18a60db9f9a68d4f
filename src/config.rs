//! Configuration module
//!
//! Settings come from a TOML file (default `~/.config/tablebook/config.toml`,
//! overridable via the `TABLEBOOK_CONFIG` env var). Missing file or missing
//! keys fall back to compiled defaults.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub booking: BookingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let cfg = toml::from_str(&raw)?;
        Ok(cfg)
    }
}

/// Default location of the config file under the user config dir.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tablebook")
        .join("config.toml")
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Graceful shutdown timeout in seconds
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

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter, overridable via `RUST_LOG`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Raw booking settings as they appear in the TOML file.
///
/// Times are `HH:MM` strings; `policy()` parses them into a validated
/// [`BookingPolicy`] used by the services.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub opening_time: String,
    pub closing_time: String,
    /// How far ahead bookings are accepted, in days (inclusive)
    pub booking_window_days: i64,
    /// Granularity of the time-slot listing, minutes
    pub slot_interval_minutes: i64,
    /// Minimum free run before the next reservation for a squeeze-in slot
    pub min_slot_gap_minutes: i64,
    pub default_duration_minutes: i64,
    pub min_duration_minutes: i64,
    pub max_duration_minutes: i64,
    pub min_party_size: u32,
    pub max_party_size: u32,
    /// Max non-terminal future reservations per customer, across all dates
    pub max_active_reservations: usize,
    /// Max non-terminal future reservations per customer on one date
    pub max_active_per_day: usize,
    /// Interval of the background expiry sweep, seconds
    pub expiry_check_interval_secs: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            opening_time: "08:00".to_string(),
            closing_time: "22:00".to_string(),
            booking_window_days: 14,
            slot_interval_minutes: 30,
            min_slot_gap_minutes: 60,
            default_duration_minutes: 120,
            min_duration_minutes: 30,
            max_duration_minutes: 480,
            min_party_size: 1,
            max_party_size: 20,
            max_active_reservations: 2,
            max_active_per_day: 1,
            expiry_check_interval_secs: 60,
        }
    }
}

impl BookingConfig {
    /// Parse and validate into the policy struct the services work with.
    pub fn policy(&self) -> DomainResult<BookingPolicy> {
        let opening = parse_hhmm(&self.opening_time)?;
        let closing = parse_hhmm(&self.closing_time)?;
        if opening >= closing {
            return Err(DomainError::Validation(format!(
                "opening_time {} must be before closing_time {}",
                self.opening_time, self.closing_time
            )));
        }
        if self.min_duration_minutes > self.max_duration_minutes {
            return Err(DomainError::Validation(
                "min_duration_minutes must not exceed max_duration_minutes".to_string(),
            ));
        }
        Ok(BookingPolicy {
            opening,
            closing,
            booking_window_days: self.booking_window_days,
            slot_interval_minutes: self.slot_interval_minutes,
            min_slot_gap_minutes: self.min_slot_gap_minutes,
            default_duration_minutes: self.default_duration_minutes,
            min_duration_minutes: self.min_duration_minutes,
            max_duration_minutes: self.max_duration_minutes,
            min_party_size: self.min_party_size,
            max_party_size: self.max_party_size,
            max_active_reservations: self.max_active_reservations,
            max_active_per_day: self.max_active_per_day,
        })
    }
}

fn parse_hhmm(s: &str) -> DomainResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| DomainError::Validation(format!("Invalid time '{}', expected HH:MM", s)))
}

/// Validated booking rules shared by the allocation engine and the
/// availability queries.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    pub opening: NaiveTime,
    pub closing: NaiveTime,
    pub booking_window_days: i64,
    pub slot_interval_minutes: i64,
    pub min_slot_gap_minutes: i64,
    pub default_duration_minutes: i64,
    pub min_duration_minutes: i64,
    pub max_duration_minutes: i64,
    pub min_party_size: u32,
    pub max_party_size: u32,
    pub max_active_reservations: usize,
    pub max_active_per_day: usize,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        // Defaults above always parse
        BookingConfig::default()
            .policy()
            .expect("default booking config is valid")
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_operating_hours() {
        let policy = BookingPolicy::default();
        assert_eq!(policy.opening, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(policy.closing, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
        assert_eq!(policy.booking_window_days, 14);
        assert_eq!(policy.default_duration_minutes, 120);
        assert_eq!(policy.max_active_reservations, 2);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            api_port = 9999

            [booking]
            booking_window_days = 7
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.api_port, 9999);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert_eq!(cfg.booking.booking_window_days, 7);
        assert_eq!(cfg.booking.slot_interval_minutes, 30);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn invalid_time_string_is_rejected() {
        let cfg = BookingConfig {
            opening_time: "8am".to_string(),
            ..BookingConfig::default()
        };
        assert!(cfg.policy().is_err());
    }

    #[test]
    fn opening_after_closing_is_rejected() {
        let cfg = BookingConfig {
            opening_time: "23:00".to_string(),
            closing_time: "08:00".to_string(),
            ..BookingConfig::default()
        };
        assert!(cfg.policy().is_err());
    }
}

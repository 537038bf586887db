//! Configuration module for the badge catalog.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::errors::AppError;
use crate::view::InputRead;

/// Published badge document.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/ggez05/python-credly-scrapper/main/data/badges.json";

/// Quiet window before a filtering pass runs.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Views untouched this long are evicted.
pub const DEFAULT_VIEW_IDLE_SECS: u64 = 1800;

pub const DEFAULT_MAX_VIEWS: usize = 10_000;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the badge JSON document
    pub source_url: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Debounce quiet window for view filtering passes
    pub debounce: Duration,
    /// Optional timeout for the source fetch; unset waits indefinitely
    pub fetch_timeout: Option<Duration>,
    /// Which input a debounced pass applies
    pub search_input: InputRead,
    /// Idle time after which an open view is evicted
    pub view_idle_ttl: Duration,
    /// Maximum number of open views
    pub max_views: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let source_url =
            env::var("BADGE_SOURCE_URL").unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string());

        let bind_addr = env::var("BADGE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Validation(format!("Invalid BADGE_BIND_ADDR: {}", e)))?;

        let log_level = env::var("BADGE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = match env::var("BADGE_LOG_JSON") {
            Ok(v) => parse_bool("BADGE_LOG_JSON", &v)?,
            Err(_) => false,
        };

        let debounce = match env::var("BADGE_DEBOUNCE_MS") {
            Ok(v) => Duration::from_millis(parse_u64("BADGE_DEBOUNCE_MS", &v)?),
            Err(_) => Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        };

        let fetch_timeout = match env::var("BADGE_FETCH_TIMEOUT_SECS") {
            Ok(v) => Some(Duration::from_secs(parse_u64("BADGE_FETCH_TIMEOUT_SECS", &v)?)),
            Err(_) => None,
        };

        let search_input = match env::var("BADGE_SEARCH_INPUT") {
            Ok(v) => InputRead::from_str(&v).ok_or_else(|| {
                AppError::Validation(format!(
                    "Invalid BADGE_SEARCH_INPUT {:?} (expected fresh or stale)",
                    v
                ))
            })?,
            Err(_) => InputRead::default(),
        };

        let view_idle_ttl = match env::var("BADGE_VIEW_IDLE_SECS") {
            Ok(v) => Duration::from_secs(parse_positive("BADGE_VIEW_IDLE_SECS", &v)?),
            Err(_) => Duration::from_secs(DEFAULT_VIEW_IDLE_SECS),
        };

        let max_views = match env::var("BADGE_MAX_VIEWS") {
            Ok(v) => parse_positive("BADGE_MAX_VIEWS", &v)? as usize,
            Err(_) => DEFAULT_MAX_VIEWS,
        };

        Ok(Self {
            source_url,
            bind_addr,
            log_level,
            log_json,
            debounce,
            fetch_timeout,
            search_input,
            view_idle_ttl,
            max_views,
        })
    }
}

fn parse_u64(name: &str, value: &str) -> Result<u64, AppError> {
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Validation(format!("Invalid {}: {}", name, e)))
}

fn parse_positive(name: &str, value: &str) -> Result<u64, AppError> {
    match parse_u64(name, value)? {
        0 => Err(AppError::Validation(format!("{} must be greater than zero", name))),
        n => Ok(n),
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::Validation(format!("Invalid {}: {:?}", name, other))),
    }
}

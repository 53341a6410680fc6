//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument
//! parsing and engine configuration.

use clap::ValueEnum;

use crate::config::constants::{
    DEFAULT_API_BASE, DEFAULT_CACHE_CAPACITY, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    MUTATION_DEBOUNCE, SCROLL_DEBOUNCE,
};
use std::time::Duration;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies beyond value enums).
///
/// This is the core configuration struct used by the engine. It can be
/// constructed programmatically without any CLI parsing.
///
/// # Examples
///
/// ```
/// use truthlens::Config;
///
/// let config = Config {
///     api_base: "http://localhost:8000".into(),
///     cache_capacity: 128,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the product-analysis backend
    pub api_base: String,

    /// Maximum distinct fingerprints retained by the classification cache
    pub cache_capacity: usize,

    /// Per-request timeout for backend calls, in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Debounce window applied to mutation batches before a re-scan
    pub mutation_debounce: Duration,

    /// Debounce window applied to scroll events before a re-scan
    pub scroll_debounce: Duration,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            mutation_debounce: MUTATION_DEBOUNCE,
            scroll_debounce: SCROLL_DEBOUNCE,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

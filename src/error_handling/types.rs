//! Error type definitions.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for the persisted key-value store.
///
/// Store failures never surface to the scan loop; callers swallow them,
/// record a [`ScanEvent::StoreFailure`], and continue with in-memory state.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The underlying SQLite store returned an error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// The store file could not be created.
    #[error("Store file creation error: {0}")]
    FileCreationError(String),
}

/// Events counted during scanning.
///
/// These are the structured observability channel for the engine's fail-soft
/// paths: every recovered failure increments a counter here instead of only
/// emitting a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ScanEvent {
    /// A scan pass executed (initial, mutation-triggered, or scroll-triggered).
    ScanExecuted,
    /// A product element went through extract/classify/render/mark.
    ElementProcessed,
    /// An element was skipped because it was already processed.
    ElementSkipped,
    /// A classification was answered by the remote backend.
    ElementClassified,
    /// A classification was answered from the fingerprint cache.
    CacheHit,
    /// The backend call failed (network, non-2xx, or malformed body).
    TransportFailure,
    /// An expected field selector matched nothing; field degraded to empty.
    FieldMiss,
    /// An element's title was too short to justify a backend call.
    ShortTitleSkip,
    /// A persisted-store operation failed and was swallowed.
    StoreFailure,
}

//! Configuration module.
//!
//! Defines the library configuration struct, CLI value enums, and the
//! operational constants used throughout the engine.

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};

//! Core types for the vessel-control daemon
//!
//! This module contains the fundamental building blocks used throughout the library.

pub mod error;
pub mod types;

pub use self::error::{Error, Result};
pub use self::types::{
    Cardinal,
    Command,
    Config,
    Coordinate,
    LoiterLeg,
    TelemetryEvent,
};

/// Default port the command listener binds to
pub const DEFAULT_COMMAND_PORT: u16 = 9999;

/// Default operator-console port for telemetry pushes
pub const DEFAULT_TELEMETRY_PORT: u16 = 9998;

/// Default command-silence tolerance in minutes
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 20;

/// Maximum accepted command payload in bytes
pub const MAX_COMMAND_SIZE: usize = 1024;

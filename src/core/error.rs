use std::io;
use thiserror::Error;

/// Custom error types for the vessel-control daemon
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Chart load error: {0}")]
    Load(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Telemetry error: {0}")]
    Telemetry(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new chart load error
    pub fn load(msg: impl Into<String>) -> Self {
        Error::Load(msg.into())
    }

    /// Creates a new unknown-command error
    pub fn unknown_command(msg: impl Into<String>) -> Self {
        Error::UnknownCommand(msg.into())
    }

    /// Creates a new telemetry error
    pub fn telemetry(msg: impl Into<String>) -> Self {
        Error::Telemetry(msg.into())
    }

    /// Creates a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Creates a new protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Error::Protocol(msg.into())
    }

    /// Returns true for errors that must abort startup
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Load(_) | Error::Config(_))
    }
}

//! Tiller: a remote vessel navigation and command daemon
//!
//! A command channel drives heading and speed changes, a telemetry channel
//! reports position back to the operator console, and an autonomous
//! return-and-hold behavior brings the vessel home to a holding point when
//! no command arrives within a timeout window.

pub mod core;
pub mod nav;
pub mod network;
pub mod protocol;

// Re-export commonly used items
pub use crate::core::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

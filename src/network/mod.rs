//! Network-facing endpoints
//!
//! This module handles the inbound command connections and the outbound
//! telemetry pushes to the operator console.

mod listener;
mod telemetry;

pub use self::listener::CommandListener;
pub use self::telemetry::{TelemetryHandle, TelemetryPublisher};

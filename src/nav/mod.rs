//! Navigation core: chart lookup, vessel state, and the motion loops
//!
//! This module owns everything that moves the vessel: the safe-water chart,
//! the shared state record, the normal-mode motion engine, and the
//! autonomous return-and-hold controller.

pub mod chart;
pub mod engine;
pub mod hold;
pub mod state;

pub use self::chart::SafeWaterSet;
pub use self::engine::MotionEngine;
pub use self::hold::ReturnAndHoldController;
pub use self::state::{Mode, VesselState};

use tracing::warn;

use crate::core::{Coordinate, TelemetryEvent};
use crate::network::TelemetryHandle;

/// Normalizes an angle in degrees to the [0, 360) range.
pub fn normalize_heading(degrees: f64) -> f64 {
    let normalized = degrees % 360.0;
    if normalized < 0.0 {
        normalized + 360.0
    } else {
        normalized
    }
}

/// Bearing from `position` toward the origin, in degrees [0, 360).
pub fn bearing_to_origin(position: Coordinate) -> f64 {
    let degrees = (-(position.y) as f64)
        .atan2(-(position.x) as f64)
        .to_degrees();
    normalize_heading(degrees)
}

/// Shared per-tick bookkeeping: evaluates the alarm against the chart and
/// publishes either a position report or a MAYDAY. Never halts motion.
pub(crate) fn check_and_report(
    state: &mut VesselState,
    chart: &SafeWaterSet,
    telemetry: &TelemetryHandle,
) {
    let safe = chart.contains(state.position);
    state.alarm = !safe;
    if safe {
        telemetry.publish(TelemetryEvent::position(state.position, state.heading));
    } else {
        warn!("outside safe water at {}", state.position);
        telemetry.publish(TelemetryEvent::Mayday);
    }
}

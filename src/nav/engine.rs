use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::interval;
use tracing::{debug, info};

use crate::core::{Config, Result};
use crate::nav::hold::ReturnAndHoldController;
use crate::nav::state::{Mode, VesselState};
use crate::nav::{check_and_report, SafeWaterSet};
use crate::network::TelemetryHandle;

/// Advances the vessel over discrete time steps while following commands.
///
/// The engine owns the normal-mode tick cadence. Before every tick it checks
/// the command-silence deadline; once it expires (or HOLD was received) the
/// engine hands the vessel to the [`ReturnAndHoldController`] and does not
/// tick again until that controller is preempted by a fresh command.
pub struct MotionEngine {
    /// Shared vessel state
    state: Arc<Mutex<VesselState>>,
    /// Safe-water chart
    chart: Arc<SafeWaterSet>,
    /// Telemetry hand-off
    telemetry: TelemetryHandle,
    /// Runtime configuration
    config: Config,
}

impl MotionEngine {
    /// Creates a new motion engine over the shared state.
    pub fn new(
        state: Arc<Mutex<VesselState>>,
        chart: Arc<SafeWaterSet>,
        telemetry: TelemetryHandle,
        config: Config,
    ) -> Self {
        MotionEngine {
            state,
            chart,
            telemetry,
            config,
        }
    }

    /// Runs the motion loop. Never returns under normal operation.
    pub async fn run(&self) -> Result<()> {
        let mut ticker = interval(self.config.normal_interval());
        loop {
            ticker.tick().await;

            if self.takeover_due().await {
                self.state.lock().await.mode = Mode::ReturnAndHold;
                info!("entering return-and-hold");
                let controller = ReturnAndHoldController::new(
                    self.state.clone(),
                    self.chart.clone(),
                    self.telemetry.clone(),
                    self.config.clone(),
                );
                controller.run().await;
                // Restart the cadence so the first normal tick after a long
                // hold is not a burst of missed ticks.
                ticker = interval(self.config.normal_interval());
                continue;
            }

            self.tick().await;
        }
    }

    /// True when control must pass to the return-and-hold controller:
    /// either HOLD flipped the mode already, or the silence deadline expired.
    async fn takeover_due(&self) -> bool {
        let state = self.state.lock().await;
        state.mode == Mode::ReturnAndHold || state.silent_for() >= self.config.timeout()
    }

    /// One normal-mode tick: displace along the current heading, record the
    /// trail, evaluate the alarm, publish telemetry. A tick at speed 0 has
    /// no side effects at all.
    async fn tick(&self) {
        let mut state = self.state.lock().await;
        if state.speed == 0 {
            return;
        }
        let step = f64::from(state.speed);
        let position = state.advance(step);
        check_and_report(&mut state, &self.chart, &self.telemetry);
        debug!(
            "tick: position {}, heading {}, alarm {}",
            position, state.heading, state.alarm
        );
    }
}

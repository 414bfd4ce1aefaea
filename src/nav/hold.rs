use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::interval;
use tracing::info;

use crate::core::{Config, Coordinate};
use crate::nav::state::{Mode, VesselState};
use crate::nav::{bearing_to_origin, check_and_report, SafeWaterSet};
use crate::network::TelemetryHandle;

/// Two-phase autonomous controller: return to the origin, then loiter.
///
/// Entered when command silence exceeds the timeout or the operator sends
/// HOLD. Both phases run on the tighter hold sub-tick interval and re-check
/// for a fresh command before every sub-tick, so a new command regains
/// control within one sub-tick at most.
pub struct ReturnAndHoldController {
    /// Shared vessel state
    state: Arc<Mutex<VesselState>>,
    /// Safe-water chart
    chart: Arc<SafeWaterSet>,
    /// Telemetry hand-off
    telemetry: TelemetryHandle,
    /// Runtime configuration
    config: Config,
}

impl ReturnAndHoldController {
    /// Creates a controller over the shared state.
    pub fn new(
        state: Arc<Mutex<VesselState>>,
        chart: Arc<SafeWaterSet>,
        telemetry: TelemetryHandle,
        config: Config,
    ) -> Self {
        ReturnAndHoldController {
            state,
            chart,
            telemetry,
            config,
        }
    }

    /// Runs both phases. Returns once a fresh command preempts the controller.
    pub async fn run(&self) {
        info!("returning to origin");
        if !self.return_to_origin().await {
            info!("new command received during return; resuming normal control");
            return;
        }
        info!("holding at origin");
        self.loiter().await;
        info!("new command received; exiting holding");
    }

    /// Phase R: steers toward the origin each sub-tick.
    ///
    /// The step is capped by the remaining distance so the vessel never
    /// overshoots; below one grid unit it snaps directly onto the origin to
    /// avoid oscillating on integer rounding. Returns false if preempted.
    async fn return_to_origin(&self) -> bool {
        let mut ticker = interval(self.config.hold_interval());
        loop {
            ticker.tick().await;
            let mut state = self.state.lock().await;
            if state.mode == Mode::Normal {
                return false;
            }
            if state.position == Coordinate::ORIGIN {
                return true;
            }

            let distance = state.position.distance_to_origin();
            state.heading = bearing_to_origin(state.position);
            if distance < 1.0 {
                state.snap_to(Coordinate::ORIGIN);
            } else {
                // A stranded vessel at speed 0 must still come home.
                let step = f64::from(state.speed.max(1)).min(distance);
                state.advance(step);
            }
            check_and_report(&mut state, &self.chart, &self.telemetry);
        }
    }

    /// Phase H: repeats the configured loiter pattern until preempted.
    async fn loiter(&self) {
        let mut ticker = interval(self.config.hold_interval());
        loop {
            if self.config.loiter_pattern.is_empty() {
                // Degenerate pattern: just idle at the origin until preempted.
                ticker.tick().await;
                if self.preempted().await {
                    return;
                }
                continue;
            }
            for leg in &self.config.loiter_pattern {
                for _ in 0..leg.duration_ticks {
                    ticker.tick().await;
                    let mut state = self.state.lock().await;
                    if state.mode == Mode::Normal {
                        return;
                    }
                    state.heading = leg.direction.heading();
                    let step = f64::from(state.speed);
                    state.advance(step);
                    check_and_report(&mut state, &self.chart, &self.telemetry);
                }
            }
        }
    }

    async fn preempted(&self) -> bool {
        self.state.lock().await.mode == Mode::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, timeout};

    use crate::core::{Command, TelemetryEvent};

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.tick_interval_hold = 0.001;
        config
    }

    fn controller(
        state: Arc<Mutex<VesselState>>,
        chart: SafeWaterSet,
        config: Config,
    ) -> (ReturnAndHoldController, mpsc::Receiver<TelemetryEvent>) {
        let (tx, rx) = mpsc::channel(1024);
        let controller =
            ReturnAndHoldController::new(state, Arc::new(chart), TelemetryHandle::new(tx), config);
        (controller, rx)
    }

    fn big_chart() -> SafeWaterSet {
        let mut points = Vec::new();
        for x in -50..=50 {
            for y in -50..=50 {
                points.push(Coordinate::new(x, y));
            }
        }
        SafeWaterSet::from_points(points)
    }

    async fn held_state(position: Coordinate, speed: u32) -> Arc<Mutex<VesselState>> {
        let state = Arc::new(Mutex::new(VesselState::new()));
        {
            let mut s = state.lock().await;
            s.position = position;
            s.speed = speed;
            s.mode = Mode::ReturnAndHold;
        }
        state
    }

    #[tokio::test]
    async fn test_return_converges_without_overshoot() {
        let state = held_state(Coordinate::new(10, 3), 2).await;
        let (controller, _rx) = controller(state.clone(), big_chart(), fast_config());

        assert!(controller.return_to_origin().await);

        let s = state.lock().await;
        assert_eq!(s.position, Coordinate::ORIGIN);
        // Distance to the origin never increases along the trail.
        let mut last = Coordinate::new(10, 3).distance_to_origin();
        for point in &s.trail {
            let distance = point.distance_to_origin();
            assert!(distance <= last, "overshoot at {point}");
            last = distance;
        }
    }

    #[tokio::test]
    async fn test_return_snaps_from_adjacent_cell() {
        // (1, 1) is sqrt(2) away; one step lands exactly on the origin.
        let state = held_state(Coordinate::new(1, 1), 1).await;
        let (controller, _rx) = controller(state.clone(), big_chart(), fast_config());

        assert!(controller.return_to_origin().await);
        assert_eq!(state.lock().await.position, Coordinate::ORIGIN);
    }

    #[tokio::test]
    async fn test_return_works_at_speed_zero() {
        let state = held_state(Coordinate::new(4, 0), 0).await;
        let (controller, _rx) = controller(state.clone(), big_chart(), fast_config());

        assert!(controller.return_to_origin().await);
        assert_eq!(state.lock().await.position, Coordinate::ORIGIN);
    }

    #[tokio::test]
    async fn test_return_reports_mayday_outside_chart() {
        // Tiny chart: the return path is unsafe water, but motion continues.
        let chart = SafeWaterSet::from_points([Coordinate::ORIGIN]);
        let state = held_state(Coordinate::new(5, 0), 1).await;
        let (controller, mut rx) = controller(state.clone(), chart, fast_config());

        assert!(controller.return_to_origin().await);
        assert_eq!(state.lock().await.position, Coordinate::ORIGIN);

        let first = rx.try_recv().unwrap();
        assert_eq!(first, TelemetryEvent::Mayday);
    }

    #[tokio::test]
    async fn test_preemption_during_return() {
        let state = held_state(Coordinate::new(40, 40), 1).await;
        let (controller, _rx) = controller(state.clone(), big_chart(), fast_config());
        let task = tokio::spawn(async move { controller.run().await });

        sleep(Duration::from_millis(10)).await;
        state.lock().await.apply(Command::East);

        // The controller must notice within one sub-tick.
        timeout(Duration::from_millis(100), task)
            .await
            .expect("controller not preempted")
            .unwrap();
        assert_ne!(state.lock().await.position, Coordinate::ORIGIN);
    }

    #[tokio::test]
    async fn test_preemption_during_loiter() {
        let state = held_state(Coordinate::ORIGIN, 1).await;
        let (controller, _rx) = controller(state.clone(), big_chart(), fast_config());
        let task = tokio::spawn(async move { controller.run().await });

        // Let it settle into the loiter pattern mid-leg.
        sleep(Duration::from_millis(20)).await;
        state.lock().await.apply(Command::SpeedUp1);

        timeout(Duration::from_millis(100), task)
            .await
            .expect("controller not preempted")
            .unwrap();
        assert_eq!(state.lock().await.mode, Mode::Normal);
    }

    #[tokio::test]
    async fn test_loiter_follows_pattern_headings() {
        let state = held_state(Coordinate::ORIGIN, 1).await;
        let mut config = fast_config();
        for leg in &mut config.loiter_pattern {
            leg.duration_ticks = 2;
        }
        let (controller, _rx) = controller(state.clone(), big_chart(), config);
        let task = tokio::spawn(async move { controller.loiter().await });

        sleep(Duration::from_millis(30)).await;
        {
            let s = state.lock().await;
            assert!(!s.trail.is_empty());
            let cardinals = [0.0, 90.0, 180.0, 270.0];
            assert!(cardinals.contains(&s.heading));
        }
        task.abort();
    }

    #[tokio::test]
    async fn test_hold_command_does_not_preempt_holding() {
        let state = held_state(Coordinate::ORIGIN, 0).await;
        let (controller, _rx) = controller(state.clone(), big_chart(), fast_config());
        let task = tokio::spawn(async move { controller.run().await });

        sleep(Duration::from_millis(10)).await;
        // HOLD while holding keeps the controller in charge.
        state.lock().await.apply(Command::Hold);
        sleep(Duration::from_millis(20)).await;
        assert!(!task.is_finished());
        task.abort();
    }
}

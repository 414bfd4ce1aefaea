//! Daemon entry point: load the chart, start the network endpoints, run the
//! motion loop.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use tiller::core::Config;
use tiller::nav::{MotionEngine, SafeWaterSet, VesselState};
use tiller::network::{CommandListener, TelemetryPublisher};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let chart = match SafeWaterSet::load(&config.chart_path) {
        Ok(chart) => chart,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!("loaded {} safe coordinates", chart.len());

    let chart = Arc::new(chart);
    let state = Arc::new(Mutex::new(VesselState::new()));

    let (telemetry, publisher) = TelemetryPublisher::channel(config.telemetry_addr);
    tokio::spawn(publisher.run());

    let listener = match CommandListener::bind(
        config.command_addr,
        state.clone(),
        chart.clone(),
        telemetry.clone(),
    )
    .await
    {
        Ok(listener) => listener,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    tokio::spawn(async move {
        if let Err(e) = listener.run().await {
            error!("command listener failed: {}", e);
            std::process::exit(1);
        }
    });

    let engine = MotionEngine::new(state, chart, telemetry, config);
    if let Err(e) = engine.run().await {
        error!("motion engine failed: {}", e);
        std::process::exit(1);
    }
}

/// Reads configuration from the file named on the command line, or falls
/// back to the built-in defaults.
fn load_config() -> tiller::Result<Config> {
    match std::env::args().nth(1) {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

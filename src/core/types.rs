use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Error, Result};

/// A point on the vessel-local integer grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
}

impl Coordinate {
    /// The holding point the vessel returns to
    pub const ORIGIN: Coordinate = Coordinate { x: 0, y: 0 };

    /// Creates a new coordinate
    pub fn new(x: i64, y: i64) -> Self {
        Coordinate { x, y }
    }

    /// Euclidean distance from this point to the origin
    pub fn distance_to_origin(&self) -> f64 {
        (self.x as f64).hypot(self.y as f64)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal direction, mapped onto the crate-wide heading convention:
/// 0 degrees is East, angles grow counterclockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinal {
    North,
    South,
    East,
    West,
}

impl Cardinal {
    /// Heading in degrees for this direction
    pub fn heading(&self) -> f64 {
        match self {
            Cardinal::East => 0.0,
            Cardinal::North => 90.0,
            Cardinal::West => 180.0,
            Cardinal::South => 270.0,
        }
    }
}

/// A decoded operator command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Turn north
    North,
    /// Turn south
    South,
    /// Turn east
    East,
    /// Turn west
    West,
    /// Increase speed by one step
    SpeedUp1,
    /// Increase speed by five steps
    SpeedUp5,
    /// Decrease speed by one step, floored at zero
    SpeedDown1,
    /// Manually trigger return-and-hold
    Hold,
}

impl Command {
    /// The wire token for this command
    pub fn token(&self) -> &'static str {
        match self {
            Command::North => "N",
            Command::South => "S",
            Command::East => "E",
            Command::West => "W",
            Command::SpeedUp1 => "SPD+1",
            Command::SpeedUp5 => "SPD+5",
            Command::SpeedDown1 => "SPD-1",
            Command::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Command::North),
            "S" => Ok(Command::South),
            "E" => Ok(Command::East),
            "W" => Ok(Command::West),
            "SPD+1" => Ok(Command::SpeedUp1),
            "SPD+5" => Ok(Command::SpeedUp5),
            "SPD-1" => Ok(Command::SpeedDown1),
            "HOLD" => Ok(Command::Hold),
            other => Err(Error::unknown_command(other)),
        }
    }
}

/// One report pushed to the operator console
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryEvent {
    /// Normal position report
    Position { x: i64, y: i64, heading: f64 },
    /// Alarm report: the vessel is outside safe water
    Mayday,
}

impl TelemetryEvent {
    /// Builds a position report from the current state
    pub fn position(position: Coordinate, heading: f64) -> Self {
        TelemetryEvent::Position {
            x: position.x,
            y: position.y,
            heading,
        }
    }
}

impl fmt::Display for TelemetryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryEvent::Position { x, y, heading } => {
                write!(f, "POS:X:{},Y:{},H:{}", x, y, heading)
            }
            TelemetryEvent::Mayday => f.write_str("MAYDAY"),
        }
    }
}

/// One leg of the loiter pattern: a direction held for a number of sub-ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoiterLeg {
    /// Direction to hold for the duration of the leg
    pub direction: Cardinal,
    /// Number of sub-ticks the leg lasts
    pub duration_ticks: u32,
}

/// Configuration for the vessel-control daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the command listener binds to
    pub command_addr: SocketAddr,
    /// Operator console address telemetry is pushed to
    pub telemetry_addr: SocketAddr,
    /// Path to the precomputed safe-water chart
    pub chart_path: PathBuf,
    /// Command silence tolerated before return-and-hold, in minutes
    pub timeout_minutes: u64,
    /// Normal-mode tick interval in seconds
    pub tick_interval_normal: f64,
    /// Return/hold sub-tick interval in seconds
    pub tick_interval_hold: f64,
    /// Repeating pattern executed while holding at the origin
    pub loiter_pattern: Vec<LoiterLeg>,
}

impl Config {
    /// Loads configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|e| Error::config(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.tick_interval_normal <= 0.0 || self.tick_interval_hold <= 0.0 {
            return Err(Error::config("tick intervals must be positive"));
        }
        if self.loiter_pattern.is_empty() {
            return Err(Error::config("loiter pattern must have at least one leg"));
        }
        Ok(())
    }

    /// Command-silence tolerance as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_minutes * 60)
    }

    /// Normal-mode tick interval as a duration
    pub fn normal_interval(&self) -> Duration {
        Duration::from_secs_f64(self.tick_interval_normal)
    }

    /// Return/hold sub-tick interval as a duration
    pub fn hold_interval(&self) -> Duration {
        Duration::from_secs_f64(self.tick_interval_hold)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            command_addr: format!("0.0.0.0:{}", super::DEFAULT_COMMAND_PORT).parse().unwrap(),
            telemetry_addr: format!("127.0.0.1:{}", super::DEFAULT_TELEMETRY_PORT)
                .parse()
                .unwrap(),
            chart_path: PathBuf::from("safe_coords.json"),
            timeout_minutes: super::DEFAULT_TIMEOUT_MINUTES,
            tick_interval_normal: 2.0,
            tick_interval_hold: 0.5,
            loiter_pattern: vec![
                LoiterLeg { direction: Cardinal::East, duration_ticks: 30 },
                LoiterLeg { direction: Cardinal::North, duration_ticks: 30 },
                LoiterLeg { direction: Cardinal::West, duration_ticks: 30 },
                LoiterLeg { direction: Cardinal::South, duration_ticks: 30 },
            ],
        }
    }
}

use std::time::{Duration, Instant};

use crate::core::{Cardinal, Command, Coordinate};

/// Which control loop owns the vessel at this instant.
///
/// Exactly one mode is active at any time: either the vessel follows
/// operator commands, or the return-and-hold controller has it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Following operator commands
    Normal,
    /// Autonomously returning to the origin and loitering there
    ReturnAndHold,
}

/// Mutable record of the vessel: the single source of truth shared between
/// the command listener and the motion loop.
#[derive(Debug)]
pub struct VesselState {
    /// Current position on the grid
    pub position: Coordinate,
    /// Heading in degrees, [0, 360), 0 = East, counterclockwise
    pub heading: f64,
    /// Step size per tick
    pub speed: u32,
    /// True iff the position at the most recent tick was outside safe water
    pub alarm: bool,
    /// Every coordinate visited, one entry per motion tick, never truncated
    pub trail: Vec<Coordinate>,
    /// When the most recent accepted command arrived
    pub last_command: Instant,
    /// Active control mode
    pub mode: Mode,
}

impl VesselState {
    /// Creates the initial state: at the origin, stationary, no alarm.
    pub fn new() -> Self {
        VesselState {
            position: Coordinate::ORIGIN,
            heading: 0.0,
            speed: 0,
            alarm: false,
            trail: Vec::new(),
            last_command: Instant::now(),
            mode: Mode::Normal,
        }
    }

    /// Applies an accepted command.
    ///
    /// Stamps `last_command` for every accepted command. Non-HOLD commands
    /// re-enter normal mode (the only way out of return-and-hold); HOLD
    /// enters return-and-hold regardless of timeout state. Commands never
    /// move the vessel; that is the motion loop's job.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::North => self.heading = Cardinal::North.heading(),
            Command::South => self.heading = Cardinal::South.heading(),
            Command::East => self.heading = Cardinal::East.heading(),
            Command::West => self.heading = Cardinal::West.heading(),
            Command::SpeedUp1 => self.speed += 1,
            Command::SpeedUp5 => self.speed += 5,
            Command::SpeedDown1 => self.speed = self.speed.saturating_sub(1),
            Command::Hold => {}
        }
        self.last_command = Instant::now();
        self.mode = if command == Command::Hold {
            Mode::ReturnAndHold
        } else {
            Mode::Normal
        };
    }

    /// Time elapsed since the last accepted command.
    pub fn silent_for(&self) -> Duration {
        self.last_command.elapsed()
    }

    /// Moves `step` grid units along the current heading and records the
    /// new position in the trail.
    pub fn advance(&mut self, step: f64) -> Coordinate {
        let rad = self.heading.to_radians();
        let dx = (rad.cos() * step).round() as i64;
        let dy = (rad.sin() * step).round() as i64;
        self.position = Coordinate::new(self.position.x + dx, self.position.y + dy);
        self.trail.push(self.position);
        self.position
    }

    /// Jumps directly to `position` and records it in the trail.
    pub fn snap_to(&mut self, position: Coordinate) -> Coordinate {
        self.position = position;
        self.trail.push(position);
        position
    }
}

impl Default for VesselState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = VesselState::new();
        assert_eq!(state.position, Coordinate::ORIGIN);
        assert_eq!(state.speed, 0);
        assert!(!state.alarm);
        assert!(state.trail.is_empty());
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn test_turn_commands_set_heading() {
        let mut state = VesselState::new();
        state.apply(Command::North);
        assert_eq!(state.heading, 90.0);
        state.apply(Command::West);
        assert_eq!(state.heading, 180.0);
        state.apply(Command::South);
        assert_eq!(state.heading, 270.0);
        state.apply(Command::East);
        assert_eq!(state.heading, 0.0);
        // Turning never moves the vessel.
        assert_eq!(state.position, Coordinate::ORIGIN);
        assert!(state.trail.is_empty());
    }

    #[test]
    fn test_speed_commands() {
        let mut state = VesselState::new();
        state.apply(Command::SpeedUp5);
        assert_eq!(state.speed, 5);
        state.apply(Command::SpeedUp1);
        assert_eq!(state.speed, 6);
        state.apply(Command::SpeedDown1);
        assert_eq!(state.speed, 5);
    }

    #[test]
    fn test_speed_floor_at_zero() {
        let mut state = VesselState::new();
        assert_eq!(state.speed, 0);
        state.apply(Command::SpeedDown1);
        assert_eq!(state.speed, 0);
    }

    #[test]
    fn test_hold_enters_return_and_hold() {
        let mut state = VesselState::new();
        state.apply(Command::Hold);
        assert_eq!(state.mode, Mode::ReturnAndHold);
        // Heading and speed are untouched by HOLD.
        assert_eq!(state.heading, 0.0);
        assert_eq!(state.speed, 0);
    }

    #[test]
    fn test_any_other_command_reenters_normal_mode() {
        let mut state = VesselState::new();
        state.apply(Command::Hold);
        assert_eq!(state.mode, Mode::ReturnAndHold);
        state.apply(Command::SpeedUp1);
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn test_commands_stamp_last_command() {
        let mut state = VesselState::new();
        let before = state.last_command;
        std::thread::sleep(Duration::from_millis(5));
        state.apply(Command::Hold);
        assert!(state.last_command > before);
    }

    #[test]
    fn test_advance_matches_displacement_formula() {
        for heading in (0..360).step_by(30) {
            for speed in 0..5u32 {
                let mut state = VesselState::new();
                state.heading = heading as f64;
                let before = state.position;
                state.advance(speed as f64);

                let rad = (heading as f64).to_radians();
                let dx = (rad.cos() * speed as f64).round() as i64;
                let dy = (rad.sin() * speed as f64).round() as i64;
                assert_eq!(state.position, Coordinate::new(before.x + dx, before.y + dy));
                assert_eq!(state.trail.len(), 1);
                assert_eq!(state.trail[0], state.position);
            }
        }
    }

    #[test]
    fn test_advance_east_by_one() {
        let mut state = VesselState::new();
        state.advance(1.0);
        assert_eq!(state.position, Coordinate::new(1, 0));
        state.advance(1.0);
        assert_eq!(state.position, Coordinate::new(2, 0));
        assert_eq!(state.trail, vec![Coordinate::new(1, 0), Coordinate::new(2, 0)]);
    }

    #[test]
    fn test_snap_records_trail_entry() {
        let mut state = VesselState::new();
        state.position = Coordinate::new(1, 1);
        state.snap_to(Coordinate::ORIGIN);
        assert_eq!(state.position, Coordinate::ORIGIN);
        assert_eq!(state.trail, vec![Coordinate::ORIGIN]);
    }
}

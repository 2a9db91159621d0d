use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::grid::{Cell, CellCoord, Grid};
use crate::ray::{beam_angles, Beam};

/// Reward for a committed forward step
pub const REWARD_MOVED: i32 = 1;
/// Reward for a forward step blocked by a wall
pub const REWARD_COLLISION: i32 = -1;
/// Reward for turning in place
pub const REWARD_TURN: i32 = 0;

/// Physical and sensor parameters shared by every robot in a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotParams {
    /// World units per grid cell
    pub cell_size: f32,
    /// World units travelled per forward step
    pub speed: f32,
    /// Radians added (right) or subtracted (left) per turn
    pub turn_increment: f32,
    /// How far ahead the depth probe samples, in world units
    pub depth_probe_distance: f32,
    /// Maximum lidar distance, reported when no wall is hit
    pub sensor_range: f32,
    /// Number of lidar beams over the full circle
    pub beam_count: usize,
}

impl Default for RobotParams {
    fn default() -> Self {
        RobotParams {
            cell_size: 20.0,
            speed: 2.0,
            turn_increment: std::f32::consts::PI / 8.0,
            depth_probe_distance: 1.0,
            sensor_range: 50.0,
            beam_count: 8,
        }
    }
}

impl RobotParams {
    /// Reject parameters that would make sensing or motion meaningless
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("cell_size", self.cell_size),
            ("speed", self.speed),
            ("sensor_range", self.sensor_range),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::invalid_parameter(
                    name,
                    format!("must be finite and positive, got {}", value),
                ));
            }
        }
        for (name, value) in [
            ("turn_increment", self.turn_increment),
            ("depth_probe_distance", self.depth_probe_distance),
        ] {
            if !value.is_finite() {
                return Err(SimError::invalid_parameter(name, "must be finite"));
            }
        }
        if self.beam_count == 0 {
            return Err(SimError::invalid_parameter("beam_count", "must be at least 1"));
        }
        Ok(())
    }
}

/// Robot pose: continuous world position and heading in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub heading: f32,
}

/// Point robot moving through a maze grid
#[derive(Debug, Clone)]
pub struct Robot {
    pub pose: Pose,
    pub params: RobotParams,
}

impl Robot {
    pub fn new(x: f32, y: f32, heading: f32, params: RobotParams) -> Self {
        Robot {
            pose: Pose { x, y, heading },
            params,
        }
    }

    /// Robot placed exactly on `cell`, facing +x
    pub fn at_cell(cell: CellCoord, params: RobotParams) -> Self {
        let (x, y) = cell.to_world(params.cell_size);
        Self::new(x, y, 0.0, params)
    }

    /// Grid cell the robot's position rounds to
    pub fn grid_cell(&self) -> CellCoord {
        CellCoord::from_world(self.pose.x, self.pose.y, self.params.cell_size)
    }

    /// State of the cell one probe distance straight ahead.
    /// Outside the grid reads as a wall.
    pub fn sense_depth(&self, grid: &Grid) -> Cell {
        let beam = Beam::new(self.pose.x, self.pose.y, self.pose.heading);
        grid.cell_at(beam.cell_at(self.params.depth_probe_distance, self.params.cell_size))
    }

    /// Distance to the nearest wall along each beam, starting at the heading
    pub fn sense_lidar(&self, grid: &Grid) -> Vec<f32> {
        beam_angles(self.pose.heading, self.params.beam_count)
            .map(|angle| {
                Beam::new(self.pose.x, self.pose.y, angle).cast(
                    grid,
                    self.params.cell_size,
                    self.params.sensor_range,
                )
            })
            .collect()
    }

    /// Step forward by `speed` if the destination rounds to an open cell.
    ///
    /// Returns [`REWARD_MOVED`] when the step is committed, otherwise leaves
    /// the pose untouched and returns [`REWARD_COLLISION`].
    pub fn move_forward(&mut self, grid: &Grid) -> i32 {
        let new_x = self.pose.x + self.params.speed * self.pose.heading.cos();
        let new_y = self.pose.y + self.params.speed * self.pose.heading.sin();
        let target = CellCoord::from_world(new_x, new_y, self.params.cell_size);

        if grid.cell_at(target) == Cell::Open {
            self.pose.x = new_x;
            self.pose.y = new_y;
            REWARD_MOVED
        } else {
            REWARD_COLLISION
        }
    }

    pub fn turn_left(&mut self) -> i32 {
        self.pose.heading -= self.params.turn_increment;
        REWARD_TURN
    }

    pub fn turn_right(&mut self) -> i32 {
        self.pose.heading += self.params.turn_increment;
        REWARD_TURN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn corridor() -> Grid {
        // Open cells (1,1)..(3,1)
        Grid::parse("#####\n#...#\n#####\n").unwrap()
    }

    #[test]
    fn test_at_cell_rounds_back_to_cell() {
        let robot = Robot::at_cell(CellCoord::new(3, 2), RobotParams::default());
        assert_eq!(robot.pose.x, 60.0);
        assert_eq!(robot.pose.y, 40.0);
        assert_eq!(robot.grid_cell(), CellCoord::new(3, 2));
    }

    #[test]
    fn test_move_forward_into_open_cell() {
        let grid = corridor();
        let mut robot = Robot::at_cell(CellCoord::new(1, 1), RobotParams::default());
        assert_eq!(robot.move_forward(&grid), REWARD_MOVED);
        assert_eq!(robot.pose.x, 22.0);
        assert_eq!(robot.pose.y, 20.0);
    }

    #[test]
    fn test_move_forward_into_wall_keeps_pose() {
        let grid = corridor();
        let mut robot = Robot::at_cell(CellCoord::new(1, 1), RobotParams::default());
        robot.pose.heading = PI;
        robot.pose.x = 11.0; // next step lands at x=9, which rounds to column 0

        let before = robot.pose;
        assert_eq!(robot.move_forward(&grid), REWARD_COLLISION);
        assert_eq!(robot.pose.x.to_bits(), before.x.to_bits());
        assert_eq!(robot.pose.y.to_bits(), before.y.to_bits());
        assert_eq!(robot.pose.heading.to_bits(), before.heading.to_bits());
    }

    #[test]
    fn test_turns_change_heading_by_increment() {
        let params = RobotParams::default();
        let mut robot = Robot::new(20.0, 20.0, 0.0, params);

        assert_eq!(robot.turn_right(), REWARD_TURN);
        assert_eq!(robot.pose.heading, params.turn_increment);

        assert_eq!(robot.turn_left(), REWARD_TURN);
        assert_eq!(robot.turn_left(), REWARD_TURN);
        assert_eq!(robot.pose.heading, -params.turn_increment);
    }

    #[test]
    fn test_depth_reads_wall_ahead() {
        let grid = corridor();
        let mut params = RobotParams::default();
        params.depth_probe_distance = 20.0;

        let mut robot = Robot::new(20.0, 20.0, 0.0, params);
        assert_eq!(robot.sense_depth(&grid), Cell::Open);

        robot.pose.heading = -FRAC_PI_2;
        assert_eq!(robot.sense_depth(&grid), Cell::Wall);
    }

    #[test]
    fn test_depth_out_of_bounds_is_wall() {
        let grid = Grid::filled(3, 3, Cell::Open);
        let robot = Robot::new(0.0, 0.0, PI, RobotParams::default());
        // Probe at x = -1 rounds to column 0, still inside
        assert_eq!(robot.sense_depth(&grid), Cell::Open);

        let mut params = RobotParams::default();
        params.depth_probe_distance = 15.0;
        let robot = Robot::new(0.0, 0.0, PI, params);
        assert_eq!(robot.sense_depth(&grid), Cell::Wall);
    }

    #[test]
    fn test_lidar_reading_count_and_bounds() {
        let grid = corridor();
        let robot = Robot::at_cell(CellCoord::new(2, 1), RobotParams::default());
        let readings = robot.sense_lidar(&grid);
        assert_eq!(readings.len(), 8);
        for r in &readings {
            assert!(*r >= 0.0 && *r <= 50.0);
        }
        // Facing +x from x=40: wall column 4 starts at x=70
        assert_eq!(readings[0], 30.0);
        // Straight down from y=20: wall row 2 starts at y=30
        assert_eq!(readings[2], 10.0);
    }

    #[test]
    fn test_validate_rejects_bad_params() {
        let mut params = RobotParams::default();
        params.beam_count = 0;
        assert!(params.validate().is_err());

        let mut params = RobotParams::default();
        params.cell_size = 0.0;
        assert!(params.validate().is_err());

        assert!(RobotParams::default().validate().is_ok());
    }
}

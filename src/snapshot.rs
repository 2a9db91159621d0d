use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::grid::{CellCoord, Grid};
use crate::robot::{Pose, Robot};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid_cols: i32,
    pub grid_rows: i32,
    /// Grid rows, '#' for walls and '.' for open cells
    pub cells: Vec<String>,
    pub cell_size: f32,
    pub robot: Pose,
    pub goal: CellCoord,
    /// Lidar distances from the robot's current pose
    pub lidar: Vec<f32>,
    pub finished: bool,
}

impl Snapshot {
    pub fn capture(
        grid: &Grid,
        robot: &Robot,
        goal: CellCoord,
        lidar: Vec<f32>,
        finished: bool,
    ) -> Self {
        Snapshot {
            grid_cols: grid.cols,
            grid_rows: grid.rows,
            cells: grid.to_rows(),
            cell_size: robot.params.cell_size,
            robot: robot.pose,
            goal,
            lidar,
            finished,
        }
    }

    /// Rebuild the grid, checking it against the recorded dimensions
    pub fn restore_grid(&self) -> Result<Grid> {
        let grid = Grid::from_rows(&self.cells)?;
        if grid.cols != self.grid_cols || grid.rows != self.grid_rows {
            return Err(SimError::GridParse(format!(
                "snapshot says {}x{} but rows describe {}x{}",
                self.grid_cols, self.grid_rows, grid.cols, grid.rows
            )));
        }
        Ok(grid)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

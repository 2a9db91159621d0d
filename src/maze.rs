use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, SimError};
use crate::grid::{Cell, CellCoord, Grid};

/// Cell where carving starts and the robot is placed
pub const START_CELL: CellCoord = CellCoord::new(1, 1);

/// Carving directions, two cells per step so a wall stays between carved cells
const DIRECTIONS: [(i32, i32); 4] = [(0, -2), (0, 2), (-2, 0), (2, 0)];

/// Largest accepted width or height, in cells
pub const MAX_DIMENSION: i32 = 4096;

/// Reject maze sizes that are too small to carve or too large to allocate
pub fn check_dimensions(width: i32, height: i32) -> Result<()> {
    let valid = 3..=MAX_DIMENSION;
    if valid.contains(&width) && valid.contains(&height) {
        Ok(())
    } else {
        Err(SimError::InvalidDimensions { width, height })
    }
}

/// Goal cell for a maze of the given size: one step inside the far corner
pub fn goal_cell(cols: i32, rows: i32) -> CellCoord {
    CellCoord::new(cols - 2, rows - 2)
}

/// Randomized depth-first maze generator
pub struct MazeGenerator<R: Rng = ChaCha8Rng> {
    rng: R,
}

impl MazeGenerator<ChaCha8Rng> {
    /// Deterministic generator: same seed, same sequence of mazes
    pub fn seeded(seed: u64) -> Self {
        MazeGenerator {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        MazeGenerator {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl<R: Rng> MazeGenerator<R> {
    pub fn new(rng: R) -> Self {
        MazeGenerator { rng }
    }

    /// Generate a `width` x `height` maze.
    ///
    /// Carves from [`START_CELL`], then forces [`goal_cell`] open. The goal
    /// override is unconditional, so on grids where carving cannot reach it
    /// (e.g. even dimensions) the goal is an isolated open cell.
    pub fn generate(&mut self, width: i32, height: i32) -> Grid {
        let mut grid = Grid::walls(width, height);
        carve(&mut grid, START_CELL, &mut self.rng);

        let goal = goal_cell(width, height);
        grid.set_cell(goal.x, goal.y, Cell::Open);

        grid
    }
}

/// Pending work for one cell on the carving stack
struct Frame {
    cell: CellCoord,
    directions: [(i32, i32); 4],
    next: usize,
}

impl Frame {
    fn enter<R: Rng + ?Sized>(grid: &mut Grid, cell: CellCoord, rng: &mut R) -> Self {
        grid.set_cell(cell.x, cell.y, Cell::Open);
        let mut directions = DIRECTIONS;
        directions.shuffle(rng);
        Frame {
            cell,
            directions,
            next: 0,
        }
    }
}

/// Depth-first carve from `start`.
///
/// Equivalent to the recursive formulation: a cell shuffles its directions
/// when entered, and each direction is tested only after every earlier
/// sibling subtree has been carved.
pub fn carve<R: Rng + ?Sized>(grid: &mut Grid, start: CellCoord, rng: &mut R) {
    let mut stack = vec![Frame::enter(grid, start, rng)];

    while let Some(frame) = stack.last_mut() {
        if frame.next >= frame.directions.len() {
            stack.pop();
            continue;
        }

        let (dx, dy) = frame.directions[frame.next];
        frame.next += 1;
        let cell = frame.cell;
        let target = cell.offset(dx, dy);

        let inside = target.x > 0
            && target.x < grid.cols - 1
            && target.y > 0
            && target.y < grid.rows - 1;

        if inside && grid.cell_at(target).is_wall() {
            grid.set_cell(cell.x + dx / 2, cell.y + dy / 2, Cell::Open);
            let child = Frame::enter(grid, target, rng);
            stack.push(child);
        }
    }
}

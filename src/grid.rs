use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// State of a single maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Open,
    Wall,
}

impl Cell {
    /// Binary encoding used by sensors and logs: 0=open, 1=wall
    pub fn as_u8(self) -> u8 {
        match self {
            Cell::Open => 0,
            Cell::Wall => 1,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        if value == 0 {
            Cell::Open
        } else {
            Cell::Wall
        }
    }

    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }
}

/// Integer grid coordinate (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        CellCoord { x, y }
    }

    /// Nearest cell to a world-space point for the given cell size
    pub fn from_world(x: f32, y: f32, cell_size: f32) -> Self {
        CellCoord {
            x: (x / cell_size).round() as i32,
            y: (y / cell_size).round() as i32,
        }
    }

    /// World-space point this cell rounds from exactly
    pub fn to_world(self, cell_size: f32) -> (f32, f32) {
        (self.x as f32 * cell_size, self.y as f32 * cell_size)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        CellCoord::new(self.x + dx, self.y + dy)
    }
}

/// Fixed-size maze grid.
/// Anything outside the bounds reads as a wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub rows: i32,
    pub cols: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell set to `fill`
    pub fn filled(cols: i32, rows: i32, fill: Cell) -> Self {
        let cols = cols.max(0);
        let rows = rows.max(0);
        Grid {
            rows,
            cols,
            cells: vec![fill; rows as usize * cols as usize],
        }
    }

    /// Create a grid made entirely of walls
    pub fn walls(cols: i32, rows: i32) -> Self {
        Self::filled(cols, rows, Cell::Wall)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (x + y * self.cols) as usize
    }

    /// Get cell at (x, y), walls outside the grid
    pub fn get_cell(&self, x: i32, y: i32) -> Cell {
        if !self.in_bounds(x, y) {
            return Cell::Wall;
        }
        self.cells[self.index(x, y)]
    }

    pub fn cell_at(&self, coord: CellCoord) -> Cell {
        self.get_cell(coord.x, coord.y)
    }

    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.get_cell(x, y).is_wall()
    }

    pub fn is_open(&self, x: i32, y: i32) -> bool {
        !self.is_wall(x, y)
    }

    /// Set cell at (x, y); writes outside the grid are ignored
    pub fn set_cell(&mut self, x: i32, y: i32, value: Cell) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.cells[idx] = value;
        }
    }

    /// Iterate all open cells in row-major order
    pub fn open_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.rows).flat_map(move |y| {
            (0..self.cols)
                .filter(move |&x| self.is_open(x, y))
                .map(move |x| CellCoord::new(x, y))
        })
    }

    /// One string per row, '#' for walls and '.' for open cells
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.rows)
            .map(|y| {
                (0..self.cols)
                    .map(|x| if self.is_wall(x, y) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    pub fn to_ascii(&self) -> String {
        let mut result = self.to_rows().join("\n");
        result.push('\n');
        result
    }

    /// Parse rows produced by [`Grid::to_rows`].
    /// '#' and '█' are walls; '.', ' ' and '□' are open.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let lines: Vec<&str> = rows
            .iter()
            .map(|r| r.as_ref())
            .filter(|line| !line.trim().is_empty())
            .collect();

        if lines.is_empty() {
            return Err(SimError::GridParse("no grid rows".to_string()));
        }

        let cols = lines[0].chars().count() as i32;
        let mut grid = Grid::walls(cols, lines.len() as i32);

        for (y, line) in lines.iter().enumerate() {
            let width = line.chars().count() as i32;
            if width != cols {
                return Err(SimError::GridParse(format!(
                    "row {} has width {}, expected {}",
                    y, width, cols
                )));
            }
            for (x, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '#' | '█' => Cell::Wall,
                    '.' | ' ' | '□' => Cell::Open,
                    other => {
                        return Err(SimError::GridParse(format!(
                            "unexpected character {:?} at ({}, {})",
                            other, x, y
                        )))
                    }
                };
                grid.set_cell(x as i32, y as i32, cell);
            }
        }

        Ok(grid)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text.lines().collect();
        Self::from_rows(&rows)
    }
}

use crate::grid::{CellCoord, Grid};

/// A single sensor beam marching outward from the robot in unit steps
#[derive(Debug, Clone, Copy)]
pub struct Beam {
    pub origin_x: f32,
    pub origin_y: f32,
    /// Unit direction vector
    pub dir_x: f32,
    pub dir_y: f32,
}

impl Beam {
    pub fn new(origin_x: f32, origin_y: f32, angle: f32) -> Self {
        Beam {
            origin_x,
            origin_y,
            dir_x: angle.cos(),
            dir_y: angle.sin(),
        }
    }

    /// World-space point `distance` units along the beam
    pub fn point_at(&self, distance: f32) -> (f32, f32) {
        (
            self.origin_x + distance * self.dir_x,
            self.origin_y + distance * self.dir_y,
        )
    }

    /// Grid cell nearest to the point `distance` units along the beam
    pub fn cell_at(&self, distance: f32, cell_size: f32) -> CellCoord {
        let (x, y) = self.point_at(distance);
        CellCoord::from_world(x, y, cell_size)
    }

    /// March the beam one unit at a time until a wall or `range`.
    ///
    /// Returns the distance of the first probe landing in a wall (cells
    /// outside the grid count as walls), or `range` when nothing is hit.
    pub fn cast(&self, grid: &Grid, cell_size: f32, range: f32) -> f32 {
        let mut distance = 0.0;
        while distance < range {
            distance += 1.0;
            if grid.cell_at(self.cell_at(distance, cell_size)).is_wall() {
                return distance.min(range);
            }
        }
        range
    }
}

/// Angles of `count` beams evenly spaced over a full turn, starting at `heading`
pub fn beam_angles(heading: f32, count: usize) -> impl Iterator<Item = f32> {
    (0..count).map(move |i| heading + (i as f32 / count as f32) * std::f32::consts::TAU)
}

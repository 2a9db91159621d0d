use std::collections::{HashSet, VecDeque};

use crate::grid::{CellCoord, Grid};

const NEIGHBOURS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Every open cell reachable from `start` through 4-neighbour moves.
/// Empty when `start` itself is a wall.
pub fn reachable_from(grid: &Grid, start: CellCoord) -> HashSet<CellCoord> {
    let mut visited = HashSet::new();
    if grid.cell_at(start).is_wall() {
        return visited;
    }

    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        for (dx, dy) in NEIGHBOURS {
            let next = cell.offset(dx, dy);
            if grid.is_open(next.x, next.y) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited
}

/// Number of 4-neighbour moves on the shortest open path, if any
pub fn path_length(grid: &Grid, from: CellCoord, to: CellCoord) -> Option<usize> {
    if grid.cell_at(from).is_wall() || grid.cell_at(to).is_wall() {
        return None;
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(from);
    queue.push_back((from, 0usize));

    while let Some((cell, dist)) = queue.pop_front() {
        if cell == to {
            return Some(dist);
        }
        for (dx, dy) in NEIGHBOURS {
            let next = cell.offset(dx, dy);
            if grid.is_open(next.x, next.y) && visited.insert(next) {
                queue.push_back((next, dist + 1));
            }
        }
    }

    None
}

/// Open cells not connected to `start`
pub fn isolated_cells(grid: &Grid, start: CellCoord) -> Vec<CellCoord> {
    let reachable = reachable_from(grid, start);
    grid.open_cells().filter(|c| !reachable.contains(c)).collect()
}

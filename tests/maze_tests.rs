mod common;

use common::visualize;
use mazebot::connectivity::{isolated_cells, path_length, reachable_from};
use mazebot::{goal_cell, CellCoord, Grid, MazeGenerator, START_CELL};

fn assert_border_walls(grid: &Grid) {
    for x in 0..grid.cols {
        assert!(grid.is_wall(x, 0), "top border open at x={}", x);
        assert!(grid.is_wall(x, grid.rows - 1), "bottom border open at x={}", x);
    }
    for y in 0..grid.rows {
        assert!(grid.is_wall(0, y), "left border open at y={}", y);
        assert!(grid.is_wall(grid.cols - 1, y), "right border open at y={}", y);
    }
}

#[test]
fn test_borders_are_walls_and_endpoints_open() {
    for seed in 0..25 {
        for (w, h) in [(30, 20), (31, 21), (3, 3), (8, 5), (15, 40)] {
            let grid = MazeGenerator::seeded(seed).generate(w, h);
            assert_eq!((grid.cols, grid.rows), (w, h));
            assert_border_walls(&grid);
            assert!(grid.cell_at(START_CELL) == mazebot::Cell::Open);
            let goal = goal_cell(w, h);
            assert!(grid.cell_at(goal) == mazebot::Cell::Open, "goal closed for {}x{}", w, h);
        }
    }
}

#[test]
fn test_odd_dimensions_fully_connected() {
    for seed in 0..25 {
        let grid = MazeGenerator::seeded(seed).generate(31, 21);
        let isolated = isolated_cells(&grid, START_CELL);
        assert!(
            isolated.is_empty(),
            "seed {} has isolated cells {:?}\n{}",
            seed,
            isolated,
            visualize(&grid, &[(1, 1, 'S'), (29, 19, 'G')])
        );
        assert!(path_length(&grid, START_CELL, goal_cell(31, 21)).is_some());
    }
}

#[test]
fn test_odd_dimensions_carve_every_odd_cell() {
    // Step-2 carving from (1,1) visits the whole odd lattice
    let grid = MazeGenerator::seeded(5).generate(31, 21);
    for y in (1..20).step_by(2) {
        for x in (1..30).step_by(2) {
            assert!(grid.is_open(x, y), "odd cell ({}, {}) not carved", x, y);
        }
    }
    // and never opens an even/even cell
    for y in (2..19).step_by(2) {
        for x in (2..29).step_by(2) {
            assert!(grid.is_wall(x, y), "even cell ({}, {}) opened", x, y);
        }
    }
}

#[test]
fn test_carved_region_is_a_tree() {
    // A perfect maze on the odd lattice: open cells = 2 * lattice cells - 1
    let grid = MazeGenerator::seeded(9).generate(31, 21);
    let lattice = 15 * 10;
    assert_eq!(grid.open_cells().count(), 2 * lattice - 1);
}

/// Even dimensions put the goal on an even/even cell that carving never
/// reaches, so the goal override leaves it disconnected from the start.
#[test]
fn test_even_dimensions_goal_override_is_isolated() {
    for seed in 0..25 {
        let grid = MazeGenerator::seeded(seed).generate(30, 20);
        let goal = goal_cell(30, 20);
        assert_eq!(goal, CellCoord::new(28, 18));

        let reachable = reachable_from(&grid, START_CELL);
        assert!(!reachable.contains(&goal), "seed {} goal unexpectedly connected", seed);
        assert_eq!(isolated_cells(&grid, START_CELL), vec![goal]);
    }
}

#[test]
fn test_every_non_goal_open_cell_reachable() {
    for seed in 0..10 {
        let grid = MazeGenerator::seeded(seed).generate(30, 20);
        let goal = goal_cell(30, 20);
        let reachable = reachable_from(&grid, START_CELL);
        for cell in grid.open_cells().filter(|c| *c != goal) {
            assert!(reachable.contains(&cell), "seed {} cell {:?} unreachable", seed, cell);
        }
    }
}

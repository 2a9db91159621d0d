#![allow(dead_code)]

use mazebot::{Action, Grid, Observation, Policy, PolicyWeights, RobotParams, SessionSettings};
use std::collections::VecDeque;
use std::path::PathBuf;

/// Policy that replays a fixed list of actions, then repeats the last one
pub struct ScriptedPolicy {
    actions: VecDeque<Action>,
    last: Action,
    pub seen_depths: Vec<u8>,
}

impl ScriptedPolicy {
    pub fn new(actions: &[Action]) -> Self {
        ScriptedPolicy {
            actions: actions.iter().copied().collect(),
            last: actions.last().copied().unwrap_or(Action::Forward),
            seen_depths: Vec::new(),
        }
    }
}

impl Policy for ScriptedPolicy {
    fn choose(&mut self, observation: &Observation<'_>, _weights: &PolicyWeights) -> Action {
        self.seen_depths.push(observation.depth.as_u8());
        self.actions.pop_front().unwrap_or(self.last)
    }
}

/// Settings for a hand-built grid; dimensions come from the grid itself
pub fn settings(weights: PolicyWeights) -> SessionSettings {
    SessionSettings {
        width: 0,
        height: 0,
        params: RobotParams::default(),
        profile: "test".to_string(),
        weights,
    }
}

/// Parse an ASCII maze, '#' walls and '.' open
pub fn grid(rows: &[&str]) -> Grid {
    Grid::from_rows(rows).expect("valid test grid")
}

/// Fresh scratch directory under the system temp dir
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mazebot_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Render a grid with the given cells marked, for assertion messages
pub fn visualize(grid: &Grid, marks: &[(i32, i32, char)]) -> String {
    let mut result = String::new();
    for y in 0..grid.rows {
        for x in 0..grid.cols {
            let symbol = marks
                .iter()
                .find(|(mx, my, _)| *mx == x && *my == y)
                .map(|(_, _, c)| *c)
                .unwrap_or(if grid.is_wall(x, y) { '█' } else { '.' });
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}

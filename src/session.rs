use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::action_log::{export_filename, LogEntry, SensedState, StepLog};
use crate::compact_log::CompactLogWriter;
use crate::config::Config;
use crate::connectivity::reachable_from;
use crate::error::{Result, SimError};
use crate::grid::{Cell, CellCoord, Grid};
use crate::maze::{check_dimensions, goal_cell, MazeGenerator, START_CELL};
use crate::policy::{Action, Observation, Policy, PolicyWeights, WeightedPolicy};
use crate::robot::{Robot, RobotParams};
use crate::snapshot::Snapshot;

/// Mixed into the maze seed to derive an independent policy seed
const POLICY_SEED_SALT: u64 = 0x504F_4C49_4359; // "POLICY"

/// Resolved, validated inputs for a session
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub width: i32,
    pub height: i32,
    pub params: RobotParams,
    pub profile: String,
    pub weights: PolicyWeights,
}

impl SessionSettings {
    /// Validate `config` and resolve its selected profile
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(SessionSettings {
            width: config.maze.width,
            height: config.maze.height,
            params: config.robot_params(),
            profile: config.simulation.profile.clone(),
            weights: config.resolve_profile(&config.simulation.profile)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height)?;
        self.params.validate()?;
        self.weights.validate(&self.profile)
    }
}

/// Where a session's maze comes from on each (re)start
pub enum MazeSource {
    Generated(MazeGenerator),
    Fixed(Grid),
}

impl MazeSource {
    fn next_grid(&mut self, width: i32, height: i32) -> Grid {
        match self {
            MazeSource::Generated(generator) => generator.generate(width, height),
            MazeSource::Fixed(grid) => grid.clone(),
        }
    }
}

/// What a single step did
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub action: Action,
    pub reward: i32,
    /// Depth reading the action was chosen from
    pub depth: Cell,
    /// Grid cell of the robot after the action
    pub cell: CellCoord,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// Step applied, more steps may follow
    Stepped(StepOutcome),
    /// Step applied and the robot is now on the goal cell; the session is finished
    GoalReached(StepOutcome),
    /// Session already finished, nothing happened
    Finished,
}

impl StepResult {
    pub fn outcome(&self) -> Option<&StepOutcome> {
        match self {
            StepResult::Stepped(outcome) | StepResult::GoalReached(outcome) => Some(outcome),
            StepResult::Finished => None,
        }
    }
}

/// Totals from [`SimulationSession::run`]
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub reached_goal: bool,
}

/// One simulation run: maze, robot, step log and policy.
///
/// Steps are driven from outside through [`SimulationSession::step`]; the
/// session never schedules itself.
pub struct SimulationSession<P: Policy = WeightedPolicy> {
    settings: SessionSettings,
    source: MazeSource,
    policy: P,
    grid: Grid,
    goal: CellCoord,
    robot: Robot,
    log: StepLog,
    finished: bool,
}

impl SimulationSession<WeightedPolicy> {
    /// Session with a generated maze and the weighted policy.
    /// Seeded from `maze.seed` when present, otherwise from entropy.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = SessionSettings::from_config(config)?;
        let (generator, policy) = match config.maze.seed {
            Some(seed) => (
                MazeGenerator::seeded(seed),
                WeightedPolicy::seeded(seed ^ POLICY_SEED_SALT),
            ),
            None => (MazeGenerator::from_entropy(), WeightedPolicy::from_entropy()),
        };
        Self::new(settings, MazeSource::Generated(generator), policy)
    }
}

impl<P: Policy> SimulationSession<P> {
    pub fn new(settings: SessionSettings, mut source: MazeSource, policy: P) -> Result<Self> {
        settings.validate()?;

        let grid = source.next_grid(settings.width, settings.height);
        // Generated mazes always open the start; fixed grids are checked once
        // here and reused unchanged on restart
        if grid.cell_at(START_CELL).is_wall() {
            return Err(SimError::invalid_parameter(
                "grid",
                format!("start cell ({}, {}) is a wall", START_CELL.x, START_CELL.y),
            ));
        }
        let goal = goal_cell(grid.cols, grid.rows);
        let robot = Robot::at_cell(START_CELL, settings.params);

        let session = SimulationSession {
            settings,
            source,
            policy,
            grid,
            goal,
            robot,
            log: StepLog::new(),
            finished: false,
        };
        session.report_start();
        Ok(session)
    }

    /// Session on a fixed grid, reused on every restart
    pub fn with_grid(settings: SessionSettings, grid: Grid, policy: P) -> Result<Self> {
        let settings = SessionSettings {
            width: grid.cols,
            height: grid.rows,
            ..settings
        };
        Self::new(settings, MazeSource::Fixed(grid), policy)
    }

    fn report_start(&self) {
        info!(
            "Session started: {}x{} maze, profile '{}', goal ({}, {})",
            self.grid.cols, self.grid.rows, self.settings.profile, self.goal.x, self.goal.y
        );
        if !reachable_from(&self.grid, START_CELL).contains(&self.goal) {
            warn!(
                "Goal cell ({}, {}) is not connected to the start cell",
                self.goal.x, self.goal.y
            );
        }
    }

    /// Throw away the current run and begin a fresh one: new maze, robot
    /// back at the start, empty log.
    pub fn restart(&mut self) {
        self.grid = self.source.next_grid(self.settings.width, self.settings.height);
        self.goal = goal_cell(self.grid.cols, self.grid.rows);
        self.robot = Robot::at_cell(START_CELL, self.settings.params);
        self.log.clear();
        self.finished = false;
        self.report_start();
    }

    /// Sense, decide, act, log, then check for the goal
    pub fn step(&mut self) -> StepResult {
        if self.finished {
            return StepResult::Finished;
        }

        let depth = self.robot.sense_depth(&self.grid);
        let lidar = self.robot.sense_lidar(&self.grid);
        let observation = Observation {
            depth,
            lidar: &lidar,
        };
        let action = self.policy.choose(&observation, &self.settings.weights);

        let reward = match action {
            Action::Forward => self.robot.move_forward(&self.grid),
            Action::TurnLeft => self.robot.turn_left(),
            Action::TurnRight => self.robot.turn_right(),
        };

        self.log.push(LogEntry {
            state: SensedState {
                depth: depth.as_u8(),
                lidar,
            },
            action,
            reward,
        });

        let cell = self.robot.grid_cell();
        debug!(
            step = self.log.len(),
            action = action.as_str(),
            reward,
            x = cell.x,
            y = cell.y,
            "step"
        );

        let outcome = StepOutcome {
            action,
            reward,
            depth,
            cell,
        };

        if cell == self.goal {
            self.finished = true;
            info!("Goal reached after {} steps", self.log.len());
            StepResult::GoalReached(outcome)
        } else {
            StepResult::Stepped(outcome)
        }
    }

    /// Step until the goal or `max_steps` steps in this call
    pub fn run(&mut self, max_steps: usize) -> RunSummary {
        let mut steps = 0;
        while steps < max_steps {
            match self.step() {
                StepResult::Stepped(_) => steps += 1,
                StepResult::GoalReached(_) => {
                    steps += 1;
                    break;
                }
                StepResult::Finished => break,
            }
        }
        RunSummary {
            steps,
            reached_goal: self.finished,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn goal(&self) -> CellCoord {
        self.goal
    }

    pub fn log(&self) -> &StepLog {
        &self.log
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn profile(&self) -> &str {
        &self.settings.profile
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Lidar reading from the robot's current pose
    pub fn lidar(&self) -> Vec<f32> {
        self.robot.sense_lidar(&self.grid)
    }

    /// Render frame of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.grid, &self.robot, self.goal, self.lidar(), self.finished)
    }

    /// Write the step log to `dir` as `training_data_<profile>.json`, plus a
    /// `.bin` compact copy when `compact` is set. Returns the written paths.
    pub fn export(&self, dir: impl AsRef<Path>, compact: bool) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let json_path = dir.join(export_filename(&self.settings.profile));
        self.log.save_to_file(&json_path)?;
        let mut written = vec![json_path];

        if compact {
            let mut writer = CompactLogWriter::new();
            writer.write_log(&self.log);
            let bin_path = written[0].with_extension("bin");
            writer.save_to_file(&bin_path)?;
            written.push(bin_path);
        }

        info!("Exported {} log entries to {}", self.log.len(), dir.display());
        Ok(written)
    }
}

pub mod action_log;
pub mod compact_log;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod grid;
pub mod maze;
pub mod policy;
pub mod ray;
pub mod robot;
pub mod session;
pub mod snapshot;
pub mod ticker;

pub use action_log::{LogEntry, SensedState, StepLog};
pub use config::Config;
pub use error::{Result, SimError};
pub use grid::{Cell, CellCoord, Grid};
pub use maze::{goal_cell, MazeGenerator, START_CELL};
pub use policy::{Action, Observation, Policy, PolicyWeights, WeightedPolicy};
pub use robot::{Pose, Robot, RobotParams};
pub use session::{SessionSettings, SimulationSession, StepOutcome, StepResult};
pub use snapshot::Snapshot;
pub use ticker::Ticker;

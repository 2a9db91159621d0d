use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policy::Action;

/// Sensed state before an action: depth bit (0=open, 1=wall) and lidar distances
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensedState {
    pub depth: u8,
    pub lidar: Vec<f32>,
}

/// One simulation step: pre-action state, chosen action, resulting reward
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub state: SensedState,
    pub action: Action,
    pub reward: i32,
}

/// Append-only log of simulation steps
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepLog {
    entries: Vec<LogEntry>,
}

/// Totals over a step log
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogSummary {
    pub steps: usize,
    pub total_reward: i64,
    pub collisions: usize,
    pub action_counts: HashMap<Action, usize>,
}

impl StepLog {
    pub fn new() -> Self {
        StepLog::default()
    }

    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        StepLog { entries }
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<LogEntry> = serde_json::from_str(json)?;
        Ok(StepLog { entries })
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn summary(&self) -> LogSummary {
        let mut summary = LogSummary {
            steps: self.entries.len(),
            ..LogSummary::default()
        };

        for entry in &self.entries {
            summary.total_reward += entry.reward as i64;
            if entry.action == Action::Forward && entry.reward < 0 {
                summary.collisions += 1;
            }
            *summary.action_counts.entry(entry.action).or_insert(0) += 1;
        }

        summary
    }
}

impl LogSummary {
    pub fn count(&self, action: Action) -> usize {
        self.action_counts.get(&action).copied().unwrap_or(0)
    }
}

impl std::fmt::Display for LogSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Steps: {}\n\
             Total reward: {}\n\
             Collisions: {}\n\
             Actions: {} forward, {} left, {} right",
            self.steps,
            self.total_reward,
            self.collisions,
            self.count(Action::Forward),
            self.count(Action::TurnLeft),
            self.count(Action::TurnRight),
        )
    }
}

/// Conventional export filename for a policy profile
pub fn export_filename(profile: &str) -> String {
    format!("training_data_{}.json", profile)
}

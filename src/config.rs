use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Result, SimError};
use crate::maze::check_dimensions;
use crate::policy::PolicyWeights;
use crate::robot::RobotParams;

pub const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub maze: MazeConfig,
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub visual: VisualConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MazeConfig {
    #[serde(default = "default_maze_width")]
    pub width: i32,
    #[serde(default = "default_maze_height")]
    pub height: i32,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    /// Fixed seed for reproducible runs; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RobotConfig {
    #[serde(default = "default_robot_speed")]
    pub speed: f32,
    #[serde(default = "default_robot_radius")]
    pub radius: f32,
    #[serde(default = "default_turn_increment")]
    pub turn_increment: f32,
    #[serde(default = "default_depth_probe_distance")]
    pub depth_probe_distance: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorConfig {
    #[serde(default = "default_sensor_range")]
    pub range: f32,
    #[serde(default = "default_beams")]
    pub beams: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_step_interval_ms")]
    pub step_interval_ms: u64,
    #[serde(default)]
    pub max_steps: Option<usize>,
    #[serde(default = "default_profile")]
    pub profile: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_profiles")]
    pub profiles: BTreeMap<String, PolicyWeights>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_directory")]
    pub directory: String,
    #[serde(default)]
    pub compact: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    #[serde(default = "default_show_lidar")]
    pub show_lidar: bool,
}

// Default values
fn default_maze_width() -> i32 { 30 }
fn default_maze_height() -> i32 { 20 }
fn default_cell_size() -> f32 { 20.0 }
fn default_robot_speed() -> f32 { 2.0 }
fn default_robot_radius() -> f32 { 8.0 }
fn default_turn_increment() -> f32 { std::f32::consts::PI / 8.0 }
fn default_depth_probe_distance() -> f32 { 1.0 }
fn default_sensor_range() -> f32 { 50.0 }
fn default_beams() -> usize { 8 }
fn default_step_interval_ms() -> u64 { 100 }
fn default_profile() -> String { "model1".to_string() }
fn default_export_directory() -> String { ".".to_string() }
fn default_window_title() -> String { "Mazebot - Lidar Maze Runner".to_string() }
fn default_bg_r() -> u8 { 245 }
fn default_bg_g() -> u8 { 245 }
fn default_bg_b() -> u8 { 245 }
fn default_show_lidar() -> bool { true }

/// Built-in weight profiles
pub fn default_profiles() -> BTreeMap<String, PolicyWeights> {
    let mut profiles = BTreeMap::new();
    profiles.insert("model1".to_string(), PolicyWeights::new(0.5, 0.2, 0.3));
    profiles.insert("model2".to_string(), PolicyWeights::new(0.7, 0.15, 0.15));
    profiles.insert("model3".to_string(), PolicyWeights::new(0.4, 0.4, 0.2));
    profiles
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: default_maze_width(),
            height: default_maze_height(),
            cell_size: default_cell_size(),
            seed: None,
        }
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            speed: default_robot_speed(),
            radius: default_robot_radius(),
            turn_increment: default_turn_increment(),
            depth_probe_distance: default_depth_probe_distance(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            range: default_sensor_range(),
            beams: default_beams(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: default_step_interval_ms(),
            max_steps: None,
            profile: default_profile(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
            compact: false,
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            show_lidar: default_show_lidar(),
        }
    }
}

impl Config {
    /// Load `config.toml`, or use defaults if it is missing or malformed
    pub fn load() -> Self {
        Self::load_or_default(CONFIG_PATH)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}; using default configuration", path.display(), e);
                    Config::default()
                }
            },
            Err(_) => {
                info!("No {} found, using default configuration", path.display());
                Config::default()
            }
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn robot_params(&self) -> RobotParams {
        RobotParams {
            cell_size: self.maze.cell_size,
            speed: self.robot.speed,
            turn_increment: self.robot.turn_increment,
            depth_probe_distance: self.robot.depth_probe_distance,
            sensor_range: self.sensor.range,
            beam_count: self.sensor.beams,
        }
    }

    /// Look up a weight profile by name, rejecting unknown names and bad weights
    pub fn resolve_profile(&self, name: &str) -> Result<PolicyWeights> {
        let weights = self
            .policy
            .profiles
            .get(name)
            .copied()
            .ok_or_else(|| SimError::UnknownProfile(name.to_string()))?;
        weights.validate(name)?;
        Ok(weights)
    }

    pub fn profile_names(&self) -> Vec<&str> {
        self.policy.profiles.keys().map(String::as_str).collect()
    }

    /// Everything that must hold before the first step
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.maze.width, self.maze.height)?;
        if self.simulation.step_interval_ms == 0 {
            return Err(SimError::invalid_parameter("step_interval_ms", "must be at least 1"));
        }
        self.robot_params().validate()?;
        self.resolve_profile(&self.simulation.profile)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::MAX_DIMENSION;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.maze.width, 30);
        assert_eq!(config.maze.height, 20);
        assert_eq!(config.sensor.beams, 8);
        assert_eq!(config.profile_names(), vec!["model1", "model2", "model3"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [maze]
            width = 31
            seed = 42

            [simulation]
            profile = "model2"
            "#,
        )
        .unwrap();
        assert_eq!(config.maze.width, 31);
        assert_eq!(config.maze.height, 20);
        assert_eq!(config.maze.seed, Some(42));
        assert_eq!(config.resolve_profile("model2").unwrap(), PolicyWeights::new(0.7, 0.15, 0.15));
    }

    #[test]
    fn test_custom_profiles_replace_builtins() {
        let config = Config::from_toml_str(
            r#"
            [simulation]
            profile = "greedy"

            [policy.profiles.greedy]
            forward = 1.0
            turn_left = 0.0
            turn_right = 0.0
            "#,
        )
        .unwrap();
        assert_eq!(config.profile_names(), vec!["greedy"]);
        assert!(config.validate().is_ok());
        assert!(matches!(
            config.resolve_profile("model1"),
            Err(SimError::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_validate_fails_fast() {
        let mut config = Config::default();
        config.simulation.profile = "nope".to_string();
        assert!(matches!(config.validate(), Err(SimError::UnknownProfile(_))));

        let mut config = Config::default();
        config.maze.width = 2;
        assert!(matches!(config.validate(), Err(SimError::InvalidDimensions { .. })));

        let mut config = Config::default();
        config.maze.width = 50_000;
        config.maze.height = 50_000;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidDimensions { width: 50_000, height: 50_000 })
        ));

        let mut config = Config::default();
        config.maze.height = MAX_DIMENSION + 1;
        assert!(config.validate().is_err());
        config.maze.height = MAX_DIMENSION;
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.sensor.beams = 0;
        assert!(matches!(config.validate(), Err(SimError::InvalidParameter { .. })));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(Config::from_toml_str("[maze]\nwidth = \"wide\"\n").is_err());
    }
}

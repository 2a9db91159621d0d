//! Error types for maze simulation.

use thiserror::Error;

/// Errors surfaced while configuring a session or moving data in and out of it.
///
/// Sensing and motion never produce errors: out-of-bounds probes read as
/// walls and collisions are reported through a negative reward.
#[derive(Debug, Error)]
pub enum SimError {
    /// Maze dimensions too small for step-2 carving, or above
    /// [`MAX_DIMENSION`](crate::maze::MAX_DIMENSION).
    #[error("invalid maze dimensions {width}x{height}: each must be between 3 and 4096")]
    InvalidDimensions {
        /// Requested width in cells.
        width: i32,
        /// Requested height in cells.
        height: i32,
    },

    /// Policy profile name not present in the configuration.
    #[error("unknown policy profile: {0}")]
    UnknownProfile(String),

    /// Policy weight outside [0, 1] or not finite.
    #[error("policy profile '{profile}' has invalid {action} weight {value}")]
    InvalidWeight {
        /// Profile the weight belongs to.
        profile: String,
        /// Action the weight applies to.
        action: &'static str,
        /// Offending value.
        value: f32,
    },

    /// Robot or sensor parameter out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the configuration.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Compact log bytes could not be decoded.
    #[error("compact log decode error at byte {offset}: {reason}")]
    Decode {
        /// Byte offset where decoding failed.
        offset: usize,
        /// What went wrong.
        reason: String,
    },

    /// ASCII grid text could not be parsed.
    #[error("grid parse error: {0}")]
    GridParse(String),
}

impl SimError {
    /// Creates an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(offset: usize, reason: impl Into<String>) -> Self {
        Self::Decode {
            offset,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::grid::Cell;

/// Discrete robot action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Forward,
    TurnLeft,
    TurnRight,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Forward, Action::TurnLeft, Action::TurnRight];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::TurnLeft => "turnLeft",
            Action::TurnRight => "turnRight",
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Action::Forward => 0,
            Action::TurnLeft => 1,
            Action::TurnRight => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Action::Forward),
            1 => Some(Action::TurnLeft),
            2 => Some(Action::TurnRight),
            _ => None,
        }
    }
}

/// Per-action weights of a policy profile.
///
/// Weights are each in [0, 1] but need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyWeights {
    pub forward: f32,
    pub turn_left: f32,
    pub turn_right: f32,
}

impl PolicyWeights {
    pub const fn new(forward: f32, turn_left: f32, turn_right: f32) -> Self {
        PolicyWeights {
            forward,
            turn_left,
            turn_right,
        }
    }

    pub fn get(&self, action: Action) -> f32 {
        match action {
            Action::Forward => self.forward,
            Action::TurnLeft => self.turn_left,
            Action::TurnRight => self.turn_right,
        }
    }

    /// Check every weight is finite and within [0, 1]
    pub fn validate(&self, profile: &str) -> Result<()> {
        for action in Action::ALL {
            let value = self.get(action);
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidWeight {
                    profile: profile.to_string(),
                    action: action.as_str(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// What the robot sensed before choosing an action
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    pub depth: Cell,
    pub lidar: &'a [f32],
}

/// Maps sensed state plus weights to exactly one action
pub trait Policy {
    fn choose(&mut self, observation: &Observation<'_>, weights: &PolicyWeights) -> Action;
}

/// Stochastic policy driven by a single uniform draw per decision.
///
/// With nothing ahead: forward below `w.forward`, left below
/// `w.forward + w.turn_left`, otherwise right. With a wall ahead: left below
/// `w.turn_left`, otherwise right. The thresholds are compared as given and
/// are not normalized, so right takes whatever mass remains.
pub struct WeightedPolicy<R: Rng = ChaCha8Rng> {
    rng: R,
}

impl WeightedPolicy<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        WeightedPolicy {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        WeightedPolicy {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl<R: Rng> WeightedPolicy<R> {
    pub fn new(rng: R) -> Self {
        WeightedPolicy { rng }
    }
}

/// Action picked by the weighted rule for a uniform draw `u`
pub fn weighted_action(depth: Cell, u: f32, weights: &PolicyWeights) -> Action {
    match depth {
        Cell::Open => {
            if u < weights.forward {
                Action::Forward
            } else if u < weights.forward + weights.turn_left {
                Action::TurnLeft
            } else {
                Action::TurnRight
            }
        }
        Cell::Wall => {
            if u < weights.turn_left {
                Action::TurnLeft
            } else {
                Action::TurnRight
            }
        }
    }
}

impl<R: Rng> Policy for WeightedPolicy<R> {
    fn choose(&mut self, observation: &Observation<'_>, weights: &PolicyWeights) -> Action {
        let u: f32 = self.rng.gen();
        weighted_action(observation.depth, u, weights)
    }
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn choose(&mut self, observation: &Observation<'_>, weights: &PolicyWeights) -> Action {
        (**self).choose(observation, weights)
    }
}

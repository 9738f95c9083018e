//! Offset tree options.

use crate::{Error, Result, DEFAULT_WEIGHT_FLOOR};

/// How the base learner's raw margin is turned into the routed scalar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputLink {
    /// Hard `-1` / `+1` decisions.
    #[default]
    Binary,
    /// Soft scorer in `[-1, 1]`: `2 / (1 + e^-x) - 1`.
    Glf1,
}

impl OutputLink {
    /// Map the integer scorer option: `0` is binary, anything else the scorer.
    pub fn from_scorer_flag(flag: u32) -> Self {
        if flag == 0 {
            OutputLink::Binary
        } else {
            OutputLink::Glf1
        }
    }

    pub fn apply(self, raw: f64) -> f64 {
        match self {
            OutputLink::Binary => {
                if raw < 0.0 {
                    -1.0
                } else {
                    1.0
                }
            }
            OutputLink::Glf1 => 2.0 / (1.0 + (-raw).exp()) - 1.0,
        }
    }
}

/// Configuration for an [`OffsetTree`](crate::OffsetTree).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffsetTreeConfig {
    /// Number of leaf actions. `0` builds an empty tree.
    pub num_actions: u32,
    /// Shortcut bandwidth, in number of actions. `0` disables shortcuts.
    pub bandwidth: u32,
    /// Link applied to every base-learner output before routing and interpolation.
    pub link: OutputLink,
    /// Seed for weight-flooring draws.
    pub seed: u64,
    /// Importance weights below this are floored (must be finite and > 0).
    pub weight_floor: f64,
}

impl Default for OffsetTreeConfig {
    fn default() -> Self {
        Self {
            num_actions: 0,
            bandwidth: 0,
            link: OutputLink::Binary,
            seed: 0,
            weight_floor: DEFAULT_WEIGHT_FLOOR,
        }
    }
}

impl OffsetTreeConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.weight_floor.is_finite() && self.weight_floor > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "weight_floor must be finite and > 0, got {}",
                self.weight_floor
            )));
        }
        Ok(())
    }
}

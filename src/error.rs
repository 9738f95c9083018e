//! Error types.
//!
//! Setup errors (`Configuration`, `ResourceExhausted`, `InvalidConfig`) abort tree
//! construction. `ContractViolation` is a per-example caller error: it is detected
//! before the tree or the example is touched, so later examples are unaffected.

use thiserror::Error;

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the offset tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The tree was already built with a different leaf count.
    #[error(
        "tree already initialized: new leaf node count ({requested}) does not equal current value ({existing})"
    )]
    Configuration { existing: u32, requested: u32 },

    /// The node array could not be allocated.
    #[error("unable to allocate memory for offset tree (leaf count: {leaf_count})")]
    ResourceExhausted { leaf_count: u32 },

    /// An option value is out of its domain.
    #[error("invalid offset tree configuration: {0}")]
    InvalidConfig(String),

    /// The example handed to `learn` breaks the label contract.
    #[error("contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),
}

/// Ways a training example can break the bandit label contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    #[error("example label is not a cost-sensitive bandit label")]
    NotCostSensitive,

    #[error("cost-sensitive bandit label has no entries")]
    EmptyCostLabel,

    #[error("action id must be positive, got {action}")]
    NonPositiveAction { action: u32 },

    #[error("action {action} has no leaf in a tree with {leaf_count} leaves")]
    ActionOutOfRange { action: u32, leaf_count: u32 },

    #[error("action probability must be finite and positive, got {probability}")]
    InvalidProbability { probability: f64 },
}

impl Error {
    /// True for caller errors on a single example (as opposed to setup errors).
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::ContractViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_names_both_counts() {
        let e = Error::Configuration {
            existing: 8,
            requested: 16,
        };
        let msg = e.to_string();
        assert!(msg.contains("16") && msg.contains('8'), "{msg}");
    }

    #[test]
    fn contract_violation_converts() {
        let e: Error = ContractViolation::EmptyCostLabel.into();
        assert!(e.is_contract_violation());
        assert!(!Error::ResourceExhausted { leaf_count: 3 }.is_contract_violation());
    }
}

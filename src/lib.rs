//! `offtree`: offset-tree reduction for large or continuous action spaces.
//!
//! An offset tree turns a `K`-action decision into a walk down a minimum-depth
//! binary tree: every internal node is an independent binary classifier, every
//! leaf is an action. Choosing an action costs `O(log K)` classifier calls
//! instead of `K`, and so does learning from bandit feedback.
//!
//! The crate provides the tree and the algorithm. The classifiers themselves
//! are supplied by the caller through [`BaseLearner`], addressed by [`NodeId`].
//!
//! ```text
//! let mut tree = OffsetTree::new(cfg)?;       // once
//! let action = tree.predict(&mut base, &mut ex);
//! // ... observe the cost of `action` ...
//! tree.learn(&mut base, &mut ex)?;            // bandit label on `ex`
//! ```
//!
//! **Pieces:**
//! - [`MinDepthBinaryTree`]: array-backed, level-ordered topology; optional
//!   bandwidth shortcuts that route without consulting a classifier.
//! - [`OffsetTree::predict`]: root-to-leaf routing.
//! - [`OffsetTree::learn`]: bottom-up training from a two-point cost interval,
//!   propagating interpolated costs towards the root ([`CostFrontier`]).
//! - [`WeightFloor`]: seeded rejection sampling for tiny importance weights.
//!
//! **Non-goals:**
//! - No feature representation or hashing; `Example<F>` carries features opaquely.
//! - No classifier implementation (gradient descent, regularization, ...).
//! - No per-example pipeline; the caller invokes `predict` then `learn`.
//!
//! Calls are synchronous and must not overlap. Parallelizing across examples
//! requires the base learner to serialize updates per node id.

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod stable_hash;
pub use stable_hash::*;

mod tree;
pub use tree::*;

mod cost;
pub use cost::*;

mod example;
pub use example::{CbClass, CbLabel, Example, Label, Prediction, SimpleLabel};

mod learner;
pub use learner::*;

mod weight_floor;
pub use weight_floor::*;

mod config;
pub use config::*;

mod trace;
pub use trace::*;

mod offset_tree;
pub use offset_tree::*;

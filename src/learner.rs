//! The per-node binary classifier the tree reduces to.
//!
//! The offset tree owns no classifier state. It addresses one classifier per
//! internal node by [`NodeId`] and relies on a [`BaseLearner`] to store and
//! update the parameters behind each id.
//!
//! Requirements on implementations:
//! - Distinct node ids address disjoint parameter sets.
//! - `predict` is deterministic given unchanged state.
//! - `learn` reads the binary label from `ex.label` (a [`Label::Simple`]) and the
//!   importance weight from `ex.weight`.
//! - Calls arrive one at a time. If examples are ever processed in parallel, the
//!   implementation must serialize updates to the same node id; the tree does
//!   not.
//!
//! [`Label::Simple`]: crate::Label::Simple

use crate::{Example, NodeId};

/// Binary classifier keyed by node id.
///
/// # Example
///
/// ```rust
/// use offtree::{BaseLearner, CbLabel, Example, NodeId, OffsetTree, OffsetTreeConfig};
///
/// /// Always routes right.
/// struct AlwaysRight;
///
/// impl BaseLearner<()> for AlwaysRight {
///     fn predict(&mut self, _node: NodeId, _ex: &mut Example<()>) -> f64 {
///         1.0
///     }
///     fn learn(&mut self, _node: NodeId, _ex: &mut Example<()>) {}
/// }
///
/// let cfg = OffsetTreeConfig { num_actions: 4, ..OffsetTreeConfig::default() };
/// let tree = OffsetTree::new(cfg).unwrap();
/// let mut ex = Example::with_costs((), CbLabel::default());
/// assert_eq!(tree.predict(&mut AlwaysRight, &mut ex), 4);
/// ```
pub trait BaseLearner<F> {
    /// Scalar prediction of the classifier at `node`. Negative routes left.
    ///
    /// The example may be used for bookkeeping (e.g. writing `ex.prediction`);
    /// the tree restores it afterwards.
    fn predict(&mut self, node: NodeId, ex: &mut Example<F>) -> f64;

    /// One online update of the classifier at `node`.
    fn learn(&mut self, node: NodeId, ex: &mut Example<F>);
}

impl<F, L: BaseLearner<F> + ?Sized> BaseLearner<F> for &mut L {
    fn predict(&mut self, node: NodeId, ex: &mut Example<F>) -> f64 {
        (**self).predict(node, ex)
    }

    fn learn(&mut self, node: NodeId, ex: &mut Example<F>) {
        (**self).learn(node, ex)
    }
}

impl<F, L: BaseLearner<F> + ?Sized> BaseLearner<F> for Box<L> {
    fn predict(&mut self, node: NodeId, ex: &mut Example<F>) -> f64 {
        (**self).predict(node, ex)
    }

    fn learn(&mut self, node: NodeId, ex: &mut Example<F>) {
        (**self).learn(node, ex)
    }
}

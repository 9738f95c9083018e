#![allow(dead_code)]

use offtree::{BaseLearner, Example, Label, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Per-node weighted mean of the binary labels seen so far.
///
/// Ignores features: enough to check that the tree steers towards cheap actions.
#[derive(Debug, Default)]
pub struct MeanLabelLearner {
    /// node -> (sum of label * weight, sum of weight)
    pub sums: BTreeMap<NodeId, (f64, f64)>,
    pub trained: Vec<NodeId>,
}

impl<F> BaseLearner<F> for MeanLabelLearner {
    fn predict(&mut self, node: NodeId, ex: &mut Example<F>) -> f64 {
        let s = match self.sums.get(&node) {
            Some(&(wl, w)) if w > 0.0 => wl / w,
            _ => 0.0,
        };
        ex.prediction.scalar = s;
        s
    }

    fn learn(&mut self, node: NodeId, ex: &mut Example<F>) {
        let Label::Simple(l) = ex.label else {
            panic!("node {node}: learn without a binary label");
        };
        assert!(!l.is_test(), "node {node}: learn on a test label");
        let e = self.sums.entry(node).or_insert((0.0, 0.0));
        e.0 += l.label * ex.weight;
        e.1 += ex.weight;
        self.trained.push(node);
    }
}

/// Returns seeded pseudo-random scalars in `[-1, 1]` and scribbles on the
/// example, so restore behaviour is actually exercised.
#[derive(Debug)]
pub struct NoisyLearner {
    rng: StdRng,
    pub predicted: Vec<NodeId>,
    pub trained: Vec<NodeId>,
}

impl NoisyLearner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            predicted: Vec::new(),
            trained: Vec::new(),
        }
    }
}

impl<F> BaseLearner<F> for NoisyLearner {
    fn predict(&mut self, node: NodeId, ex: &mut Example<F>) -> f64 {
        let s = self.rng.random_range(-1.0..=1.0);
        ex.prediction.scalar = s;
        ex.prediction.action = node + 1;
        self.predicted.push(node);
        s
    }

    fn learn(&mut self, node: NodeId, ex: &mut Example<F>) {
        ex.weight *= 2.0;
        self.trained.push(node);
    }
}

//! The offset tree: routing (`predict`) and bottom-up training (`learn`).
//!
//! ## Routing
//!
//! Start at the root and walk to a leaf. Shortcut nodes go their fixed way; every
//! other internal node asks the base learner and goes left on a negative scalar.
//! The leaf reached is the chosen 1-based action.
//!
//! Every base-learner output passes through the configured
//! [`OutputLink`](crate::OutputLink) before it is used, so routing and the cost
//! interpolation below always see a scalar in `[-1, 1]`.
//!
//! ## Training
//!
//! A bandit label names an action interval `[first, last]` with the
//! inverse-propensity cost `cost_star = cost / probability` of the first entry.
//! The two ends become frontier nodes `a` and `b` (see [`CostFrontier`]), and
//! the frontier climbs one level per step until it reaches the root. At each
//! step, for `v` in `{a, b}` (only `a` when both share a parent) with sibling `w`:
//!
//! - shortcut parent or `cost(v) == cost(w)`: the parent inherits `cost(v)`;
//! - otherwise the parent's classifier is trained towards the cheaper child
//!   with weight `|cost(v) - cost(w)|` (floored, see [`WeightFloor`]), then
//!   re-queried; with confidence `s = |scalar|` the parent cost is
//!   `min*s + max*(1-s)` when the classifier now agrees, `max*s + min*(1-s)`
//!   otherwise.
//!
//! Both operations overwrite the example's label, weight and prediction while
//! they run and restore them before returning.

use std::fmt;

use crate::example::ScopedExample;
use crate::{
    BaseLearner, ContractViolation, CostFrontier, Example, FloorDecision, Label,
    MinDepthBinaryTree, NodeCost, NodeId, NodeLearnCount, OffsetTreeConfig, Result, SimpleLabel,
    TraceSink, TracingSink, WeightFloor,
};

const LEFT: f64 = -1.0;
const RIGHT: f64 = 1.0;

/// Offset-tree reduction over a fixed number of actions.
///
/// Owns the tree topology; classifier state lives in the [`BaseLearner`] passed
/// to each call. When dropped, per-node learn counts are written to the trace
/// sink.
pub struct OffsetTree {
    cfg: OffsetTreeConfig,
    tree: MinDepthBinaryTree,
    floor: WeightFloor,
    trace_sink: Box<dyn TraceSink>,
}

impl fmt::Debug for OffsetTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffsetTree")
            .field("cfg", &self.cfg)
            .field("tree", &self.tree)
            .field("floor", &self.floor)
            .finish_non_exhaustive()
    }
}

impl OffsetTree {
    /// Validate `cfg` and build the tree for `cfg.num_actions` leaves.
    pub fn new(cfg: OffsetTreeConfig) -> Result<Self> {
        cfg.validate()?;
        let mut tree = MinDepthBinaryTree::new();
        tree.build(cfg.num_actions, cfg.bandwidth)?;
        Ok(Self {
            cfg,
            tree,
            floor: WeightFloor::new(cfg.weight_floor, cfg.seed),
            trace_sink: Box::new(TracingSink),
        })
    }

    /// (Re)initialize the tree.
    ///
    /// A no-op when already built with `num_actions` leaves; any other leaf count
    /// fails with [`Error::Configuration`](crate::Error::Configuration).
    pub fn init(&mut self, num_actions: u32, bandwidth: u32) -> Result<()> {
        let was_built = self.tree.is_initialized();
        self.tree.build(num_actions, bandwidth)?;
        if !was_built {
            self.cfg.num_actions = num_actions;
            self.cfg.bandwidth = bandwidth;
        }
        Ok(())
    }

    pub fn config(&self) -> &OffsetTreeConfig {
        &self.cfg
    }

    pub fn tree(&self) -> &MinDepthBinaryTree {
        &self.tree
    }

    /// Number of per-node classifiers the base learner must host.
    pub fn learner_count(&self) -> u32 {
        self.tree.internal_node_count()
    }

    /// Replace the sink that receives the teardown summary.
    pub fn set_trace_sink(&mut self, sink: impl TraceSink + 'static) {
        self.trace_sink = Box::new(sink);
    }

    pub fn stats_snapshot(&self) -> Vec<NodeLearnCount> {
        self.tree.stats_snapshot()
    }

    pub fn stats_to_string(&self) -> String {
        self.tree.stats_to_string()
    }

    /// Route `ex` to a leaf and return its 1-based action.
    ///
    /// Returns `0` when the tree has no leaves. The example is marked as a test
    /// example while routing and is left as it was found.
    pub fn predict<F, L>(&self, base: &mut L, ex: &mut Example<F>) -> u32
    where
        L: BaseLearner<F> + ?Sized,
    {
        if self.tree.leaf_count() == 0 {
            return 0;
        }
        let nodes = self.tree.nodes();
        let mut ex = ScopedExample::new(ex);
        ex.label = Label::Simple(SimpleLabel::TEST);

        let mut cur = &nodes[0];
        while !cur.is_leaf {
            let next = if cur.right_only {
                cur.right_id
            } else if cur.left_only {
                cur.left_id
            } else {
                ex.prediction.scalar = 0.0;
                let scalar = self.score(base, cur.id, &mut *ex);
                tracing::debug!(node = cur.id, scalar, "routing");
                if scalar < 0.0 {
                    cur.left_id
                } else {
                    cur.right_id
                }
            };
            cur = &nodes[next as usize];
        }
        self.tree.action_for_leaf(cur.id).unwrap_or(0)
    }

    /// [`Self::predict`], then store the action in `ex.prediction.action`.
    pub fn predict_into<F, L>(&self, base: &mut L, ex: &mut Example<F>) -> u32
    where
        L: BaseLearner<F> + ?Sized,
    {
        let action = self.predict(base, ex);
        ex.prediction.action = action;
        action
    }

    /// Train the internal classifiers from one bandit-labelled example.
    ///
    /// A no-op on an empty tree. Label problems are reported as
    /// [`Error::ContractViolation`](crate::Error::ContractViolation) before the
    /// tree or the example is touched.
    ///
    /// The root is trained at most once per call. With leaves at uneven depths
    /// one frontier end can reach the root a level early; from then on it only
    /// carries its cost upward, and the root update comes from whichever end
    /// still has a sibling below it.
    pub fn learn<F, L>(&mut self, base: &mut L, ex: &mut Example<F>) -> Result<()>
    where
        L: BaseLearner<F> + ?Sized,
    {
        if self.tree.leaf_count() == 0 {
            return Ok(());
        }
        let mut frontier = self.init_frontier(ex)?;
        let mut ex = ScopedExample::new(ex);

        for _ in 0..self.tree.depth() {
            let a = frontier.a;
            let b = frontier.b;
            let a_parent = self.parent_of(a.node_id);
            let b_parent = self.parent_of(b.node_id);

            let a_parent_cost = self.parent_cost(base, &mut *ex, &frontier, a);
            let b_parent_cost = if a_parent != b_parent {
                self.parent_cost(base, &mut *ex, &frontier, b)
            } else {
                b.cost
            };

            frontier.a = NodeCost::new(a_parent, a_parent_cost);
            frontier.b = NodeCost::new(b_parent, b_parent_cost);
        }
        Ok(())
    }

    /// Base-learner output at `node`, mapped through the configured link.
    fn score<F, L>(&self, base: &mut L, node: NodeId, ex: &mut Example<F>) -> f64
    where
        L: BaseLearner<F> + ?Sized,
    {
        let raw = base.predict(node, ex);
        self.cfg.link.apply(raw)
    }

    fn parent_of(&self, id: NodeId) -> NodeId {
        self.tree.nodes()[id as usize].parent_id
    }

    fn leaf_for(&self, action: u32) -> std::result::Result<NodeId, ContractViolation> {
        if action == 0 {
            return Err(ContractViolation::NonPositiveAction { action });
        }
        self.tree
            .leaf_for_action(action)
            .ok_or(ContractViolation::ActionOutOfRange {
                action,
                leaf_count: self.tree.leaf_count(),
            })
    }

    fn init_frontier<F>(&self, ex: &Example<F>) -> Result<CostFrontier> {
        let cb = ex.cb_label().ok_or(ContractViolation::NotCostSensitive)?;
        let (Some(first), Some(last)) = (cb.costs.first(), cb.costs.last()) else {
            return Err(ContractViolation::EmptyCostLabel.into());
        };
        let a_id = self.leaf_for(first.action)?;
        let b_id = self.leaf_for(last.action)?;
        if !(first.probability.is_finite() && first.probability > 0.0) {
            return Err(ContractViolation::InvalidProbability {
                probability: first.probability,
            }
            .into());
        }

        let cost_star = first.cost / first.probability;
        tracing::debug!(
            first_action = first.action,
            last_action = last.action,
            a = a_id,
            b = b_id,
            cost_star,
            "frontier initialized"
        );
        Ok(CostFrontier::new(a_id, b_id, cost_star))
    }

    /// Cost propagated from `v` to its parent, training the parent when the
    /// children's costs differ.
    fn parent_cost<F, L>(
        &mut self,
        base: &mut L,
        ex: &mut Example<F>,
        frontier: &CostFrontier,
        v: NodeCost,
    ) -> f64
    where
        L: BaseLearner<F> + ?Sized,
    {
        let cost_v = v.cost;
        // A frontier already at the root has nothing left to train.
        let Some(w) = self.tree.sibling(v.node_id) else {
            return cost_v;
        };
        let parent_id = self.parent_of(v.node_id);
        let parent = &self.tree.nodes()[parent_id as usize];
        if parent.is_shortcut() {
            return cost_v;
        }
        let parent_left = parent.left_id;

        let cost_w = frontier.cost_at(w);
        if cost_v == cost_w {
            return cost_v;
        }

        let cheaper = if cost_v < cost_w { v.node_id } else { w };
        let label = if cheaper == parent_left { LEFT } else { RIGHT };
        let weight = match self.floor.apply((cost_v - cost_w).abs()) {
            FloorDecision::Keep(weight) => weight,
            FloorDecision::Reject => {
                tracing::debug!(node = parent_id, cost_v, cost_w, "tiny weight rejected");
                return cost_v;
            }
        };

        ex.label = Label::Simple(SimpleLabel {
            label,
            initial: 0.0,
        });
        ex.weight = weight;
        base.learn(parent_id, ex);
        self.tree.record_learn(parent_id);
        let scalar = self.score(base, parent_id, ex);
        tracing::debug!(node = parent_id, label, weight, scalar, "trained node");

        let trained = if scalar < 0.0 { LEFT } else { RIGHT };
        let confidence = scalar.abs();
        let (lo, hi) = (cost_v.min(cost_w), cost_v.max(cost_w));
        if trained == label {
            lo * confidence + hi * (1.0 - confidence)
        } else {
            hi * confidence + lo * (1.0 - confidence)
        }
    }
}

impl Drop for OffsetTree {
    fn drop(&mut self) {
        let stats = self.tree.stats_to_string();
        self.trace_sink.trace(&stats);
    }
}

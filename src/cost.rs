//! Cost beliefs tracked while training bottom-up.
//!
//! A learn call brackets the observed action(s) between two frontier nodes `a`
//! and `b`. Over the level-ordered id space the current cost belief is a step
//! function:
//!
//! ```text
//!   id <  a.id          -> 0
//!   id == a.id          -> a.cost
//!   a.id < id < b.id    -> cost_star
//!   id == b.id          -> b.cost
//!   id >  b.id          -> 0
//! ```

use crate::NodeId;

/// A node paired with the cost currently believed for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeCost {
    pub node_id: NodeId,
    pub cost: f64,
}

impl NodeCost {
    pub fn new(node_id: NodeId, cost: f64) -> Self {
        Self { node_id, cost }
    }
}

/// The two frontier nodes plus the flat cost assumed between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostFrontier {
    pub a: NodeCost,
    pub b: NodeCost,
    /// Inverse-propensity cost of the first label entry.
    pub cost_star: f64,
}

impl CostFrontier {
    /// Both ends start at `cost_star`.
    pub fn new(a_id: NodeId, b_id: NodeId, cost_star: f64) -> Self {
        Self {
            a: NodeCost::new(a_id, cost_star),
            b: NodeCost::new(b_id, cost_star),
            cost_star,
        }
    }

    /// Believed cost of node `id`.
    pub fn cost_at(&self, id: NodeId) -> f64 {
        if id < self.a.node_id {
            0.0
        } else if id == self.a.node_id {
            self.a.cost
        } else if id < self.b.node_id {
            self.cost_star
        } else if id == self.b.node_id {
            self.b.cost
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_point_frontier() {
        let f = CostFrontier::new(4, 4, 2.0);
        assert_eq!(f.cost_at(3), 0.0);
        assert_eq!(f.cost_at(4), 2.0);
        assert_eq!(f.cost_at(5), 0.0);
    }

    proptest! {
        #[test]
        fn cost_at_has_exactly_five_regions(
            a_id in 0u32..100,
            gap in 1u32..100,
            a_cost in -10.0f64..10.0,
            b_cost in -10.0f64..10.0,
            cost_star in -10.0f64..10.0,
            query in 0u32..250,
        ) {
            let b_id = a_id + gap;
            let mut f = CostFrontier::new(a_id, b_id, cost_star);
            f.a.cost = a_cost;
            f.b.cost = b_cost;

            let expected = if query < a_id {
                0.0
            } else if query == a_id {
                a_cost
            } else if query < b_id {
                cost_star
            } else if query == b_id {
                b_cost
            } else {
                0.0
            };
            prop_assert_eq!(f.cost_at(query), expected);
        }
    }
}

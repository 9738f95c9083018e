//! Minimum-depth binary tree over a fixed number of leaf actions.
//!
//! The tree lives in a single `Vec<TreeNode>` and every relation (parent, children,
//! sibling) is a `NodeId` index into it. Ids are assigned in level order, heap style:
//!
//! ```text
//!              0
//!          /       \
//!         1         2
//!       /   \     /   \
//!      3     4   5     6        leaf count 4: leaves 3..=6 are actions 1..=4
//! ```
//!
//! For `K` leaves there are `2K - 1` nodes, internal nodes occupy `[0, K - 1)` and
//! leaves occupy `[K - 1, 2K - 1)`. Leaf `id` maps to the 1-based action
//! `id - (K - 1) + 1`.
//!
//! With a non-zero bandwidth two node ids are flagged as shortcuts: routing at a
//! `right_only` node always goes right, at a `left_only` node always goes left, and
//! no classifier is consulted or trained there.

use std::fmt::Write as _;

use crate::{Error, Result};

/// Dense node index into the tree's node array.
pub type NodeId = u32;

/// Stats are reported for internal nodes below this id.
const STATS_MAX_NODE_ID: NodeId = 16;

/// One node of the tree.
///
/// Equality compares topology only; `learn_count` is a diagnostic counter.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode {
    pub id: NodeId,
    pub left_id: NodeId,
    pub right_id: NodeId,
    /// The root is its own parent.
    pub parent_id: NodeId,
    /// `0` at the root.
    pub depth: u32,
    pub left_only: bool,
    pub right_only: bool,
    pub is_leaf: bool,
    /// Number of binary updates applied at this node.
    pub learn_count: u64,
}

impl TreeNode {
    fn leaf(id: NodeId, parent_id: NodeId, depth: u32, left_only: bool, right_only: bool) -> Self {
        Self {
            id,
            left_id: 0,
            right_id: 0,
            parent_id,
            depth,
            left_only,
            right_only,
            is_leaf: true,
            learn_count: 0,
        }
    }

    /// True if routing at this node never consults a classifier.
    #[inline]
    pub fn is_shortcut(&self) -> bool {
        self.left_only || self.right_only
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, rhs: &Self) -> bool {
        self.id == rhs.id
            && self.left_id == rhs.left_id
            && self.right_id == rhs.right_id
            && self.parent_id == rhs.parent_id
            && self.depth == rhs.depth
            && self.left_only == rhs.left_only
            && self.right_only == rhs.right_only
            && self.is_leaf == rhs.is_leaf
    }
}

impl Eq for TreeNode {}

/// The two node ids the bandwidth formula designates as shortcuts.
///
/// These are single, tree-global ids. `None` when the bandwidth is zero or the
/// formula underflows. The root is never flagged even if an id computes to `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShortcutIds {
    pub right_only: Option<NodeId>,
    pub left_only: Option<NodeId>,
}

impl ShortcutIds {
    /// `right_only = K / (2 * bandwidth) - 1`, `left_only = K / bandwidth - 2`
    /// (integer division).
    pub fn compute(leaf_count: u32, bandwidth: u32) -> Self {
        if bandwidth == 0 {
            return Self::default();
        }
        let right_only = bandwidth
            .checked_mul(2)
            .and_then(|bw2| (leaf_count / bw2).checked_sub(1));
        let left_only = (leaf_count / bandwidth).checked_sub(2);
        Self {
            right_only,
            left_only,
        }
    }

    fn flags(&self, id: NodeId) -> (bool, bool) {
        (self.left_only == Some(id), self.right_only == Some(id))
    }
}

/// Learn count of one internal node, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeLearnCount {
    pub id: NodeId,
    pub learn_count: u64,
}

/// Array-backed minimum-depth binary tree.
///
/// Built once with [`MinDepthBinaryTree::build`]; afterwards only the per-node
/// learn counters change.
#[derive(Debug, Clone, Default)]
pub struct MinDepthBinaryTree {
    nodes: Vec<TreeNode>,
    leaf_count: u32,
    depth: u32,
    shortcuts: ShortcutIds,
    initialized: bool,
}

impl MinDepthBinaryTree {
    /// An unbuilt tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree for `leaf_count` actions.
    ///
    /// Calling again with the same leaf count is a no-op; a different leaf count
    /// fails with [`Error::Configuration`] and leaves the tree untouched. A leaf
    /// count of zero yields an empty, initialized tree.
    pub fn build(&mut self, leaf_count: u32, bandwidth: u32) -> Result<()> {
        if self.initialized {
            if leaf_count != self.leaf_count {
                return Err(Error::Configuration {
                    existing: self.leaf_count,
                    requested: leaf_count,
                });
            }
            return Ok(());
        }

        if leaf_count == 0 {
            self.leaf_count = 0;
            self.initialized = true;
            return Ok(());
        }

        let exhausted = Error::ResourceExhausted { leaf_count };
        let total = leaf_count
            .checked_mul(2)
            .map(|n| n - 1)
            .ok_or_else(|| exhausted.clone())?;
        let mut nodes: Vec<TreeNode> = Vec::new();
        nodes
            .try_reserve_exact(total as usize)
            .map_err(|_| exhausted)?;

        let shortcuts = ShortcutIds::compute(leaf_count, bandwidth);

        // Root starts as a leaf and is its own parent.
        nodes.push(TreeNode::leaf(0, 0, 0, false, false));

        let mut depth: u32 = 0;
        // Last id of the current level: 2^(depth+1) - 1.
        let mut level_end: u64 = 1;
        for i in 0..leaf_count - 1 {
            let left = 2 * i + 1;
            let right = 2 * i + 2;

            let parent = &mut nodes[i as usize];
            parent.left_id = left;
            parent.right_id = right;
            parent.is_leaf = false;

            if u64::from(left) >= level_end {
                depth += 1;
                level_end = (1u64 << (depth + 1)) - 1;
            }

            for id in [left, right] {
                let (left_only, right_only) = shortcuts.flags(id);
                nodes.push(TreeNode::leaf(id, i, depth, left_only, right_only));
            }
        }

        tracing::info!(
            leaf_count,
            nodes = nodes.len(),
            depth,
            right_only = ?shortcuts.right_only,
            left_only = ?shortcuts.left_only,
            "built offset tree"
        );

        self.nodes = nodes;
        self.leaf_count = leaf_count;
        self.depth = depth;
        self.shortcuts = shortcuts;
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn leaf_count(&self) -> u32 {
        self.leaf_count
    }

    /// Number of internal nodes, i.e. per-node classifiers the base learner hosts.
    pub fn internal_node_count(&self) -> u32 {
        self.node_count() - self.leaf_count
    }

    pub fn node_count(&self) -> u32 {
        self.nodes.len() as u32
    }

    /// Number of levels below the root.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn shortcut_ids(&self) -> ShortcutIds {
        self.shortcuts
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id as usize)
    }

    /// The other child of `id`'s parent; `None` for the root or an unknown id.
    pub fn sibling(&self, id: NodeId) -> Option<NodeId> {
        if id == 0 {
            return None;
        }
        let v = self.node(id)?;
        let parent = &self.nodes[v.parent_id as usize];
        Some(if v.id == parent.left_id {
            parent.right_id
        } else {
            parent.left_id
        })
    }

    /// Leaf node for a 1-based action, if the action exists.
    pub fn leaf_for_action(&self, action: u32) -> Option<NodeId> {
        if action == 0 || action > self.leaf_count {
            return None;
        }
        Some(action + self.internal_node_count() - 1)
    }

    /// 1-based action for a leaf node id; `None` for internal or unknown ids.
    pub fn action_for_leaf(&self, id: NodeId) -> Option<u32> {
        if id >= self.node_count() {
            return None;
        }
        id.checked_sub(self.internal_node_count()).map(|i| i + 1)
    }

    pub(crate) fn record_learn(&mut self, id: NodeId) {
        if let Some(n) = self.nodes.get_mut(id as usize) {
            n.learn_count += 1;
        }
    }

    /// Learn counts for the low-numbered internal nodes.
    pub fn stats_snapshot(&self) -> Vec<NodeLearnCount> {
        self.nodes
            .iter()
            .take_while(|n| !n.is_leaf && n.id < STATS_MAX_NODE_ID)
            .map(|n| NodeLearnCount {
                id: n.id,
                learn_count: n.learn_count,
            })
            .collect()
    }

    /// Human-readable form of [`Self::stats_snapshot`].
    pub fn stats_to_string(&self) -> String {
        let mut out = String::from("Learn() count per node: ");
        for s in self.stats_snapshot() {
            let _ = write!(out, "id={}, #l={}; ", s.id, s.learn_count);
        }
        out
    }
}

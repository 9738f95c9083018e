mod common;

use common::{MeanLabelLearner, NoisyLearner};
use offtree::{CbClass, CbLabel, Error, Example, NodeId, OffsetTree, OffsetTreeConfig};

fn tree(num_actions: u32, bandwidth: u32) -> OffsetTree {
    OffsetTree::new(OffsetTreeConfig {
        num_actions,
        bandwidth,
        ..OffsetTreeConfig::default()
    })
    .unwrap()
}

fn ancestors(t: &OffsetTree, mut id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    while id != 0 {
        id = t.tree().node(id).unwrap().parent_id;
        out.push(id);
    }
    out
}

#[test]
fn four_action_tree_layout() {
    let t = tree(4, 0);
    assert_eq!(t.tree().node_count(), 7);
    assert_eq!(t.learner_count(), 3);
    let leaves: Vec<(NodeId, u32)> = t
        .tree()
        .nodes()
        .iter()
        .filter(|n| n.is_leaf)
        .map(|n| (n.id, t.tree().action_for_leaf(n.id).unwrap()))
        .collect();
    assert_eq!(leaves, vec![(3, 1), (4, 2), (5, 3), (6, 4)]);
}

#[test]
fn single_entry_label_trains_only_its_path() {
    let mut t = tree(4, 0);
    let mut base = NoisyLearner::new(5);
    let mut ex = Example::with_costs(vec![1.0, 0.5], CbLabel::single(2, 1.0, 0.5));
    let before = ex.clone();

    t.learn(&mut base, &mut ex).unwrap();

    let path = ancestors(&t, 4);
    assert_eq!(path, vec![1, 0]);
    for n in t.tree().nodes() {
        if path.contains(&n.id) {
            assert!(n.learn_count <= 1, "node {} trained {} times", n.id, n.learn_count);
        } else {
            assert_eq!(n.learn_count, 0, "node {} is off the path", n.id);
        }
    }
    // Leaf 4 (cost 2.0) against leaf 3 (cost 0.0) always differs.
    assert_eq!(t.tree().node(1).unwrap().learn_count, 1);
    assert_eq!(ex, before);
}

#[test]
fn predict_before_learning_is_in_range_and_side_effect_free() {
    let t = tree(4, 0);
    let mut base = NoisyLearner::new(17);
    for _ in 0..50 {
        let mut ex = Example::with_costs(vec![0.3], CbLabel::single(3, 0.2, 0.25));
        ex.prediction.scalar = 7.5;
        let before = ex.clone();
        let action = t.predict(&mut base, &mut ex);
        assert!((1..=4).contains(&action), "action={action}");
        assert_eq!(ex, before);
    }
}

#[test]
fn learns_to_avoid_costly_actions() {
    // Action 3 is free, every other action costs 1 under a uniform logging policy.
    let mut t = tree(4, 0);
    let mut base = MeanLabelLearner::default();
    for round in 0..40u32 {
        let action = round % 4 + 1;
        let cost = if action == 3 { 0.0 } else { 1.0 };
        let mut ex = Example::with_costs((), CbLabel::single(action, cost, 0.25));
        t.learn(&mut base, &mut ex).unwrap();
    }
    let mut ex = Example::with_costs((), CbLabel::default());
    assert_eq!(t.predict(&mut base, &mut ex), 3);
    assert!(t.tree().node(0).unwrap().learn_count > 0);
}

#[test]
fn two_entry_label_brackets_an_interval() {
    let mut t = tree(16, 0);
    let mut base = MeanLabelLearner::default();
    let label = CbLabel {
        costs: vec![
            CbClass {
                action: 4,
                cost: 0.5,
                probability: 0.5,
            },
            CbClass {
                action: 6,
                cost: 0.5,
                probability: 0.5,
            },
        ],
    };
    let mut ex = Example::with_costs((), label);
    t.learn(&mut base, &mut ex).unwrap();

    let a_leaf = t.tree().leaf_for_action(4).unwrap();
    let b_leaf = t.tree().leaf_for_action(6).unwrap();
    let mut allowed = ancestors(&t, a_leaf);
    allowed.extend(ancestors(&t, b_leaf));
    assert!(!base.trained.is_empty());
    for n in &base.trained {
        assert!(allowed.contains(n), "trained node {n} is not above either frontier leaf");
    }
}

#[test]
fn rebuild_with_other_leaf_count_is_rejected() {
    let mut t = tree(8, 0);
    t.init(8, 0).unwrap();
    let err = t.init(4, 0).unwrap_err();
    assert_eq!(
        err,
        Error::Configuration {
            existing: 8,
            requested: 4
        }
    );
    assert_eq!(t.tree().leaf_count(), 8);
    assert_eq!(t.tree().node_count(), 15);
}

#[test]
fn bad_label_does_not_poison_later_examples() {
    let mut t = tree(4, 0);
    let mut base = MeanLabelLearner::default();
    let mut bad = Example::with_costs((), CbLabel::single(9, 1.0, 0.5));
    assert!(t.learn(&mut base, &mut bad).unwrap_err().is_contract_violation());
    assert!(base.trained.is_empty());

    let mut good = Example::with_costs((), CbLabel::single(1, 1.0, 0.5));
    t.learn(&mut base, &mut good).unwrap();
    assert!(!base.trained.is_empty());
}

#[test]
fn empty_tree_predicts_zero_and_ignores_learning() {
    let mut t = tree(0, 0);
    let mut base = NoisyLearner::new(1);
    let mut ex = Example::with_costs((), CbLabel::single(1, 1.0, 1.0));
    assert_eq!(t.predict(&mut base, &mut ex), 0);
    t.learn(&mut base, &mut ex).unwrap();
    assert!(base.predicted.is_empty() && base.trained.is_empty());
    assert!(t.stats_snapshot().is_empty());
}

#[test]
fn invalid_weight_floor_is_a_config_error() {
    let err = OffsetTree::new(OffsetTreeConfig {
        num_actions: 4,
        weight_floor: 0.0,
        ..OffsetTreeConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#![cfg(feature = "serde")]

mod common;

use common::MeanLabelLearner;
use offtree::{CbLabel, Example, NodeLearnCount, OffsetTree, OffsetTreeConfig, OutputLink};

#[test]
fn config_survives_json() {
    let cfg = OffsetTreeConfig {
        num_actions: 32,
        bandwidth: 4,
        link: OutputLink::Glf1,
        seed: 99,
        ..OffsetTreeConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    let back: OffsetTreeConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn stats_snapshot_serializes() {
    let mut t = OffsetTree::new(OffsetTreeConfig {
        num_actions: 8,
        ..OffsetTreeConfig::default()
    })
    .unwrap();
    let mut base = MeanLabelLearner::default();
    let mut ex = Example::with_costs((), CbLabel::single(5, 1.0, 0.5));
    t.learn(&mut base, &mut ex).unwrap();

    let json = serde_json::to_string(&t.stats_snapshot()).unwrap();
    assert!(json.contains("\"learn_count\":1"), "{json}");
    let back: Vec<NodeLearnCount> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t.stats_snapshot());
}

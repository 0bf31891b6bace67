#![cfg(feature = "serde")]

use std::collections::BTreeMap;

use arbiter_core::curve::constant;
use arbiter_core::{Goal, GoalGraph, StateLookup, StateMap};
use arbiter_select::{ArbitrationMode, Arbitrator, ArbitratorConfig, Candidate, LyapunovSample};

#[test]
fn arbitrator_config_json_roundtrip() {
    let config = ArbitratorConfig::new(ArbitrationMode::Nash)
        .with_temperature(0.25)
        .with_nash(50, 1e-6)
        .with_lyapunov(0.5, 2.0);

    let json = serde_json::to_string(&config).expect("serialize");
    assert!(json.contains("\"mode\":\"nash\""));
    let roundtrip: ArbitratorConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(roundtrip, config);
}

#[test]
fn empty_config_object_is_the_default() {
    let config: ArbitratorConfig = serde_json::from_str("{}").expect("deserialize");
    assert_eq!(config, ArbitratorConfig::default());
}

#[test]
fn lyapunov_history_json_roundtrip() {
    let mut graph = GoalGraph::new();
    let a = graph
        .insert(Goal::new("a", constant(1.0), |_: &dyn StateLookup| 2.0))
        .unwrap();
    let b = graph
        .insert(Goal::new("b", constant(1.0), |_: &dyn StateLookup| 3.0))
        .unwrap();

    let state = StateMap::new();
    let candidates = vec![
        Candidate::new(a, "a", graph.effective_value(a, 0.0, &state)),
        Candidate::new(b, "b", graph.effective_value(b, 0.0, &state)),
    ];
    let mut arbitrator = Arbitrator::with_mode(ArbitrationMode::Lyapunov);
    arbitrator.pick(&candidates).unwrap();

    let json = serde_json::to_string(arbitrator.history()).expect("serialize");
    let roundtrip: BTreeMap<String, LyapunovSample> =
        serde_json::from_str(&json).expect("deserialize");
    assert_eq!(&roundtrip, arbitrator.history());
    assert_eq!(roundtrip["b"], LyapunovSample { value: 3.0, sequence: 1 });
}

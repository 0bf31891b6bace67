use std::cell::Cell;
use std::rc::Rc;

use arbiter_core::curve::{constant, linear_ramp};
use arbiter_core::{DiagnosticKind, Goal, GoalGraph, GraphError, StateLookup, StateMap, VecSink};
use arbiter_select::{softmax, ArbitrationError, ArbitrationMode, Arbitrator, GoalManager};
use arbiter_traits::Habituation;

fn fixed(name: &str, utility: f64) -> Goal {
    Goal::new(name, constant(1.0), move |_: &dyn StateLookup| utility)
}

fn live_well() -> (GoalGraph, arbiter_core::GoalId) {
    let mut graph = GoalGraph::new();
    let eat = graph
        .insert(Goal::new("Eat", constant(1.0), |s: &dyn StateLookup| {
            1.0 - s.scalar_or("hunger", 0.5)
        }))
        .unwrap();
    let bond = graph
        .insert(Goal::new("Bond", constant(1.0), |s: &dyn StateLookup| {
            s.scalar_or("affection", 0.5)
        }))
        .unwrap();
    let root = graph.insert(fixed("LiveWell", 0.0).with_dependencies([eat, bond])).unwrap();
    (graph, root)
}

#[test]
fn single_selection_descends_into_one_child() {
    let (graph, root) = live_well();
    let arbitrator = Arbitrator::with_mode(ArbitrationMode::Max);
    let mut manager = GoalManager::new(graph, root, arbitrator).unwrap();

    let state = StateMap::new().with("hunger", 0.1).with("affection", 0.3);
    let value = manager.step(1.0, &state).unwrap();

    assert!((value - 0.9).abs() < 1e-12);
    assert_eq!(manager.time(), 1.0);
}

#[test]
fn distribution_blends_children_by_probability() {
    let mut graph = GoalGraph::new();
    let a = graph.insert(fixed("a", 1.0)).unwrap();
    let b = graph.insert(fixed("b", 2.0)).unwrap();
    let c = graph.insert(fixed("c", 3.0)).unwrap();
    let root = graph.insert(fixed("root", 0.0).with_dependencies([a, b, c])).unwrap();

    let arbitrator = Arbitrator::with_mode(ArbitrationMode::Softmax);
    let mut manager = GoalManager::new(graph, root, arbitrator).unwrap();

    let p = softmax(&[1.0, 2.0, 3.0], 1.0);
    let expected = p[0] * 1.0 + p[1] * 2.0 + p[2] * 3.0;
    let value = manager.step(0.5, &StateMap::new()).unwrap();
    assert!((value - expected).abs() < 1e-12);
}

#[test]
fn nested_tree_arbitrates_at_each_level() {
    let mut graph = GoalGraph::new();
    let low = graph.insert(fixed("low", 1.0)).unwrap();
    let high = graph.insert(fixed("high", 5.0)).unwrap();
    let branch = graph.insert(fixed("branch", 0.0).with_dependencies([low, high])).unwrap();
    let other = graph.insert(fixed("other", 2.0)).unwrap();
    let root = graph.insert(fixed("root", 0.0).with_dependencies([branch, other])).unwrap();

    let arbitrator = Arbitrator::with_mode(ArbitrationMode::Max);
    let mut manager = GoalManager::new(graph, root, arbitrator).unwrap();

    // branch evaluates to mean(1, 5) = 3 > 2, then "high" wins inside it.
    assert_eq!(manager.step(1.0, &StateMap::new()).unwrap(), 5.0);
}

#[test]
fn leaf_root_is_evaluated_without_arbitration() {
    let mut graph = GoalGraph::new();
    let root = graph
        .insert(Goal::new("solo", linear_ramp(10.0), |_: &dyn StateLookup| 2.0))
        .unwrap();

    // Nash would reject a lone candidate, so reaching it would fail.
    let arbitrator = Arbitrator::with_mode(ArbitrationMode::Nash);
    let mut manager = GoalManager::new(graph, root, arbitrator).unwrap();
    let value = manager.step(5.0, &StateMap::new()).unwrap();
    assert!((value - 1.0).abs() < 1e-12);
}

#[test]
fn nash_at_a_three_way_branch_is_an_error() {
    let mut graph = GoalGraph::new();
    let ids: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|n| graph.insert(fixed(n, 1.0)).unwrap())
        .collect();
    let root = graph.insert(fixed("root", 0.0).with_dependencies(ids)).unwrap();

    let arbitrator = Arbitrator::with_mode(ArbitrationMode::Nash);
    let mut manager = GoalManager::new(graph, root, arbitrator).unwrap();
    assert_eq!(
        manager.step(1.0, &StateMap::new()).unwrap_err(),
        ArbitrationError::NashArity(3)
    );
}

#[test]
fn cyclic_tree_terminates() {
    let mut graph = GoalGraph::new();
    let leaf = graph.insert(fixed("leaf", 1.0)).unwrap();
    let a = graph.insert(fixed("a", 4.0)).unwrap();
    let b = graph.insert(fixed("b", 0.0).with_dependencies([a, leaf])).unwrap();
    graph.add_dependency(a, b).unwrap();

    let arbitrator = Arbitrator::with_mode(ArbitrationMode::Max);
    let mut manager = GoalManager::new(graph, a, arbitrator).unwrap();

    let mut sink = VecSink::default();
    let value = manager.step_traced(1.0, &StateMap::new(), &mut sink).unwrap();

    // a -> b (only child) -> a again (b's best child) is cut off.
    assert!(value.is_finite());
    assert_eq!(value, 0.0);
    assert!(sink.count(DiagnosticKind::CycleBroken) >= 1);
}

#[test]
fn clock_accumulates_and_resets() {
    let calls = Rc::new(Cell::new(0.0));
    let seen = calls.clone();
    let mut graph = GoalGraph::new();
    let root = graph
        .insert(Goal::new(
            "clocked",
            move |t| {
                seen.set(t);
                1.0
            },
            |_: &dyn StateLookup| 1.0,
        ))
        .unwrap();

    let mut manager = GoalManager::new(graph, root, Arbitrator::default()).unwrap();
    manager.step(0.25, &StateMap::new()).unwrap();
    manager.step(0.5, &StateMap::new()).unwrap();
    assert_eq!(manager.time(), 0.75);
    assert_eq!(calls.get(), 0.75);

    manager.reset();
    assert_eq!(manager.time(), 0.0);
}

#[test]
fn inject_goal_defaults_to_root() {
    let (graph, root) = live_well();
    let arbitrator = Arbitrator::with_mode(ArbitrationMode::Max);
    let mut manager = GoalManager::new(graph, root, arbitrator).unwrap();

    let rest = manager.inject_goal(fixed("Rest", 9.0), None).unwrap();
    assert_eq!(manager.graph().dependencies(root).last(), Some(&rest));

    let nap = manager.inject_goal(fixed("Nap", 20.0), Some(rest)).unwrap();
    assert_eq!(manager.graph().dependencies(rest), &[nap]);

    // Rest is now a branch worth 9 + 20; Nap is its only leaf.
    assert_eq!(manager.step(1.0, &StateMap::new()).unwrap(), 20.0);
}

#[test]
fn inject_goal_rejects_duplicate_names() {
    let (graph, root) = live_well();
    let mut manager = GoalManager::new(graph, root, Arbitrator::default()).unwrap();
    assert_eq!(
        manager.inject_goal(fixed("Eat", 1.0), None).unwrap_err(),
        GraphError::DuplicateName("Eat".to_string())
    );
}

fn habituating(name: &str, utility: f64) -> Goal {
    fixed(name, utility).with_trait(Habituation::new(0.5))
}

#[test]
fn single_leaf_returns_the_value_it_was_chosen_on() {
    let mut graph = GoalGraph::new();
    let a = graph.insert(habituating("a", 8.0)).unwrap();
    let b = graph.insert(fixed("b", 1.0)).unwrap();
    let root = graph.insert(fixed("root", 0.0).with_dependencies([a, b])).unwrap();

    let arbitrator = Arbitrator::with_mode(ArbitrationMode::Max);
    let mut manager = GoalManager::new(graph, root, arbitrator).unwrap();
    let state = StateMap::new();

    // One exposure per step: 8, then 8 * 0.5, then 8 * 0.25.
    assert_eq!(manager.step(1.0, &state).unwrap(), 8.0);
    assert_eq!(manager.step(1.0, &state).unwrap(), 4.0);
    assert_eq!(manager.step(1.0, &state).unwrap(), 2.0);
}

#[test]
fn blended_leaves_reuse_their_arbitrated_values() {
    let mut graph = GoalGraph::new();
    let a = graph.insert(habituating("a", 8.0)).unwrap();
    let b = graph.insert(fixed("b", 1.0)).unwrap();
    let c = graph.insert(fixed("c", 2.0)).unwrap();
    let root = graph
        .insert(fixed("root", 0.0).with_dependencies([a, b, c]))
        .unwrap();

    let arbitrator = Arbitrator::with_mode(ArbitrationMode::Softmax);
    let mut manager = GoalManager::new(graph, root, arbitrator).unwrap();

    let p = softmax(&[8.0, 1.0, 2.0], 1.0);
    let expected = p[0] * 8.0 + p[1] * 1.0 + p[2] * 2.0;
    let value = manager.step(1.0, &StateMap::new()).unwrap();
    assert!((value - expected).abs() < 1e-12, "got {value}, expected {expected}");
}

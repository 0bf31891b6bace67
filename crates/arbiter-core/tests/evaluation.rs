use std::cell::Cell;
use std::rc::Rc;

use arbiter_core::curve::{constant, linear_ramp};
use arbiter_core::{
    DiagnosticKind, Goal, GoalGraph, GoalTrait, GraphError, ModifyContext, StateLookup, StateMap,
    TermError, TraitStack, VecSink,
};

const EPS: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn state() -> StateMap {
    StateMap::new().with("novelty", 0.8).with("danger", 0.3)
}

fn explore() -> Goal {
    Goal::new("Explore", linear_ramp(10.0), |s: &dyn StateLookup| {
        s.scalar_or("novelty", 0.0) * 2.0
    })
}

fn survive() -> Goal {
    Goal::new("Survive", linear_ramp(10.0), |s: &dyn StateLookup| {
        1.0 - s.scalar_or("danger", 0.0)
    })
}

#[test]
fn leaf_value_is_urgency_times_utility() {
    let mut graph = GoalGraph::new();
    let id = graph.insert(explore()).unwrap();

    let value = graph.effective_value(id, 5.0, &state());
    assert!(approx(value, 0.5 * 1.6), "got {value}");
}

#[test]
fn dependencies_contribute_their_mean() {
    let mut graph = GoalGraph::new();
    let g1 = graph.insert(explore()).unwrap();
    let g2 = graph.insert(survive()).unwrap();
    let master = graph
        .insert(
            Goal::new("Master", linear_ramp(10.0), |_: &dyn StateLookup| 0.5)
                .with_dependencies([g1, g2]),
        )
        .unwrap();

    let s = state();
    let v1 = graph.effective_value(g1, 5.0, &s);
    let v2 = graph.effective_value(g2, 5.0, &s);
    let master_value = graph.effective_value(master, 5.0, &s);

    assert!(approx(master_value, 0.5 * 0.5 + (v1 + v2) / 2.0));
    assert!(approx(master_value, 0.825));
}

#[test]
fn two_way_cycle_terminates_with_finite_value() {
    let mut graph = GoalGraph::new();
    let g1 = graph.insert(explore()).unwrap();
    let g2 = graph.insert(survive().with_dependencies([g1])).unwrap();
    graph.add_dependency(g1, g2).unwrap();

    let mut sink = VecSink::default();
    let value = graph.effective_value_traced(g1, 5.0, &state(), &mut sink);

    // Explore (0.8) + Survive (0.35 + cycle-broken Explore as 0.0).
    assert!(value.is_finite());
    assert!(value >= 0.0);
    assert!(approx(value, 0.8 + 0.35));
    assert_eq!(sink.count(DiagnosticKind::CycleBroken), 1);
    assert_eq!(sink.diagnostics[0].goal, "Explore");
}

#[test]
fn self_dependency_counts_as_zero_in_the_mean() {
    let mut graph = GoalGraph::new();
    let a = graph.insert(Goal::new("A", constant(1.0), |_: &dyn StateLookup| 2.0)).unwrap();
    graph.add_dependency(a, a).unwrap();

    assert!(approx(graph.effective_value(a, 0.0, &StateMap::new()), 2.0));
}

#[test]
fn shared_dependency_is_counted_along_each_path() {
    let mut graph = GoalGraph::new();
    let shared = graph
        .insert(Goal::new("Shared", constant(1.0), |_: &dyn StateLookup| 4.0))
        .unwrap();
    let left = graph
        .insert(
            Goal::new("Left", constant(0.0), |_: &dyn StateLookup| 0.0)
                .with_dependencies([shared]),
        )
        .unwrap();
    let right = graph
        .insert(
            Goal::new("Right", constant(0.0), |_: &dyn StateLookup| 0.0)
                .with_dependencies([shared]),
        )
        .unwrap();
    let root = graph
        .insert(
            Goal::new("Root", constant(0.0), |_: &dyn StateLookup| 0.0)
                .with_dependencies([left, right]),
        )
        .unwrap();

    let mut sink = VecSink::default();
    let value = graph.effective_value_traced(root, 0.0, &StateMap::new(), &mut sink);
    assert!(approx(value, 4.0));
    assert!(sink.diagnostics.is_empty());
}

#[test]
fn failing_utility_contributes_zero_and_reports() {
    let mut graph = GoalGraph::new();
    let broken = graph
        .insert(Goal::fallible(
            "Broken",
            |_t| Ok(1.0),
            |_s: &dyn StateLookup| Err(TermError::failed("sensor offline")),
        ))
        .unwrap();
    let healthy = graph
        .insert(Goal::new("Healthy", constant(1.0), |_: &dyn StateLookup| 3.0))
        .unwrap();
    let root = graph
        .insert(
            Goal::new("Root", constant(1.0), |_: &dyn StateLookup| 1.0)
                .with_dependencies([broken, healthy]),
        )
        .unwrap();

    let mut sink = VecSink::default();
    let value = graph.effective_value_traced(root, 0.0, &StateMap::new(), &mut sink);

    assert!(approx(value, 1.0 + (0.0 + 3.0) / 2.0));
    assert_eq!(sink.count(DiagnosticKind::UtilityFault), 1);
    assert_eq!(sink.diagnostics[0].detail.as_deref(), Some("sensor offline"));
}

#[test]
fn non_finite_urgency_is_treated_as_fault() {
    let mut graph = GoalGraph::new();
    let id = graph.insert(Goal::new("Nan", |_t| f64::NAN, |_: &dyn StateLookup| 5.0)).unwrap();

    let mut sink = VecSink::default();
    let value = graph.effective_value_traced(id, 0.0, &StateMap::new(), &mut sink);

    assert_eq!(value, 0.0);
    assert_eq!(sink.count(DiagnosticKind::UrgencyFault), 1);
}

#[test]
fn evaluation_is_idempotent() {
    let mut graph = GoalGraph::new();
    let g1 = graph.insert(explore()).unwrap();
    let g2 = graph.insert(survive().with_dependencies([g1])).unwrap();
    graph.add_dependency(g1, g2).unwrap();

    let s = state();
    let first = graph.effective_value(g2, 7.0, &s);
    let second = graph.effective_value(g2, 7.0, &s);
    assert_eq!(first, second);
}

#[test]
fn weight_scales_only_the_base_term() {
    let mut graph = GoalGraph::new();
    let dep = graph.insert(Goal::new("Dep", constant(1.0), |_: &dyn StateLookup| 2.0)).unwrap();
    let id = graph
        .insert(
            Goal::new("Weighted", constant(0.5), |_: &dyn StateLookup| 4.0)
                .with_weight(3.0)
                .with_dependencies([dep]),
        )
        .unwrap();

    assert!(approx(graph.effective_value(id, 0.0, &StateMap::new()), 0.5 * 4.0 * 3.0 + 2.0));
}

struct AddUrgency(f64);

impl GoalTrait for AddUrgency {
    fn adjust_urgency(&self, urgency: f64, _t: f64, _goal: &Goal) -> f64 {
        urgency + self.0
    }
}

struct ScaleUrgency(f64);

impl GoalTrait for ScaleUrgency {
    fn adjust_urgency(&self, urgency: f64, _t: f64, _goal: &Goal) -> f64 {
        urgency * self.0
    }
}

struct Delta(f64);

impl GoalTrait for Delta {
    fn modify(&self, _ctx: &ModifyContext<'_>) -> f64 {
        self.0
    }
}

#[test]
fn traits_apply_in_attachment_order() {
    let mut graph = GoalGraph::new();
    let add_then_scale = graph
        .insert(
            Goal::new("AddThenScale", constant(1.0), |_: &dyn StateLookup| 1.0)
                .with_trait(AddUrgency(1.0))
                .with_trait(ScaleUrgency(2.0)),
        )
        .unwrap();
    let scale_then_add = graph
        .insert(
            Goal::new("ScaleThenAdd", constant(1.0), |_: &dyn StateLookup| 1.0)
                .with_trait(ScaleUrgency(2.0))
                .with_trait(AddUrgency(1.0)),
        )
        .unwrap();

    let s = StateMap::new();
    assert!(approx(graph.effective_value(add_then_scale, 0.0, &s), 4.0));
    assert!(approx(graph.effective_value(scale_then_add, 0.0, &s), 3.0));
}

#[test]
fn modification_deltas_are_summed() {
    let mut graph = GoalGraph::new();
    let id = graph
        .insert(
            Goal::new("Modified", constant(1.0), |_: &dyn StateLookup| 2.0)
                .with_trait(Delta(0.5))
                .with_trait(Delta(-0.25)),
        )
        .unwrap();

    assert!(approx(graph.effective_value(id, 0.0, &StateMap::new()), 2.25));
}

struct Recorder {
    seen: Rc<Cell<(f64, f64, f64, f64)>>,
}

impl GoalTrait for Recorder {
    fn modify(&self, ctx: &ModifyContext<'_>) -> f64 {
        self.seen.set((ctx.base, ctx.urgency, ctx.utility, ctx.dep_value));
        0.0
    }
}

#[test]
fn modify_sees_adjusted_terms_and_dependency_mean() {
    let seen = Rc::new(Cell::new((0.0, 0.0, 0.0, 0.0)));
    let mut graph = GoalGraph::new();
    let a = graph.insert(Goal::new("A", constant(1.0), |_: &dyn StateLookup| 2.0)).unwrap();
    let b = graph.insert(Goal::new("B", constant(1.0), |_: &dyn StateLookup| 4.0)).unwrap();
    let id = graph
        .insert(
            Goal::new("Recorded", constant(0.5), |_: &dyn StateLookup| 3.0)
                .with_trait(ScaleUrgency(2.0))
                .with_trait(Recorder { seen: seen.clone() })
                .with_dependencies([a, b]),
        )
        .unwrap();

    graph.effective_value(id, 0.0, &StateMap::new());
    assert_eq!(seen.get(), (3.0, 1.0, 3.0, 3.0));
}

#[test]
fn nested_stacks_fold_like_flat_traits() {
    let inner = TraitStack::default().with(AddUrgency(1.0)).with(Delta(0.5));
    let outer = TraitStack::default().with(inner).with(ScaleUrgency(2.0)).with(Delta(1.0));

    let mut graph = GoalGraph::new();
    let stacked = graph
        .insert(Goal::new("Stacked", constant(1.0), |_: &dyn StateLookup| 1.0).with_trait(outer))
        .unwrap();

    // urgency: (1 + 1) * 2 = 4; modify: 0.5 + 1.0.
    assert!(approx(graph.effective_value(stacked, 0.0, &StateMap::new()), 5.5));
}

#[test]
fn duplicate_names_are_rejected() {
    let mut graph = GoalGraph::new();
    graph.insert(explore()).unwrap();
    let err = graph.insert(explore()).unwrap_err();
    assert_eq!(err, GraphError::DuplicateName("Explore".to_string()));
}

#[test]
fn dependency_on_foreign_id_is_rejected() {
    let mut other = GoalGraph::new();
    other.insert(explore()).unwrap();
    let foreign = other.insert(survive()).unwrap();

    let mut graph = GoalGraph::new();
    let err = graph.insert(explore().with_dependencies([foreign])).unwrap_err();
    assert_eq!(err, GraphError::UnknownGoal(foreign));
}

#[test]
fn unknown_id_evaluates_to_zero_with_diagnostic() {
    let mut other = GoalGraph::new();
    other.insert(explore()).unwrap();
    let foreign = other.insert(survive()).unwrap();

    let mut graph = GoalGraph::new();
    graph.insert(explore()).unwrap();

    let mut sink = VecSink::default();
    assert_eq!(graph.effective_value_traced(foreign, 0.0, &state(), &mut sink), 0.0);
    assert_eq!(sink.count(DiagnosticKind::UnknownGoal), 1);
}

#[test]
fn describe_reports_terms_and_dependency_names() {
    let mut graph = GoalGraph::new();
    let g1 = graph.insert(explore()).unwrap();
    let g2 = graph.insert(survive()).unwrap();
    let master = graph
        .insert(
            Goal::new("Master", linear_ramp(10.0), |_: &dyn StateLookup| 0.5)
                .with_dependencies([g1, g2]),
        )
        .unwrap();

    let report = graph.describe(master, 5.0, &state()).unwrap();
    assert_eq!(report.name, "Master");
    assert!(approx(report.urgency, 0.5));
    assert!(approx(report.utility, 0.5));
    assert!(approx(report.effective_value, 0.825));
    assert_eq!(report.dependencies, vec!["Explore".to_string(), "Survive".to_string()]);

    let text = report.to_string();
    assert!(text.starts_with("Goal: Master"));
    assert!(text.contains("Effective Value: 0.82") || text.contains("Effective Value: 0.83"));
    assert!(text.contains("Dependencies: [Explore, Survive]"));
}

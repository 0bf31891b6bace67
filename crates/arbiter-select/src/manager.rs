use std::collections::HashSet;

use arbiter_core::{
    Diagnostic, DiagnosticKind, DiagnosticSink, Goal, GoalGraph, GoalId, GraphError, NullSink,
    StateLookup,
};

use crate::{ArbitrationError, Arbitrator, Candidate, Selection};

/// Walks a goal tree top-down, arbitrating at every branching node.
///
/// At a node with dependencies the arbitrator picks among the direct children by effective
/// value. A single pick descends into that subtree only; a distribution descends into every child
/// and blends the results by probability. Leaves return their own effective value.
#[derive(Debug)]
pub struct GoalManager {
    graph: GoalGraph,
    root: GoalId,
    arbitrator: Arbitrator,
    t: f64,
}

impl GoalManager {
    pub fn new(graph: GoalGraph, root: GoalId, arbitrator: Arbitrator) -> Result<Self, GraphError> {
        graph.goal(root)?;
        Ok(Self {
            graph,
            root,
            arbitrator,
            t: 0.0,
        })
    }

    pub fn graph(&self) -> &GoalGraph {
        &self.graph
    }

    pub fn root(&self) -> GoalId {
        self.root
    }

    pub fn arbitrator(&self) -> &Arbitrator {
        &self.arbitrator
    }

    pub fn arbitrator_mut(&mut self) -> &mut Arbitrator {
        &mut self.arbitrator
    }

    /// Internal clock.
    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn reset(&mut self) {
        self.t = 0.0;
    }

    /// Inserts `goal` and attaches it under `parent`, or under the root when `None`.
    pub fn inject_goal(
        &mut self,
        goal: Goal,
        parent: Option<GoalId>,
    ) -> Result<GoalId, GraphError> {
        let parent = parent.unwrap_or(self.root);
        self.graph.goal(parent)?;
        let id = self.graph.insert(goal)?;
        self.graph.add_dependency(parent, id)?;
        Ok(id)
    }

    /// Advances the clock by `dt` and evaluates the tree at the new time.
    pub fn step(&mut self, dt: f64, state: &dyn StateLookup) -> Result<f64, ArbitrationError> {
        self.step_traced(dt, state, &mut NullSink)
    }

    pub fn step_traced(
        &mut self,
        dt: f64,
        state: &dyn StateLookup,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<f64, ArbitrationError> {
        self.t += dt;
        self.evaluate_traced(state, sink)
    }

    /// Evaluates the tree at the current time without advancing the clock.
    pub fn evaluate_traced(
        &mut self,
        state: &dyn StateLookup,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<f64, ArbitrationError> {
        let mut path = HashSet::new();
        descend(
            &self.graph,
            &mut self.arbitrator,
            self.root,
            None,
            self.t,
            state,
            sink,
            &mut path,
        )
    }
}

/// `known` is the value the parent arbitrated on; a leaf returns it instead of evaluating again.
#[allow(clippy::too_many_arguments)]
fn descend<'g>(
    graph: &'g GoalGraph,
    arbitrator: &mut Arbitrator,
    id: GoalId,
    known: Option<f64>,
    t: f64,
    state: &dyn StateLookup,
    sink: &mut dyn DiagnosticSink,
    path: &mut HashSet<&'g str>,
) -> Result<f64, ArbitrationError> {
    let goal = match graph.get(id) {
        Some(goal) if !goal.is_leaf() => goal,
        _ => {
            return Ok(known.unwrap_or_else(|| graph.effective_value_traced(id, t, state, sink)));
        }
    };
    if !path.insert(goal.name()) {
        tracing::warn!(goal = %goal.name(), "goal tree cycle, node already on descent path");
        sink.emit(Diagnostic::new(DiagnosticKind::CycleBroken, goal.name()));
        return Ok(0.0);
    }

    let children = Candidate::collect(graph, goal.dependencies(), t, state, sink);
    let value = match arbitrator.select(&children)? {
        Selection::None => 0.0,
        Selection::Single(child) => {
            tracing::debug!(goal = %goal.name(), child = ?graph.name(child), "descending");
            let known = children.iter().find(|c| c.id == child).map(|c| c.value);
            descend(graph, arbitrator, child, known, t, state, sink, path)?
        }
        Selection::Distribution(weights) => {
            let mut blended = 0.0;
            for (candidate, (child, weight)) in children.iter().zip(weights) {
                let known = Some(candidate.value);
                blended += weight * descend(graph, arbitrator, child, known, t, state, sink, path)?;
            }
            blended
        }
    };

    path.remove(goal.name());
    Ok(value)
}

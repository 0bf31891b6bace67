use std::collections::{BTreeMap, HashSet};

use crate::{
    Diagnostic, DiagnosticKind, DiagnosticSink, Goal, GoalId, GoalReport, GraphError,
    ModifyContext, NullSink, StateLookup,
};

/// Arena of goals addressed by [`GoalId`].
///
/// Goal names are unique within a graph; they key the cycle guard during evaluation and the
/// history of stateful arbitration modes.
#[derive(Debug, Default)]
pub struct GoalGraph {
    goals: Vec<Goal>,
    by_name: BTreeMap<String, GoalId>,
}

impl GoalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, goal: Goal) -> Result<GoalId, GraphError> {
        if self.by_name.contains_key(goal.name()) {
            return Err(GraphError::DuplicateName(goal.name().to_string()));
        }
        if let Some(missing) = goal.dependencies().iter().find(|d| d.0 >= self.goals.len()) {
            return Err(GraphError::UnknownGoal(*missing));
        }

        let id = GoalId(self.goals.len());
        self.by_name.insert(goal.name().to_string(), id);
        self.goals.push(goal);
        Ok(id)
    }

    /// Appends `child` to `parent`'s dependencies. Cycles are allowed.
    pub fn add_dependency(&mut self, parent: GoalId, child: GoalId) -> Result<(), GraphError> {
        self.goal(child)?;
        let parent = self
            .goals
            .get_mut(parent.0)
            .ok_or(GraphError::UnknownGoal(parent))?;
        parent.dependencies.push(child);
        Ok(())
    }

    pub fn get(&self, id: GoalId) -> Option<&Goal> {
        self.goals.get(id.0)
    }

    pub fn goal(&self, id: GoalId) -> Result<&Goal, GraphError> {
        self.get(id).ok_or(GraphError::UnknownGoal(id))
    }

    pub fn find(&self, name: &str) -> Option<GoalId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: GoalId) -> Option<&str> {
        self.get(id).map(Goal::name)
    }

    pub fn dependencies(&self, id: GoalId) -> &[GoalId] {
        self.get(id).map(Goal::dependencies).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// All ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = GoalId> + '_ {
        (0..self.goals.len()).map(GoalId)
    }

    /// Urgency after every attached trait's urgency hook.
    pub fn urgency(&self, id: GoalId, t: f64, sink: &mut dyn DiagnosticSink) -> f64 {
        match self.get(id) {
            Some(goal) => adjusted_urgency(goal, t, sink),
            None => unknown_goal(id, sink),
        }
    }

    /// Utility after every attached trait's utility hook.
    pub fn utility(
        &self,
        id: GoalId,
        state: &dyn StateLookup,
        sink: &mut dyn DiagnosticSink,
    ) -> f64 {
        match self.get(id) {
            Some(goal) => adjusted_utility(goal, state, sink),
            None => unknown_goal(id, sink),
        }
    }

    pub fn effective_value(&self, id: GoalId, t: f64, state: &dyn StateLookup) -> f64 {
        self.effective_value_traced(id, t, state, &mut NullSink)
    }

    /// Like [`effective_value`](Self::effective_value), reporting anomalies to `sink`.
    pub fn effective_value_traced(
        &self,
        id: GoalId,
        t: f64,
        state: &dyn StateLookup,
        sink: &mut dyn DiagnosticSink,
    ) -> f64 {
        let mut path = HashSet::new();
        self.evaluate_on_path(id, t, state, sink, &mut path)
    }

    /// Recursive evaluation with an explicit recursion-path guard.
    ///
    /// `path` holds the names of goals currently being evaluated. A goal found on it contributes
    /// `0.0` and emits [`DiagnosticKind::CycleBroken`]. Names are removed again on return, so the
    /// guard does not memoize across siblings.
    pub fn evaluate_on_path<'g>(
        &'g self,
        id: GoalId,
        t: f64,
        state: &dyn StateLookup,
        sink: &mut dyn DiagnosticSink,
        path: &mut HashSet<&'g str>,
    ) -> f64 {
        let Some(goal) = self.get(id) else {
            return unknown_goal(id, sink);
        };
        self.evaluate_goal(goal, t, state, sink, path)
            .map_or(0.0, |terms| terms.value)
    }

    /// Evaluates `goal` once. `None` when it is already on `path`.
    fn evaluate_goal<'g>(
        &'g self,
        goal: &'g Goal,
        t: f64,
        state: &dyn StateLookup,
        sink: &mut dyn DiagnosticSink,
        path: &mut HashSet<&'g str>,
    ) -> Option<Terms> {
        if !path.insert(goal.name()) {
            tracing::warn!(
                goal = %goal.name(),
                "dependency cycle, goal already on evaluation path"
            );
            sink.emit(Diagnostic::new(DiagnosticKind::CycleBroken, goal.name()));
            return None;
        }

        let urgency = adjusted_urgency(goal, t, sink);
        let utility = adjusted_utility(goal, state, sink);
        let base = urgency * utility * goal.weight();

        let deps = goal.dependencies();
        let dep_value = if deps.is_empty() {
            0.0
        } else {
            let total: f64 = deps
                .iter()
                .map(|&dep| self.evaluate_on_path(dep, t, state, sink, path))
                .sum();
            total / deps.len() as f64
        };

        let ctx = ModifyContext {
            base,
            urgency,
            utility,
            dep_value,
            goal,
            t,
            state,
        };
        let modification: f64 = goal.traits().iter().map(|tr| tr.modify(&ctx)).sum();

        path.remove(goal.name());

        let value = base + dep_value + modification;
        tracing::trace!(
            goal = %goal.name(),
            urgency,
            utility,
            dep_value,
            modification,
            value,
            "evaluated goal"
        );
        Some(Terms {
            urgency,
            utility,
            value,
        })
    }

    /// Snapshot of a goal's evaluated terms.
    pub fn describe(
        &self,
        id: GoalId,
        t: f64,
        state: &dyn StateLookup,
    ) -> Result<GoalReport, GraphError> {
        let goal = self.goal(id)?;
        let mut path = HashSet::new();
        let terms = self
            .evaluate_goal(goal, t, state, &mut NullSink, &mut path)
            .unwrap_or_default();
        Ok(GoalReport {
            name: goal.name().to_string(),
            urgency: terms.urgency,
            utility: terms.utility,
            weight: goal.weight(),
            effective_value: terms.value,
            dependencies: goal
                .dependencies()
                .iter()
                .filter_map(|&d| self.name(d).map(str::to_string))
                .collect(),
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Terms {
    urgency: f64,
    utility: f64,
    value: f64,
}

fn adjusted_urgency(goal: &Goal, t: f64, sink: &mut dyn DiagnosticSink) -> f64 {
    let raw = goal.raw_urgency(t).unwrap_or_else(|err| {
        tracing::warn!(goal = %goal.name(), error = %err, "urgency function failed");
        sink.emit(
            Diagnostic::new(DiagnosticKind::UrgencyFault, goal.name()).with_detail(err.to_string()),
        );
        0.0
    });
    goal.traits()
        .iter()
        .fold(raw, |u, tr| tr.adjust_urgency(u, t, goal))
}

fn adjusted_utility(goal: &Goal, state: &dyn StateLookup, sink: &mut dyn DiagnosticSink) -> f64 {
    let raw = goal.raw_utility(state).unwrap_or_else(|err| {
        tracing::warn!(goal = %goal.name(), error = %err, "utility function failed");
        sink.emit(
            Diagnostic::new(DiagnosticKind::UtilityFault, goal.name()).with_detail(err.to_string()),
        );
        0.0
    });
    goal.traits()
        .iter()
        .fold(raw, |u, tr| tr.adjust_utility(u, state, goal))
}

fn unknown_goal(id: GoalId, sink: &mut dyn DiagnosticSink) -> f64 {
    tracing::warn!(%id, "goal id does not resolve in this graph");
    sink.emit(Diagnostic::new(DiagnosticKind::UnknownGoal, id.to_string()));
    0.0
}

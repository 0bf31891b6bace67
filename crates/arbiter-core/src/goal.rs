use core::fmt;

use crate::{GoalTrait, StateLookup, TermError};

pub type UrgencyFn = Box<dyn Fn(f64) -> Result<f64, TermError>>;
pub type UtilityFn = Box<dyn Fn(&dyn StateLookup) -> Result<f64, TermError>>;

/// Handle to a goal stored in a [`GoalGraph`](crate::GoalGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GoalId(pub(crate) usize);

impl GoalId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A decision candidate: time-varying urgency, state-varying utility, dependencies, traits.
///
/// Traits are applied in attachment order and are fixed once the goal is built. Dependencies are
/// ids into the graph the goal is inserted into; more can be added later through
/// [`GoalGraph::add_dependency`](crate::GoalGraph::add_dependency), which is how cycles arise.
pub struct Goal {
    name: String,
    urgency_fn: UrgencyFn,
    utility_fn: UtilityFn,
    weight: f64,
    traits: Vec<Box<dyn GoalTrait>>,
    pub(crate) dependencies: Vec<GoalId>,
}

impl Goal {
    pub fn new(
        name: impl Into<String>,
        urgency: impl Fn(f64) -> f64 + 'static,
        utility: impl Fn(&dyn StateLookup) -> f64 + 'static,
    ) -> Self {
        Self::fallible(name, move |t| Ok(urgency(t)), move |s| Ok(utility(s)))
    }

    /// Builds a goal whose urgency or utility may fail.
    ///
    /// A failure (or a non-finite result) makes that term `0.0` for the evaluation in which it
    /// occurred and emits a diagnostic.
    pub fn fallible(
        name: impl Into<String>,
        urgency: impl Fn(f64) -> Result<f64, TermError> + 'static,
        utility: impl Fn(&dyn StateLookup) -> Result<f64, TermError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            urgency_fn: Box::new(urgency),
            utility_fn: Box::new(utility),
            weight: 1.0,
            traits: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_trait(mut self, goal_trait: impl GoalTrait + 'static) -> Self {
        self.traits.push(Box::new(goal_trait));
        self
    }

    pub fn with_traits(mut self, traits: impl IntoIterator<Item = Box<dyn GoalTrait>>) -> Self {
        self.traits.extend(traits);
        self
    }

    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = GoalId>) -> Self {
        self.dependencies.extend(deps);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn traits(&self) -> &[Box<dyn GoalTrait>] {
        &self.traits
    }

    pub fn dependencies(&self) -> &[GoalId] {
        &self.dependencies
    }

    pub fn is_leaf(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Urgency before any trait adjustment.
    pub fn raw_urgency(&self, t: f64) -> Result<f64, TermError> {
        finite((self.urgency_fn)(t)?)
    }

    /// Utility before any trait adjustment.
    pub fn raw_utility(&self, state: &dyn StateLookup) -> Result<f64, TermError> {
        finite((self.utility_fn)(state)?)
    }
}

fn finite(value: f64) -> Result<f64, TermError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TermError::NonFinite(value))
    }
}

impl fmt::Debug for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Goal")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field(
                "traits",
                &self.traits.iter().map(|t| t.label()).collect::<Vec<_>>(),
            )
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

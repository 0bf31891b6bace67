use crate::{Goal, StateLookup};

/// Everything a trait may look at when modifying a goal's final value.
#[derive(Clone, Copy)]
pub struct ModifyContext<'a> {
    /// `urgency * utility * weight`, after urgency/utility hooks ran.
    pub base: f64,
    pub urgency: f64,
    pub utility: f64,
    /// Mean effective value of the goal's direct dependencies (`0.0` for a leaf).
    pub dep_value: f64,
    pub goal: &'a Goal,
    pub t: f64,
    pub state: &'a dyn StateLookup,
}

/// A behavioral modifier attached to a goal.
///
/// All three hooks default to "no change". Urgency and utility hooks are folded in attachment
/// order, so composition is generally not commutative. `modify` returns an additive delta; the
/// deltas of all attached traits are summed on top of `base + dep_value`.
///
/// Hooks take `&self`. A trait that needs memory owns it behind interior mutability and keys it by
/// goal name.
pub trait GoalTrait {
    /// Short name for logs and debug output: the type name without path or generic arguments.
    fn label(&self) -> &str {
        let full = std::any::type_name::<Self>();
        let bare = full.split('<').next().unwrap_or(full);
        bare.rsplit("::").next().unwrap_or(bare)
    }

    fn adjust_urgency(&self, urgency: f64, _t: f64, _goal: &Goal) -> f64 {
        urgency
    }

    fn adjust_utility(&self, utility: f64, _state: &dyn StateLookup, _goal: &Goal) -> f64 {
        utility
    }

    fn modify(&self, _ctx: &ModifyContext<'_>) -> f64 {
        0.0
    }
}

/// Ordered group of traits acting as one.
///
/// Urgency/utility hooks fold through the members in order; `modify` sums the members' deltas.
/// Stacks nest freely.
#[derive(Default)]
pub struct TraitStack {
    traits: Vec<Box<dyn GoalTrait>>,
}

impl TraitStack {
    pub fn new(traits: Vec<Box<dyn GoalTrait>>) -> Self {
        Self { traits }
    }

    pub fn with(mut self, goal_trait: impl GoalTrait + 'static) -> Self {
        self.traits.push(Box::new(goal_trait));
        self
    }

    pub fn push(&mut self, goal_trait: Box<dyn GoalTrait>) {
        self.traits.push(goal_trait);
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

impl GoalTrait for TraitStack {
    fn label(&self) -> &str {
        "TraitStack"
    }

    fn adjust_urgency(&self, urgency: f64, t: f64, goal: &Goal) -> f64 {
        self.traits
            .iter()
            .fold(urgency, |u, tr| tr.adjust_urgency(u, t, goal))
    }

    fn adjust_utility(&self, utility: f64, state: &dyn StateLookup, goal: &Goal) -> f64 {
        self.traits
            .iter()
            .fold(utility, |u, tr| tr.adjust_utility(u, state, goal))
    }

    fn modify(&self, ctx: &ModifyContext<'_>) -> f64 {
        self.traits.iter().map(|tr| tr.modify(ctx)).sum()
    }
}

use std::cell::RefCell;
use std::collections::BTreeMap;

use arbiter_core::{Goal, GoalTrait, StateLookup};

/// Diminishing returns on repeated evaluation: utility is scaled by `rate^n`, where `n` counts
/// earlier evaluations of the same goal through this instance.
///
/// Counters are keyed by goal name and live in the trait instance. [`reset`](Self::reset) forgets
/// every exposure. Not thread-safe.
#[derive(Debug)]
pub struct Habituation {
    rate: f64,
    seen: RefCell<BTreeMap<String, u32>>,
}

impl Habituation {
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            seen: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn exposures(&self, goal: &str) -> u32 {
        self.seen.borrow().get(goal).copied().unwrap_or(0)
    }

    pub fn reset(&self) {
        self.seen.borrow_mut().clear();
    }
}

impl GoalTrait for Habituation {
    fn label(&self) -> &str {
        "Habituation"
    }

    fn adjust_utility(&self, utility: f64, _state: &dyn StateLookup, goal: &Goal) -> f64 {
        let mut seen = self.seen.borrow_mut();
        let count = seen.entry(goal.name().to_string()).or_insert(0);
        let scaled = utility * self.rate.powf(f64::from(*count));
        *count = count.saturating_add(1);
        scaled
    }
}

use arbiter_core::{Goal, GoalTrait};

/// Exponential urgency decay: `urgency · factor^t`.
#[derive(Debug, Clone, Copy)]
pub struct TimeDecay {
    pub factor: f64,
}

impl Default for TimeDecay {
    fn default() -> Self {
        Self { factor: 0.95 }
    }
}

impl GoalTrait for TimeDecay {
    fn label(&self) -> &str {
        "TimeDecay"
    }

    fn adjust_urgency(&self, urgency: f64, t: f64, _goal: &Goal) -> f64 {
        urgency * self.factor.powf(t)
    }
}

/// Caps urgency at `ceiling`.
#[derive(Debug, Clone, Copy)]
pub struct UrgencyClamper {
    pub ceiling: f64,
}

impl Default for UrgencyClamper {
    fn default() -> Self {
        Self { ceiling: 1.0 }
    }
}

impl GoalTrait for UrgencyClamper {
    fn label(&self) -> &str {
        "UrgencyClamper"
    }

    fn adjust_urgency(&self, urgency: f64, _t: f64, _goal: &Goal) -> f64 {
        urgency.min(self.ceiling)
    }
}

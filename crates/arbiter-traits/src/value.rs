//! Traits acting on the final value through `modify`.

use arbiter_core::{GoalTrait, ModifyContext};

/// Favors high-utility goals regardless of time pressure: `0.2·utility² − 0.05·urgency`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl GoalTrait for Greedy {
    fn label(&self) -> &str {
        "Greedy"
    }

    fn modify(&self, ctx: &ModifyContext<'_>) -> f64 {
        0.2 * ctx.utility * ctx.utility - 0.05 * ctx.urgency
    }
}

/// Adds a fraction of the dependency aggregate.
#[derive(Debug, Clone, Copy)]
pub struct DependencyAmplifier {
    pub gain: f64,
}

impl Default for DependencyAmplifier {
    fn default() -> Self {
        Self { gain: 0.1 }
    }
}

impl GoalTrait for DependencyAmplifier {
    fn label(&self) -> &str {
        "DependencyAmplifier"
    }

    fn modify(&self, ctx: &ModifyContext<'_>) -> f64 {
        self.gain * ctx.dep_value
    }
}

/// Adds `boost` while `state[key] >= threshold`. A missing key reads as `0.0`.
#[derive(Debug, Clone)]
pub struct StateBoost {
    pub key: String,
    pub threshold: f64,
    pub boost: f64,
}

impl StateBoost {
    pub fn new(key: impl Into<String>, threshold: f64, boost: f64) -> Self {
        Self {
            key: key.into(),
            threshold,
            boost,
        }
    }
}

impl GoalTrait for StateBoost {
    fn label(&self) -> &str {
        "StateBoost"
    }

    fn modify(&self, ctx: &ModifyContext<'_>) -> f64 {
        if ctx.state.scalar_or(&self.key, 0.0) >= self.threshold {
            self.boost
        } else {
            0.0
        }
    }
}

/// Penalizes volatile goals using a per-goal table in the state (`volatility[goal]` by default).
#[derive(Debug, Clone)]
pub struct EntropicStabilizer {
    pub key: String,
    pub weight: f64,
}

impl Default for EntropicStabilizer {
    fn default() -> Self {
        Self {
            key: "volatility".to_string(),
            weight: 0.1,
        }
    }
}

impl GoalTrait for EntropicStabilizer {
    fn label(&self) -> &str {
        "EntropicStabilizer"
    }

    fn modify(&self, ctx: &ModifyContext<'_>) -> f64 {
        let volatility = ctx.state.entry(&self.key, ctx.goal.name()).unwrap_or(0.0);
        -self.weight * volatility
    }
}

/// Rewards goals the agent has succeeded at before (`success_history[goal]` by default).
#[derive(Debug, Clone)]
pub struct RecursiveReward {
    pub key: String,
    pub weight: f64,
}

impl Default for RecursiveReward {
    fn default() -> Self {
        Self {
            key: "success_history".to_string(),
            weight: 0.05,
        }
    }
}

impl GoalTrait for RecursiveReward {
    fn label(&self) -> &str {
        "RecursiveReward"
    }

    fn modify(&self, ctx: &ModifyContext<'_>) -> f64 {
        let successes = ctx.state.entry(&self.key, ctx.goal.name()).unwrap_or(0.0);
        self.weight * successes
    }
}

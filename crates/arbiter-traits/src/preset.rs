use arbiter_core::{GoalTrait, TraitStack};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    DependencyAmplifier, EntropicStabilizer, Greedy, Habituation, RecursiveReward, StateBoost,
    TimeDecay, UrgencyClamper,
};

/// Data description of a trait, for goals built from configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TraitPreset {
    Greedy,
    DependencyAmplifier {
        #[cfg_attr(feature = "serde", serde(default = "default_gain"))]
        gain: f64,
    },
    TimeDecay {
        #[cfg_attr(feature = "serde", serde(default = "default_decay"))]
        factor: f64,
    },
    StateBoost {
        key: String,
        threshold: f64,
        boost: f64,
    },
    EntropicStabilizer {
        #[cfg_attr(feature = "serde", serde(default = "default_volatility_key"))]
        key: String,
        #[cfg_attr(feature = "serde", serde(default = "default_stabilizer_weight"))]
        weight: f64,
    },
    UrgencyClamper {
        #[cfg_attr(feature = "serde", serde(default = "default_ceiling"))]
        ceiling: f64,
    },
    RecursiveReward {
        #[cfg_attr(feature = "serde", serde(default = "default_success_key"))]
        key: String,
        #[cfg_attr(feature = "serde", serde(default = "default_reward_weight"))]
        weight: f64,
    },
    Habituation {
        rate: f64,
    },
    Stack {
        traits: Vec<TraitPreset>,
    },
}

impl TraitPreset {
    /// Instantiates the trait. Stateful traits start with empty memory on every call.
    pub fn build(&self) -> Box<dyn GoalTrait> {
        match self {
            TraitPreset::Greedy => Box::new(Greedy),
            TraitPreset::DependencyAmplifier { gain } => {
                Box::new(DependencyAmplifier { gain: *gain })
            }
            TraitPreset::TimeDecay { factor } => Box::new(TimeDecay { factor: *factor }),
            TraitPreset::StateBoost {
                key,
                threshold,
                boost,
            } => Box::new(StateBoost::new(key.clone(), *threshold, *boost)),
            TraitPreset::EntropicStabilizer { key, weight } => Box::new(EntropicStabilizer {
                key: key.clone(),
                weight: *weight,
            }),
            TraitPreset::UrgencyClamper { ceiling } => {
                Box::new(UrgencyClamper { ceiling: *ceiling })
            }
            TraitPreset::RecursiveReward { key, weight } => Box::new(RecursiveReward {
                key: key.clone(),
                weight: *weight,
            }),
            TraitPreset::Habituation { rate } => Box::new(Habituation::new(*rate)),
            TraitPreset::Stack { traits } => {
                Box::new(TraitStack::new(traits.iter().map(TraitPreset::build).collect()))
            }
        }
    }
}

#[cfg(feature = "serde")]
fn default_gain() -> f64 {
    DependencyAmplifier::default().gain
}
#[cfg(feature = "serde")]
fn default_decay() -> f64 {
    TimeDecay::default().factor
}
#[cfg(feature = "serde")]
fn default_volatility_key() -> String {
    EntropicStabilizer::default().key
}
#[cfg(feature = "serde")]
fn default_stabilizer_weight() -> f64 {
    EntropicStabilizer::default().weight
}
#[cfg(feature = "serde")]
fn default_ceiling() -> f64 {
    UrgencyClamper::default().ceiling
}
#[cfg(feature = "serde")]
fn default_success_key() -> String {
    RecursiveReward::default().key
}
#[cfg(feature = "serde")]
fn default_reward_weight() -> f64 {
    RecursiveReward::default().weight
}

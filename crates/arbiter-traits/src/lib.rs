//! Ready-made goal traits.
//!
//! Each type implements `arbiter_core::GoalTrait` and can be attached to a goal directly or
//! grouped in a `TraitStack`. [`TraitPreset`] describes them as data for config-driven setups.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod habituation;
pub mod preset;
pub mod temporal;
pub mod value;

pub use habituation::Habituation;
pub use preset::TraitPreset;
pub use temporal::{TimeDecay, UrgencyClamper};
pub use value::{DependencyAmplifier, EntropicStabilizer, Greedy, RecursiveReward, StateBoost};

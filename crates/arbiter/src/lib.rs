//! Umbrella crate that re-exports the `arbiter-*` building blocks.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use arbiter_core as core;

#[cfg(feature = "traits")]
#[cfg_attr(docsrs, doc(cfg(feature = "traits")))]
pub use arbiter_traits as traits;

#[cfg(feature = "select")]
#[cfg_attr(docsrs, doc(cfg(feature = "select")))]
pub use arbiter_select as select;

/// The types most drivers need.
#[cfg(feature = "full")]
#[cfg_attr(docsrs, doc(cfg(feature = "full")))]
pub mod prelude {
    pub use arbiter_core::{
        Goal, GoalGraph, GoalId, GoalTrait, StateLookup, StateMap, TraitStack,
    };
    pub use arbiter_select::{
        ArbitrationError, ArbitrationMode, Arbitrator, ArbitratorConfig, Candidate, GoalManager,
        Selection,
    };
    pub use arbiter_traits::TraitPreset;
}

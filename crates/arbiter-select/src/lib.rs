//! Goal arbitration.
//!
//! An [`Arbitrator`] turns evaluated goals into a decision under one of four modes. Max, softmax
//! and Nash are pure functions of their input; Lyapunov keeps per-goal history on the arbitrator
//! instance. Ties are broken by candidate order so decisions are reproducible.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod arbitrator;
pub mod config;
pub mod error;
pub mod lyapunov;
pub mod manager;
pub mod nash;
pub mod softmax;

pub use arbitrator::{Arbitrator, Candidate, Selection};
pub use config::{ArbitrationMode, ArbitratorConfig};
pub use error::ArbitrationError;
pub use lyapunov::{stability_score, LyapunovSample};
pub use manager::GoalManager;
pub use nash::{EngagementGame, Equilibrium};
pub use softmax::softmax;

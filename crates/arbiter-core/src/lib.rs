//! Goal graph evaluation primitives.
//!
//! Goals live in a [`GoalGraph`] arena and reference their dependencies by [`GoalId`], so a
//! dependency may be shared by several parents and cycles are structurally allowed. Evaluation is
//! synchronous and never fails: malformed goals degrade to a zero contribution and report a
//! [`Diagnostic`] instead.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod curve;
pub mod diagnostic;
pub mod error;
pub mod goal;
pub mod goal_trait;
pub mod graph;
pub mod report;
pub mod state;

pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, NullSink, VecSink};
pub use error::{GraphError, TermError};
pub use goal::{Goal, GoalId};
pub use goal_trait::{GoalTrait, ModifyContext, TraitStack};
pub use graph::GoalGraph;
pub use report::GoalReport;
pub use state::{StateLookup, StateMap, StateValue};

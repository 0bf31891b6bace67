//! Driver support for the `arbiter` binary: scenario files and the tick scheduler.

pub mod scenario;
pub mod scheduler;

pub use scenario::{GoalConfig, Scenario, UrgencyCurve, UtilityCurve};
pub use scheduler::{Scheduler, Tick};

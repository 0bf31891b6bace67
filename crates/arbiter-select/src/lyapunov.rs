//! Stability-preference scoring.
//!
//! Despite the name, the score rewards goals whose value is currently rising; it does not
//! penalize instability the way a control-theory Lyapunov function would.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Last value seen for a goal name, tagged with the arbitration call that recorded it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LyapunovSample {
    pub value: f64,
    pub sequence: u64,
}

/// `current + weight * max(0, (current - previous) / dt)`.
pub fn stability_score(current: f64, previous: f64, dt: f64, weight: f64) -> f64 {
    let rate = (current - previous) / dt;
    current + weight * rate.max(0.0)
}

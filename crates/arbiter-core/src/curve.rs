//! Urgency curves.
//!
//! The evaluator never clamps; these helpers implement the conventional `[0, 1]` urgency policy
//! for goals that want it.

/// Clamps to `[0, 1]`. NaN maps to `0.0`.
pub fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

pub fn constant(value: f64) -> impl Fn(f64) -> f64 + Clone {
    move |_t| value
}

/// Rises linearly from 0 at `t = 0` to 1 at `t = horizon`, clamped.
pub fn linear_ramp(horizon: f64) -> impl Fn(f64) -> f64 + Clone {
    move |t| clamp_unit(t / horizon)
}

/// Logistic curve centered on `midpoint`; already within `(0, 1)`.
pub fn logistic(midpoint: f64, steepness: f64) -> impl Fn(f64) -> f64 + Clone {
    move |t| 1.0 / (1.0 + (-steepness * (t - midpoint)).exp())
}

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ArbitrationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ArbitrationMode {
    /// Highest effective value; first wins ties.
    Max,
    /// Temperature-scaled softmax distribution.
    #[default]
    Softmax,
    /// Two-goal engagement game solved by iterative best response.
    Nash,
    /// Current value plus a bonus for rising value since the previous call.
    Lyapunov,
}

impl ArbitrationMode {
    pub const ALL: [ArbitrationMode; 4] = [
        ArbitrationMode::Max,
        ArbitrationMode::Softmax,
        ArbitrationMode::Nash,
        ArbitrationMode::Lyapunov,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArbitrationMode::Max => "max",
            ArbitrationMode::Softmax => "softmax",
            ArbitrationMode::Nash => "nash",
            ArbitrationMode::Lyapunov => "lyapunov",
        }
    }
}

impl fmt::Display for ArbitrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArbitrationMode {
    type Err = ArbitrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| ArbitrationError::UnknownMode(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArbitratorConfig {
    pub mode: ArbitrationMode,

    /// Softmax temperature. Must be finite and `> 0`.
    pub temperature: f64,

    /// Best-response rounds before the Nash solver gives up on convergence.
    pub nash_max_iterations: u32,

    /// Both engagement probabilities must move less than this for early termination.
    pub nash_tolerance: f64,

    /// Fixed time step used for the Lyapunov derivative estimate.
    pub lyapunov_dt: f64,

    /// Weight on the positive part of the derivative in the Lyapunov score.
    pub lyapunov_weight: f64,
}

impl Default for ArbitratorConfig {
    fn default() -> Self {
        Self {
            mode: ArbitrationMode::default(),
            temperature: 1.0,
            nash_max_iterations: 20,
            nash_tolerance: 1e-4,
            lyapunov_dt: 0.1,
            lyapunov_weight: 1.0,
        }
    }
}

impl ArbitratorConfig {
    pub fn new(mode: ArbitrationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_nash(mut self, max_iterations: u32, tolerance: f64) -> Self {
        self.nash_max_iterations = max_iterations;
        self.nash_tolerance = tolerance;
        self
    }

    pub fn with_lyapunov(mut self, dt: f64, weight: f64) -> Self {
        self.lyapunov_dt = dt;
        self.lyapunov_weight = weight;
        self
    }

    pub fn validate(&self) -> Result<(), ArbitrationError> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(invalid(format!(
                "temperature must be finite and > 0, got {}",
                self.temperature
            )));
        }
        if self.nash_max_iterations == 0 {
            return Err(invalid("nash_max_iterations must be at least 1".to_string()));
        }
        if !(self.nash_tolerance >= 0.0) {
            return Err(invalid(format!(
                "nash_tolerance must be >= 0, got {}",
                self.nash_tolerance
            )));
        }
        if !(self.lyapunov_dt.is_finite() && self.lyapunov_dt > 0.0) {
            return Err(invalid(format!(
                "lyapunov_dt must be finite and > 0, got {}",
                self.lyapunov_dt
            )));
        }
        if !self.lyapunov_weight.is_finite() {
            return Err(invalid(format!(
                "lyapunov_weight must be finite, got {}",
                self.lyapunov_weight
            )));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> ArbitrationError {
    ArbitrationError::InvalidConfig(reason)
}

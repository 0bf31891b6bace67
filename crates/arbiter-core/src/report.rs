use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Evaluated terms of one goal at one instant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GoalReport {
    pub name: String,
    pub urgency: f64,
    pub utility: f64,
    pub weight: f64,
    pub effective_value: f64,
    pub dependencies: Vec<String>,
}

impl fmt::Display for GoalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Goal: {}", self.name)?;
        writeln!(f, "  Urgency: {:.2}", self.urgency)?;
        writeln!(f, "  Utility: {:.2}", self.utility)?;
        writeln!(f, "  Weight: {:.2}", self.weight)?;
        writeln!(f, "  Effective Value: {:.2}", self.effective_value)?;
        write!(f, "  Dependencies: [{}]", self.dependencies.join(", "))
    }
}

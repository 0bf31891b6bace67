use arbiter_core::GraphError;
use thiserror::Error;

/// Contract violations reported by arbitration. Evaluation anomalies are never errors; see
/// `arbiter_core::Diagnostic`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArbitrationError {
    #[error("unknown arbitration mode: {0}")]
    UnknownMode(String),
    #[error("nash arbitration requires exactly two goals, got {0}")]
    NashArity(usize),
    #[error("invalid arbitrator config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

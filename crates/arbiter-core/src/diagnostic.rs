#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What went wrong while evaluating a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DiagnosticKind {
    /// The goal was already on the current recursion path and contributed `0.0`.
    CycleBroken,
    UrgencyFault,
    UtilityFault,
    /// A dependency id did not resolve in the graph being evaluated.
    UnknownGoal,
}

/// A recoverable evaluation anomaly.
///
/// This is plain data so it can be collected during evaluation and inspected later. It is never
/// an error: evaluation always completes with a finite value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub goal: String,
    pub detail: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, goal: impl Into<String>) -> Self {
        Self {
            kind,
            goal: goal.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

#[derive(Debug, Default)]
pub struct VecSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl VecSink {
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }
}

impl DiagnosticSink for VecSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

//! Diagnostics emitted while extracting and filling
//!
//! Per-field soft failures never escape as errors. They are reported to an
//! injected [`DiagnosticSink`] instead, so callers decide where they go:
//! [`TracingSink`] forwards to `tracing`, [`CollectingSink`] keeps them in
//! memory for inspection.

use serde::Serialize;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Debug,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    /// Native or descriptor name the diagnostic is about, if any
    pub field: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn debug(field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Debug,
            field: field.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn warn(field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warn,
            field: field.map(str::to_string),
            message: message.into(),
        }
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `tracing` subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let field = diagnostic.field.as_deref().unwrap_or("-");
        match diagnostic.level {
            DiagnosticLevel::Debug => tracing::debug!(field = %field, "{}", diagnostic.message),
            DiagnosticLevel::Warn => tracing::warn!(field = %field, "{}", diagnostic.message),
        }
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.diagnostics()
            .into_iter()
            .filter(|d| d.level == DiagnosticLevel::Warn)
            .collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match self.diagnostics.lock() {
            Ok(mut diagnostics) => diagnostics.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

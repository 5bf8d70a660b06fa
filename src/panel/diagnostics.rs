//! panel::diagnostics — structured, non-fatal warnings from panel runs.
//!
//! Purpose
//! -------
//! Report conditions that do not stop a panel run but change its result —
//! currently, entities left out of the aggregation because they fail the
//! minimum-sample condition — as values that callers can log, collect or
//! assert on.
//!
//! Key behaviors
//! -------------
//! - [`Diagnostic`] carries a [`DiagnosticKind`], the affected entities and
//!   a rendered message.
//! - [`DiagnosticSink`] is injected into the orchestrator. [`LogSink`]
//!   forwards to `log::warn!`; [`CollectingSink`] keeps everything it
//!   receives.
use std::sync::Mutex;

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Entities excluded by the minimum-sample condition.
    UnusedEntities,
}

/// Diagnostic — one non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub entities: Vec<String>,
    pub message: String,
}

impl Diagnostic {
    /// Diagnostic for entities excluded from the aggregation.
    pub fn unused_entities(entities: Vec<String>) -> Self {
        let message = format!(
            "Some entities do not fulfill the minimum requirements: {}. Results are provided \
             leaving these ones out of further computations.",
            entities.join(", ")
        );
        Diagnostic { kind: DiagnosticKind::UnusedEntities, entities, message }
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Forward diagnostics to the `log` facade at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        log::warn!("{}", diagnostic.message);
    }
}

/// Keep every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    items: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.items.lock().map(|items| items.clone()).unwrap_or_default()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        if let Ok(mut items) = self.items.lock() {
            items.push(diagnostic.clone());
        }
    }
}

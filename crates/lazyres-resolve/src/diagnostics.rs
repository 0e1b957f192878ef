//! Diagnostic reporting.
//!
//! Resolution reports user-facing problems into a [`DiagnosticSink`] and keeps
//! going. The sink is external to the engine; [`CollectingDiagnosticSink`] is
//! the in-memory implementation used by the driver and tests.

use lazyres_common::diagnostics::get_message_template;
use lazyres_common::{Anchor, Diagnostic};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Build and report a diagnostic in one call.
pub(crate) fn report(sink: &dyn DiagnosticSink, anchor: &Anchor, code: u32, args: &[&str]) {
    debug!(
        code,
        file = %anchor.file,
        start = anchor.span.start,
        template = get_message_template(code).unwrap_or(""),
        "reporting diagnostic"
    );
    sink.report(Diagnostic::at(anchor, code, args));
}

/// Stores every reported diagnostic in report order.
#[derive(Debug, Default)]
pub struct CollectingDiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of diagnostics reported with `code`.
    pub fn count_code(&self, code: u32) -> usize {
        self.lock().iter().filter(|d| d.code == code).count()
    }

    /// Diagnostics sorted by file and position, for stable output.
    pub fn sorted(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.snapshot();
        diagnostics.sort_by(|a, b| {
            (a.file.as_str(), a.start, a.code).cmp(&(b.file.as_str(), b.start, b.code))
        });
        diagnostics
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticSink for CollectingDiagnosticSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }
}

//! Thread-safe diagnostic accumulator.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::Mutex;

/// Callback invoked for every diagnostic at the moment it is emitted.
type Listener = Box<dyn Fn(&Diagnostic) + Send + Sync>;

/// A thread-safe accumulator for diagnostics.
///
/// Every emitted diagnostic is forwarded to `tracing` at the matching level,
/// handed to the listener if one is installed, and then stored until
/// [`take_all`](Self::take_all) drains it.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    listener: Option<Listener>,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            listener: None,
        }
    }

    /// Creates a sink that also passes each diagnostic to `listener` as it
    /// arrives, e.g. to print progress during a long placement run.
    pub fn with_listener(listener: impl Fn(&Diagnostic) + Send + Sync + 'static) -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            listener: Some(Box::new(listener)),
        }
    }

    /// Emits a diagnostic into the sink.
    pub fn emit(&self, diag: Diagnostic) {
        match diag.severity {
            Severity::Note => tracing::debug!(code = %diag.code, "{}", diag.message),
            Severity::Warning => tracing::warn!(code = %diag.code, "{}", diag.message),
        }
        if let Some(listener) = &self.listener {
            listener(&diag);
        }
        let mut diagnostics = self.diagnostics.lock().unwrap();
        diagnostics.push(diag);
    }

    /// Returns the number of warnings emitted and not yet taken.
    pub fn warning_count(&self) -> usize {
        let diagnostics = self.diagnostics.lock().unwrap();
        diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Takes all accumulated diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.diagnostics.lock().unwrap();
        std::mem::take(&mut *diagnostics)
    }

    /// Returns a snapshot of all accumulated diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let diagnostics = self.diagnostics.lock().unwrap();
        diagnostics.clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn make_warning() -> Diagnostic {
        Diagnostic::warning(DiagnosticCode::new(Category::Netlist, 2), "repeated net")
    }

    fn make_note() -> Diagnostic {
        Diagnostic::note(DiagnosticCode::new(Category::Placement, 5), "progress")
    }

    #[test]
    fn empty_sink() {
        let sink = DiagnosticSink::new();
        assert_eq!(sink.warning_count(), 0);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn counts_warnings_only() {
        let sink = DiagnosticSink::new();
        sink.emit(make_warning());
        sink.emit(make_note());
        sink.emit(make_warning());
        assert_eq!(sink.warning_count(), 2);
        assert_eq!(sink.diagnostics().len(), 3);
    }

    #[test]
    fn take_all_drains() {
        let sink = DiagnosticSink::new();
        sink.emit(make_warning());
        sink.emit(make_note());
        assert_eq!(sink.take_all().len(), 2);
        assert!(sink.take_all().is_empty());
        assert_eq!(sink.warning_count(), 0);
    }

    #[test]
    fn listener_sees_each_diagnostic_on_emit() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let sink = DiagnosticSink::with_listener(move |diag| {
            assert_eq!(diag.code.category, Category::Placement);
            counter.fetch_add(1, Ordering::Relaxed);
        });
        sink.emit(make_note());
        assert_eq!(seen.load(Ordering::Relaxed), 1);
        sink.emit(make_note());
        assert_eq!(seen.load(Ordering::Relaxed), 2);
        // Listened diagnostics are still stored.
        assert_eq!(sink.take_all().len(), 2);
    }

    #[test]
    fn shared_across_threads() {
        use std::thread;

        let sink = Arc::new(DiagnosticSink::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for _ in 0..50 {
                        sink.emit(make_note());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(sink.diagnostics().len(), 200);
        assert_eq!(sink.warning_count(), 0);
    }
}

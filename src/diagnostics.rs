//! Diagnostic emission: a small sink abstraction standing in for the
//! reference implementation's global `cpp_error_with_line` plumbing.

use std::fmt;

/// Severity of a diagnostic, mirroring the reference's `cpp_diagnostic_level`
/// distinctions that matter to constant-expression evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Severity {
    /// A warning that does not depend on `-pedantic`.
    Warning = 0,
    /// A warning only surfaced under `-pedantic` (or promoted to an error
    /// under `-pedantic-errors`, which this crate does not model).
    PedWarn = 1,
    /// A hard error: evaluation is aborted after this is emitted.
    Error = 2,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Warning => "warning",
            Severity::PedWarn => "pedwarn",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single diagnostic message, detached from any particular source
/// location since this crate has no notion of a file/line map of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the diagnostic is.
    pub severity: Severity,
    /// The human-readable message text.
    pub message: String,
}

/// Receives diagnostics emitted while lexing or evaluating an expression.
///
/// Implementations decide what to do with them: forward to `tracing`,
/// collect for a test assertion, or discard.
pub trait DiagnosticSink {
    /// Record one diagnostic.
    fn emit(&mut self, severity: Severity, message: String);
}

/// Forwards diagnostics to the `tracing` subscriber in scope, the way the
/// reference implementation forwards to the compiler driver's diagnostic
/// context.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Warning => tracing::warn!(%message, "preprocessor warning"),
            Severity::PedWarn => tracing::warn!(%message, "preprocessor pedwarn"),
            Severity::Error => tracing::error!(%message, "preprocessor error"),
        }
    }
}

/// Collects diagnostics in memory, for tests and for callers that want to
/// inspect everything emitted during one evaluation.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    /// Diagnostics collected so far, in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    /// True if any diagnostic at or above [`Severity::Error`] was collected.
    pub fn has_error(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&mut self, severity: Severity, message: String) {
        self.diagnostics.push(Diagnostic { severity, message });
    }
}

/// A sink that discards everything, for callers that don't care about
/// warnings and just want the boolean result.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _severity: Severity, _message: String) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_records_in_order() {
        let mut sink = CollectingSink::default();
        sink.emit(Severity::Warning, "first".into());
        sink.emit(Severity::Error, "second".into());
        assert_eq!(sink.diagnostics.len(), 2);
        assert_eq!(sink.diagnostics[0].message, "first");
        assert!(sink.has_error());
    }

    #[test]
    fn null_sink_discards() {
        let mut sink = NullSink;
        sink.emit(Severity::Error, "ignored".into());
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::PedWarn.to_string(), "pedwarn");
    }
}

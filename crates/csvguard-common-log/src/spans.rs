//! Span helpers for export runs.

use tracing::{info_span, Span};

/// Span covering one export, from header to close.
///
/// The `error` field is filled by [`record_error`] when the export fails.
pub fn export_span(destination: &str) -> Span {
    info_span!("export", dest = %destination, error = tracing::field::Empty)
}

/// Span covering one page of records.
pub fn page_span(page: u64, exported: u64) -> Span {
    info_span!("page", page, exported)
}

/// Record an error on the current span's `error` field.
pub fn record_error(error: &dyn std::error::Error) {
    Span::current().record("error", tracing::field::display(error));
}

/// Timing utility for operations.
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    /// Milliseconds since [`Timer::start`].
    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    /// Complete the timer and record duration.
    pub fn finish(self) {
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %self.elapsed_ms(),
            "operation completed"
        );
    }
}

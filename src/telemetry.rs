//! Telemetry utilities for request timing and tracing spans.

use crate::api::EntityKind;
use std::time::Instant;

/// Guard for timing an API request and recording its latency.
///
/// Records latency when dropped.
pub struct RequestTimer {
    kind: EntityKind,
    start: Instant,
}

impl RequestTimer {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            start: Instant::now(),
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_latency(self.kind.singular(), duration);
    }
}

/// Standardized span constructors for API observability.
pub mod spans {
    use crate::api::EntityKind;
    use tracing::{Span, info_span};

    /// Span for a collection request.
    pub fn list(kind: EntityKind) -> Span {
        info_span!("list", kind = %kind)
    }

    /// Span for a single-entity request.
    pub fn show(kind: EntityKind, identifier: &str) -> Span {
        info_span!("show", kind = %kind, identifier = %identifier)
    }
}

//! Prometheus metrics collection for slirc-webserv.
//!
//! Exposed on a separate HTTP listener (see [`crate::http::run_metrics_server`]).
//!
//! - `webserv_requests_total{kind,outcome}` - API requests by entity kind and result
//! - `webserv_request_duration_seconds{kind}` - Request latency histogram
//! - `webserv_vanished_members_total` - Channel members skipped mid-projection
//! - `webserv_entities{kind}` - Entity counts seen by the last list request

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// API requests by kind and outcome (ok, forbidden, not_found).
pub static REQUESTS: OnceLock<IntCounterVec> = OnceLock::new();

/// API request latency by kind.
pub static REQUEST_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Channel members that no longer resolved while a channel was projected.
pub static VANISHED_MEMBERS: OnceLock<IntCounter> = OnceLock::new();

/// Entity counts by kind, refreshed by list requests.
pub static ENTITIES: OnceLock<IntGaugeVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Until this runs, the record helpers are no-ops.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(REQUESTS, IntCounterVec::new(Opts::new("webserv_requests_total", "API requests by entity kind and outcome"), &["kind", "outcome"]));
    register!(REQUEST_LATENCY, HistogramVec::new(
        HistogramOpts::new("webserv_request_duration_seconds", "API request latency by entity kind")
            .buckets(vec![0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        &["kind"]));
    register!(VANISHED_MEMBERS, IntCounter::new("webserv_vanished_members_total", "Channel members skipped because they left during projection"));
    register!(ENTITIES, IntGaugeVec::new(Opts::new("webserv_entities", "Entities returned by the last list request"), &["kind"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

/// Record the outcome of one API request.
#[inline]
pub fn record_request(kind: &str, outcome: &str) {
    if let Some(c) = REQUESTS.get() {
        c.with_label_values(&[kind, outcome]).inc();
    }
}

/// Record API request latency.
#[inline]
pub fn record_latency(kind: &str, duration_secs: f64) {
    if let Some(h) = REQUEST_LATENCY.get() {
        h.with_label_values(&[kind]).observe(duration_secs);
    }
}

#[inline]
pub fn record_vanished_member() {
    if let Some(c) = VANISHED_MEMBERS.get() {
        c.inc();
    }
}

#[inline]
pub fn set_entity_count(kind: &str, count: usize) {
    if let Some(g) = ENTITIES.get() {
        g.with_label_values(&[kind]).set(count as i64);
    }
}

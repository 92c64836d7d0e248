//! Prometheus Metrics Module
//!
//! Application-wide metrics collection, exposed at `/metrics`.
//!
//! # Metrics Collected
//! - Active WebSocket connection gauge
//! - Realtime event delivery counters by kind and outcome

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Active WebSocket connections gauge
pub static WS_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new(
            "ws_connections_active",
            "Number of active WebSocket connections",
        )
        .namespace("eduadvise"),
    )
    .expect("Failed to create WS_CONNECTIONS_ACTIVE metric")
});

/// Delivered realtime events by kind
pub static EVENTS_DELIVERED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "events_delivered_total",
            "Realtime events enqueued on a live session",
        )
        .namespace("eduadvise"),
        &["kind"],
    )
    .expect("Failed to create EVENTS_DELIVERED_TOTAL metric")
});

/// Undeliverable direct events by kind (offline targets)
pub static EVENTS_UNDELIVERABLE_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "events_undeliverable_total",
            "Direct events whose target had no live session",
        )
        .namespace("eduadvise"),
        &["kind"],
    )
    .expect("Failed to create EVENTS_UNDELIVERABLE_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(WS_CONNECTIONS_ACTIVE.clone()))
        .expect("Failed to register WS_CONNECTIONS_ACTIVE");
    registry
        .register(Box::new(EVENTS_DELIVERED_TOTAL.clone()))
        .expect("Failed to register EVENTS_DELIVERED_TOTAL");
    registry
        .register(Box::new(EVENTS_UNDELIVERABLE_TOTAL.clone()))
        .expect("Failed to register EVENTS_UNDELIVERABLE_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Metrics should be valid UTF-8")
}

/// Helper to track the live connection count
pub fn set_active_connections(count: usize) {
    WS_CONNECTIONS_ACTIVE.set(count as i64);
}

/// Helper to record one direct delivery attempt
pub fn record_delivery(kind: &str, delivered: bool) {
    if delivered {
        EVENTS_DELIVERED_TOTAL.with_label_values(&[kind]).inc();
    } else {
        EVENTS_UNDELIVERABLE_TOTAL.with_label_values(&[kind]).inc();
    }
}

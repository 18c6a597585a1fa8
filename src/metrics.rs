//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Command Metrics
    pub static ref COMMANDS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("driftwood_commands_total", "Total number of sync commands executed"),
        &["kind", "outcome"]
    ).expect("metric can be created");

    // Fetch Metrics
    pub static ref ITEMS_DOWNLOADED_TOTAL: IntCounter = IntCounter::new(
        "driftwood_items_downloaded_total",
        "Total number of remote items successfully fetched"
    ).expect("metric can be created");
    pub static ref ITEM_FAILURES_TOTAL: IntCounter = IntCounter::new(
        "driftwood_item_failures_total",
        "Total number of isolated per-item fetch failures"
    ).expect("metric can be created");

    // Error Metrics
    pub static ref SYNC_ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("driftwood_sync_errors_total", "Total number of sync errors"),
        &["class"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(COMMANDS_TOTAL.clone()))
        .expect("COMMANDS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(ITEMS_DOWNLOADED_TOTAL.clone()))
        .expect("ITEMS_DOWNLOADED_TOTAL can be registered");
    REGISTRY
        .register(Box::new(ITEM_FAILURES_TOTAL.clone()))
        .expect("ITEM_FAILURES_TOTAL can be registered");
    REGISTRY
        .register(Box::new(SYNC_ERRORS_TOTAL.clone()))
        .expect("SYNC_ERRORS_TOTAL can be registered");

    tracing::info!("Metrics registry initialized");
}

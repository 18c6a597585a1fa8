//! Driftwood - a background synchronization client for federated microblogging
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Service Layer (engine)                    │
//! │  - Strategy resolution and dispatch                         │
//! │  - Follow-graph reconciliation                              │
//! │  - Timeline / search / fan-out strategies                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Collaborator Interfaces                    │
//! │  - Connection (capability-gated remote API)                 │
//! │  - Store (persistence abstraction)                          │
//! │  - ProgressSink (caller-facing progress events)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine fetches a user's social graph and posts from a remote
//! service, reconciles them against local state via the `Store`
//! abstraction, and reports results through per-command counters.
//! The host application implements `Connection` and `Store` and owns
//! scheduling; one command executes on one logical thread of control
//! with cooperative cancellation between items.
//!
//! # Modules
//!
//! - `service`: command execution engine (strategies, context, executor)
//! - `connection`: remote API interface and stubs
//! - `data`: models and the persistence abstraction
//! - `config`: configuration management
//! - `metrics`: Prometheus instruments
//! - `error`: error types

pub mod config;
pub mod connection;
pub mod data;
pub mod error;
pub mod metrics;
pub mod service;

pub use config::AppConfig;
pub use error::{ConnectionError, ConnectionErrorKind, StoreError, SyncError};
pub use service::{CommandExecutor, CommandOutcome, ExecutionResult};

/// Initialize tracing/logging from configuration
///
/// Installs a global subscriber with an env-filter; `format: json`
/// switches to structured output. Calling this twice is an error, so
/// hosts embedding several components should install their own
/// subscriber instead.
pub fn init_tracing(logging: &config::LoggingConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("driftwood={}", logging.level).into());

    if logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

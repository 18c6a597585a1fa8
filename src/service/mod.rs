//! Service layer
//!
//! The command execution engine: per-command context, the pure
//! strategy resolver, the strategy family, and the
//! [`CommandExecutor`] facade that wires them to a connection, a
//! store, and a progress sink.

mod context;
mod fan_out;
mod follow_graph;
mod other;
mod search;
mod strategy;
mod timeline;

pub use context::{CommandOutcome, ExecutionContext, ExecutionResult, ExecutorParent, NeverStopping};
pub use fan_out::{AllAccountsStrategy, AllOriginsStrategy};
pub use follow_graph::FollowGraphSyncStrategy;
pub use other::OtherStrategy;
pub use search::SearchStrategy;
pub use strategy::{resolve_strategy, strategy_for, CommandExecutorStrategy, StrategyKind};
pub use timeline::TimelineSyncStrategy;

use std::sync::Arc;

use crate::config::SyncConfig;
use crate::connection::Connection;
use crate::data::{Account, CommandData, Store};

/// Progress reporting interface exposed to the caller
///
/// Called at least once per sync with a summary, and once per
/// hydrated item when `is_detail` is true.
pub trait ProgressSink: Send + Sync {
    fn report_progress(&self, message: &str, is_detail: bool);
}

/// Progress sink that drops everything
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report_progress(&self, _message: &str, _is_detail: bool) {}
}

/// Command execution engine facade
///
/// Owns the collaborators one strategy invocation needs and drives
/// the resolve-dispatch-execute cycle. One executor serves many
/// commands; each command gets a fresh [`ExecutionContext`] and runs
/// on a single logical thread of control.
pub struct CommandExecutor {
    connection: Arc<dyn Connection>,
    store: Arc<dyn Store>,
    progress: Arc<dyn ProgressSink>,
    accounts: Vec<Account>,
    sync_config: SyncConfig,
}

impl CommandExecutor {
    /// Create a new executor over a connection and a store.
    pub fn new(connection: Arc<dyn Connection>, store: Arc<dyn Store>) -> Self {
        Self {
            connection,
            store,
            progress: Arc::new(NoopProgress),
            accounts: Vec::new(),
            sync_config: SyncConfig::default(),
        }
    }

    /// Attach a progress sink.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Set the accounts anonymous commands fan out over.
    pub fn with_accounts(mut self, accounts: Vec<Account>) -> Self {
        self.accounts = accounts;
        self
    }

    /// Apply sync tuning from configuration.
    pub fn with_sync_config(mut self, sync_config: SyncConfig) -> Self {
        self.sync_config = sync_config;
        self
    }

    /// Execute a command to completion with no supervisor attached.
    pub async fn execute(&self, command: CommandData) -> ExecutionResult {
        self.execute_with_parent(command, None).await
    }

    /// Execute a command under an optional cancellation oracle.
    ///
    /// Resolves the strategy once, runs it, records metrics, and
    /// returns the result accumulator for the caller to inspect.
    pub async fn execute_with_parent(
        &self,
        command: CommandData,
        parent: Option<Arc<dyn ExecutorParent>>,
    ) -> ExecutionResult {
        let kind = resolve_strategy(&command);
        let strategy = strategy_for(kind);

        let mut ctx = ExecutionContext::new(command);
        if let Some(parent) = parent {
            ctx = ctx.with_parent(parent);
        }

        tracing::debug!(
            command = %ctx.command,
            strategy = strategy.name(),
            "executing command"
        );

        strategy.execute(self, &mut ctx).await;

        let outcome = ctx.result.outcome();
        crate::metrics::COMMANDS_TOTAL
            .with_label_values(&[ctx.command.kind.as_str(), outcome.as_str()])
            .inc();

        match outcome {
            CommandOutcome::Success | CommandOutcome::SuccessWithPartialFailures => {
                tracing::info!(
                    command = %ctx.command,
                    downloaded = ctx.result.downloaded_count(),
                    item_failures = ctx.result.item_failures(),
                    "command completed"
                );
            }
            CommandOutcome::Stopped => {
                tracing::warn!(command = %ctx.command, "command stopped before completion");
            }
            CommandOutcome::StructuralFailure => {
                crate::metrics::SYNC_ERRORS_TOTAL
                    .with_label_values(&["structural"])
                    .inc();
                tracing::error!(
                    command = %ctx.command,
                    failure = ctx.result.structural_failure().unwrap_or_default(),
                    "command failed"
                );
            }
        }

        ctx.result
    }

    pub fn connection(&self) -> &dyn Connection {
        self.connection.as_ref()
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Emit a progress event, honoring the detail-progress setting.
    pub fn report_progress(&self, message: &str, is_detail: bool) {
        if is_detail && !self.sync_config.detail_progress {
            return;
        }
        self.progress.report_progress(message, is_detail);
    }

    pub fn count_hard_hydration_errors(&self) -> bool {
        self.sync_config.count_hard_hydration_errors
    }

    pub fn timeline_fetch_limit(&self) -> usize {
        self.sync_config.timeline_fetch_limit
    }

    pub fn search_fetch_limit(&self) -> usize {
        self.sync_config.search_fetch_limit
    }
}

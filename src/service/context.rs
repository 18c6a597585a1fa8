//! Command execution context
//!
//! Per-command state bundle: the command descriptor, the bound
//! account, the result accumulator, and the cooperative-cancellation
//! oracle. One context lives for exactly one command execution and is
//! owned exclusively by the executing strategy.

use std::sync::Arc;

use crate::data::{Account, CommandData};
use crate::error::SyncError;

/// Cooperative-cancellation oracle
///
/// A weak, non-owning back-reference to whatever supervises the
/// command (a queue, a session, a parent fan-out strategy).
/// Strategies query it between expensive sub-steps and terminate
/// early, without marking the command failed, when it returns true.
pub trait ExecutorParent: Send + Sync {
    fn is_stopping(&self) -> bool;
}

/// Parent that never requests a stop; used when no supervisor is attached.
pub struct NeverStopping;

impl ExecutorParent for NeverStopping {
    fn is_stopping(&self) -> bool {
        false
    }
}

/// Caller-visible outcome of one command execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// All attempted work succeeded
    Success,
    /// The command completed but some per-item fetches failed and were skipped
    SuccessWithPartialFailures,
    /// The command observed a stop request and exited early
    Stopped,
    /// A structural precondition failed; no consistent result was produced
    StructuralFailure,
}

impl CommandOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::SuccessWithPartialFailures => "partial",
            Self::Stopped => "stopped",
            Self::StructuralFailure => "failure",
        }
    }
}

/// Mutable result accumulator for one command execution
///
/// Counters are diagnostic tallies, not control flow: they grow
/// monotonically during a run and are read by the caller afterwards.
/// No concurrent writers exist; the executing strategy owns the
/// accumulator for the command's lifetime.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    downloaded_count: u64,
    parse_exceptions: u64,
    io_exceptions: u64,
    item_failures: u64,
    stopped: bool,
    structural_failure: Option<String>,
}

impl ExecutionResult {
    /// One successfully fetched remote item (user, post, or bulk list).
    pub fn increment_downloaded_count(&mut self) {
        self.downloaded_count += 1;
    }

    /// Malformed or unexpected data, or an unsupported-operation condition.
    pub fn increment_parse_exceptions(&mut self) {
        self.parse_exceptions += 1;
    }

    /// Transient network/protocol failure.
    pub fn increment_num_io_exceptions(&mut self) {
        self.io_exceptions += 1;
    }

    /// One isolated per-item failure that was logged and skipped.
    pub fn note_item_failure(&mut self) {
        self.item_failures += 1;
    }

    /// The command observed a stop request and exited early.
    pub fn mark_stopped(&mut self) {
        self.stopped = true;
    }

    /// A structural precondition failed; the command produced no result.
    pub fn mark_structural_failure(&mut self, message: impl Into<String>) {
        let message = message.into();
        // First structural failure wins; later ones add no information.
        if self.structural_failure.is_none() {
            self.structural_failure = Some(message);
        }
    }

    pub fn downloaded_count(&self) -> u64 {
        self.downloaded_count
    }

    pub fn parse_exceptions(&self) -> u64 {
        self.parse_exceptions
    }

    pub fn io_exceptions(&self) -> u64 {
        self.io_exceptions
    }

    pub fn item_failures(&self) -> u64 {
        self.item_failures
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn structural_failure(&self) -> Option<&str> {
        self.structural_failure.as_deref()
    }

    /// Fold a child command's result into this one (fan-out commands).
    pub fn accumulate(&mut self, child: &ExecutionResult) {
        self.downloaded_count += child.downloaded_count;
        self.parse_exceptions += child.parse_exceptions;
        self.io_exceptions += child.io_exceptions;
        self.item_failures += child.item_failures;
        self.stopped |= child.stopped;
        if let Some(failure) = &child.structural_failure {
            self.mark_structural_failure(failure.clone());
        }
    }

    /// Derive the caller-visible outcome.
    pub fn outcome(&self) -> CommandOutcome {
        if self.structural_failure.is_some() {
            CommandOutcome::StructuralFailure
        } else if self.stopped {
            CommandOutcome::Stopped
        } else if self.item_failures > 0 {
            CommandOutcome::SuccessWithPartialFailures
        } else {
            CommandOutcome::Success
        }
    }
}

/// Per-command execution context
pub struct ExecutionContext {
    pub command: CommandData,
    pub account: Option<Account>,
    pub result: ExecutionResult,
    parent: Option<Arc<dyn ExecutorParent>>,
}

impl ExecutionContext {
    pub fn new(command: CommandData) -> Self {
        let account = command.account.clone();
        Self {
            command,
            account,
            result: ExecutionResult::default(),
            parent: None,
        }
    }

    /// Attach a cancellation oracle. Absence means "never stopping".
    pub fn with_parent(mut self, parent: Arc<dyn ExecutorParent>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn parent(&self) -> Option<Arc<dyn ExecutorParent>> {
        self.parent.clone()
    }

    /// Whether the supervisor has requested a stop.
    pub fn is_stopping(&self) -> bool {
        self.parent.as_ref().is_some_and(|p| p.is_stopping())
    }

    /// Classify and count a structural error, and log it.
    ///
    /// Hard errors bump the parse-exception counter, soft ones the
    /// io-exception counter.
    pub fn log_sync_error(&mut self, error: &SyncError, detail: &str) {
        if error.is_hard() {
            self.result.increment_parse_exceptions();
        } else {
            self.result.increment_num_io_exceptions();
        }
        tracing::error!(command = %self.command, error = %error, "{}", detail);
    }

    /// Check the stop flag at a yield point.
    ///
    /// Logs a soft warning and marks the result stopped when a stop
    /// was requested. Returns true if the caller should return
    /// immediately, leaving already-committed work intact.
    pub fn log_soft_error_if_stopping(&mut self) -> bool {
        if self.is_stopping() {
            tracing::warn!(command = %self.command, "stopping before completion");
            self.result.mark_stopped();
            true
        } else {
            false
        }
    }
}

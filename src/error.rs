//! Error types for Driftwood
//!
//! Remote-API failures are classified as hard (structural, will not
//! succeed on retry) or soft (transient). The command executor uses
//! this classification to decide which diagnostic counter to bump.

use thiserror::Error;

/// Classification of a remote-API failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// Credentials rejected or missing
    Unauthorized,
    /// Remote object does not exist (suspended/deleted account, gone post)
    NotFound,
    /// Remote rate limit hit
    RateLimited,
    /// The remote service does not expose the requested routine
    UnsupportedApi,
    /// Response received but could not be interpreted
    MalformedResponse,
    /// Transport-level failure (DNS, TLS, timeout, reset)
    Network,
    /// Remote returned a server-side error
    RemoteServer,
}

impl ConnectionErrorKind {
    /// Hard errors will not succeed on retry; soft errors might.
    pub fn is_hard(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::NotFound | Self::UnsupportedApi | Self::MalformedResponse
        )
    }
}

/// Classified failure from the remote social-network connection
#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {message}")]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub message: String,
}

impl ConnectionError {
    pub fn new(kind: ConnectionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Unsupported-operation error naming the routine(s) that were probed
    pub fn unsupported(routines: impl Into<String>) -> Self {
        Self::new(ConnectionErrorKind::UnsupportedApi, routines)
    }

    pub fn is_hard(&self) -> bool {
        self.kind.is_hard()
    }
}

/// Failure from the persistence abstraction
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced entity is not known locally
    #[error("entity not found: {0}")]
    NotFound(String),

    /// Backend-specific failure
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Application-wide error type
///
/// This enum represents all possible errors that can occur in the
/// sync engine. Strategies classify these into the per-command
/// diagnostic counters via [`SyncError::is_hard`].
#[derive(Debug, Error)]
pub enum SyncError {
    /// Remote connection failure, classified hard or soft
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Persistence failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Command is missing a required input (target, query, account)
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::Config(err.to_string())
    }
}

impl SyncError {
    /// Whether this failure is structural (a retry with the same
    /// inputs would fail again) as opposed to transient.
    pub fn is_hard(&self) -> bool {
        match self {
            SyncError::Connection(e) => e.is_hard(),
            SyncError::Store(StoreError::NotFound(_)) => true,
            SyncError::Store(StoreError::Backend(_)) => false,
            SyncError::InvalidCommand(_) => true,
            SyncError::Config(_) => true,
            SyncError::Internal(_) => true,
        }
    }
}

/// Result type alias using SyncError
pub type Result<T> = std::result::Result<T, SyncError>;

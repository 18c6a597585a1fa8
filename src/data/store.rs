//! Persistence abstraction
//!
//! The engine never talks to a database directly; it goes through
//! [`Store`], which translates between remote and local identifiers,
//! answers follow-graph queries, and persists fetched entities. The
//! host application provides the implementation.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::data::models::{FollowDirection, IdKind, LocalId, Post, RemoteId, RemoteUser};
use crate::error::StoreError;

/// Persistence interface consumed by the sync engine
///
/// Implementations must be safe for concurrent use across
/// independently running commands; within one command all calls are
/// issued sequentially by a single logical thread of control.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Translate a local id to the remote id it was ingested under.
    ///
    /// Returns `Ok(None)` when the entity is unknown locally.
    async fn resolve_remote_id(
        &self,
        kind: IdKind,
        id: LocalId,
    ) -> Result<Option<RemoteId>, StoreError>;

    /// Local ids currently holding a `followed=true` edge around the
    /// center user, on the given side of the graph.
    async fn current_follow_set(
        &self,
        center: LocalId,
        direction: FollowDirection,
    ) -> Result<HashSet<LocalId>, StoreError>;

    /// Insert or update a user record, returning its local id.
    ///
    /// Profile fields are merged; the local id is stable across upserts
    /// of the same remote id.
    async fn upsert_user(&self, user: &RemoteUser) -> Result<LocalId, StoreError>;

    /// Set or clear one follow edge.
    ///
    /// The edge identity (follower, followed) is never changed; only
    /// the flag is toggled.
    async fn set_follow_edge(
        &self,
        follower: LocalId,
        followed: LocalId,
        followed_flag: bool,
    ) -> Result<(), StoreError>;

    /// Persist a batch of fetched posts in one write scope.
    async fn batch_persist_posts(&self, posts: &[Post]) -> Result<(), StoreError>;
}

//! Remote connection layer
//!
//! [`Connection`] is the capability-gated RPC interface to one remote
//! social-network service. Implementations own the wire protocol,
//! credentials, and timeouts; the engine only probes capabilities and
//! issues typed fetches. Every call may fail with a classified
//! [`ConnectionError`](crate::error::ConnectionError).

mod empty;

pub use empty::EmptyConnection;

use async_trait::async_trait;

use crate::data::{Post, RemoteId, RemoteUser};
use crate::error::ConnectionError;

/// Optional remote routines the engine may probe before use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiRoutine {
    /// Rich follower list (full user objects)
    GetFollowers,
    /// Cheap follower list (ids only)
    GetFollowersIds,
    /// Rich friends list (full user objects)
    GetFriends,
    /// Cheap friends list (ids only)
    GetFriendsIds,
    /// Single user profile
    GetUser,
    /// Single user's latest post
    GetLatestPost,
    /// A user's timeline
    GetUserTimeline,
    /// Full-text post search
    SearchPosts,
}

impl ApiRoutine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetFollowers => "GetFollowers",
            Self::GetFollowersIds => "GetFollowersIds",
            Self::GetFriends => "GetFriends",
            Self::GetFriendsIds => "GetFriendsIds",
            Self::GetUser => "GetUser",
            Self::GetLatestPost => "GetLatestPost",
            Self::GetUserTimeline => "GetUserTimeline",
            Self::SearchPosts => "SearchPosts",
        }
    }
}

impl std::fmt::Display for ApiRoutine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability-gated RPC client for one remote service
///
/// Not every federated service exposes every routine, so callers
/// check [`Connection::is_api_supported`] and pick a fallback before
/// committing to a fetch strategy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Connection: Send + Sync {
    /// Whether the remote service supports the given routine.
    fn is_api_supported(&self, routine: ApiRoutine) -> bool;

    /// Full user objects for everyone following `user_oid`.
    async fn get_users_following(
        &self,
        user_oid: &RemoteId,
    ) -> Result<Vec<RemoteUser>, ConnectionError>;

    /// Bare ids of everyone following `user_oid`.
    async fn get_ids_of_users_following(
        &self,
        user_oid: &RemoteId,
    ) -> Result<Vec<RemoteId>, ConnectionError>;

    /// Full user objects for everyone `user_oid` follows.
    async fn get_users_followed_by(
        &self,
        user_oid: &RemoteId,
    ) -> Result<Vec<RemoteUser>, ConnectionError>;

    /// Bare ids of everyone `user_oid` follows.
    async fn get_ids_of_users_followed_by(
        &self,
        user_oid: &RemoteId,
    ) -> Result<Vec<RemoteId>, ConnectionError>;

    /// One user profile.
    async fn get_user(&self, user_oid: &RemoteId) -> Result<RemoteUser, ConnectionError>;

    /// The single most recent post by `user_oid`.
    async fn get_latest_post_for(&self, user_oid: &RemoteId) -> Result<Post, ConnectionError>;

    /// Up to `limit` recent posts from `user_oid`'s timeline.
    async fn get_user_timeline(
        &self,
        user_oid: &RemoteId,
        limit: usize,
    ) -> Result<Vec<Post>, ConnectionError>;

    /// Up to `limit` posts matching `query`.
    async fn search_posts(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Post>, ConnectionError>;
}

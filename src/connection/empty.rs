//! Empty connection stub
//!
//! Stands in where no real connection is configured, e.g. for a
//! disabled account. Supports no routine and fails every call.

use async_trait::async_trait;

use crate::connection::{ApiRoutine, Connection};
use crate::data::{Post, RemoteId, RemoteUser};
use crate::error::ConnectionError;

/// A connection that supports nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyConnection;

impl EmptyConnection {
    fn unsupported(routine: ApiRoutine) -> ConnectionError {
        ConnectionError::unsupported(routine.as_str())
    }
}

#[async_trait]
impl Connection for EmptyConnection {
    fn is_api_supported(&self, _routine: ApiRoutine) -> bool {
        false
    }

    async fn get_users_following(
        &self,
        _user_oid: &RemoteId,
    ) -> Result<Vec<RemoteUser>, ConnectionError> {
        Err(Self::unsupported(ApiRoutine::GetFollowers))
    }

    async fn get_ids_of_users_following(
        &self,
        _user_oid: &RemoteId,
    ) -> Result<Vec<RemoteId>, ConnectionError> {
        Err(Self::unsupported(ApiRoutine::GetFollowersIds))
    }

    async fn get_users_followed_by(
        &self,
        _user_oid: &RemoteId,
    ) -> Result<Vec<RemoteUser>, ConnectionError> {
        Err(Self::unsupported(ApiRoutine::GetFriends))
    }

    async fn get_ids_of_users_followed_by(
        &self,
        _user_oid: &RemoteId,
    ) -> Result<Vec<RemoteId>, ConnectionError> {
        Err(Self::unsupported(ApiRoutine::GetFriendsIds))
    }

    async fn get_user(&self, _user_oid: &RemoteId) -> Result<RemoteUser, ConnectionError> {
        Err(Self::unsupported(ApiRoutine::GetUser))
    }

    async fn get_latest_post_for(&self, _user_oid: &RemoteId) -> Result<Post, ConnectionError> {
        Err(Self::unsupported(ApiRoutine::GetLatestPost))
    }

    async fn get_user_timeline(
        &self,
        _user_oid: &RemoteId,
        _limit: usize,
    ) -> Result<Vec<Post>, ConnectionError> {
        Err(Self::unsupported(ApiRoutine::GetUserTimeline))
    }

    async fn search_posts(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<Post>, ConnectionError> {
        Err(Self::unsupported(ApiRoutine::SearchPosts))
    }
}

//! Shared test fixtures: an in-memory store, a scripted connection,
//! a recording progress sink, and a threshold-based stop oracle.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use driftwood::connection::{ApiRoutine, Connection};
use driftwood::data::{
    FollowDirection, IdKind, LocalId, Post, RemoteId, RemoteUser, Store,
};
use driftwood::error::{ConnectionError, ConnectionErrorKind, StoreError};
use driftwood::service::{ExecutorParent, ProgressSink};

// =============================================================================
// Builders
// =============================================================================

pub fn user(oid: &str) -> RemoteUser {
    RemoteUser {
        oid: RemoteId::new(oid),
        address: format!("{}@beach.example", oid),
        display_name: Some(oid.to_string()),
        profile_url: None,
        latest_post: None,
    }
}

pub fn user_with_post(oid: &str) -> RemoteUser {
    let mut user = user(oid);
    user.latest_post = Some(post(oid, &format!("{}-latest", oid)));
    user
}

pub fn post(author: &str, oid: &str) -> Post {
    Post {
        oid: RemoteId::new(oid),
        author_oid: RemoteId::new(author),
        content: format!("post {}", oid),
        created_at: Utc::now() - Duration::minutes(5),
    }
}

pub fn not_found(message: &str) -> ConnectionError {
    ConnectionError::new(ConnectionErrorKind::NotFound, message)
}

pub fn network_error(message: &str) -> ConnectionError {
    ConnectionError::new(ConnectionErrorKind::Network, message)
}

// =============================================================================
// MemoryStore
// =============================================================================

#[derive(Default)]
struct MemoryStoreState {
    next_id: i64,
    id_by_oid: HashMap<RemoteId, LocalId>,
    oid_by_id: HashMap<LocalId, RemoteId>,
    /// (follower, followed) -> flag
    edges: HashMap<(LocalId, LocalId), bool>,
    edge_writes: Vec<(LocalId, LocalId, bool)>,
    post_batches: Vec<Vec<Post>>,
}

/// Stateful in-memory Store for integration tests
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryStoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user oid and return its local id.
    pub fn seed_user(&self, oid: &str) -> LocalId {
        let mut state = self.state.lock().unwrap();
        let oid = RemoteId::new(oid);
        if let Some(id) = state.id_by_oid.get(&oid) {
            return *id;
        }
        state.next_id += 1;
        let id = LocalId(state.next_id);
        state.id_by_oid.insert(oid.clone(), id);
        state.oid_by_id.insert(id, oid);
        id
    }

    /// Seed one follow edge directly.
    pub fn seed_edge(&self, follower: LocalId, followed: LocalId, flag: bool) {
        let mut state = self.state.lock().unwrap();
        state.edges.insert((follower, followed), flag);
    }

    pub fn local_id_of(&self, oid: &str) -> Option<LocalId> {
        let state = self.state.lock().unwrap();
        state.id_by_oid.get(&RemoteId::new(oid)).copied()
    }

    pub fn edge(&self, follower: LocalId, followed: LocalId) -> Option<bool> {
        let state = self.state.lock().unwrap();
        state.edges.get(&(follower, followed)).copied()
    }

    pub fn followed_set(&self, center: LocalId, direction: FollowDirection) -> HashSet<LocalId> {
        let state = self.state.lock().unwrap();
        state
            .edges
            .iter()
            .filter(|((follower, followed), flag)| {
                **flag
                    && match direction {
                        FollowDirection::Followers => *followed == center,
                        FollowDirection::Friends => *follower == center,
                    }
            })
            .map(|((follower, followed), _)| match direction {
                FollowDirection::Followers => *follower,
                FollowDirection::Friends => *followed,
            })
            .collect()
    }

    pub fn edge_write_count(&self) -> usize {
        self.state.lock().unwrap().edge_writes.len()
    }

    pub fn post_batches(&self) -> Vec<Vec<Post>> {
        self.state.lock().unwrap().post_batches.clone()
    }

    pub fn persisted_posts(&self) -> Vec<Post> {
        self.state
            .lock()
            .unwrap()
            .post_batches
            .iter()
            .flatten()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn resolve_remote_id(
        &self,
        _kind: IdKind,
        id: LocalId,
    ) -> Result<Option<RemoteId>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.oid_by_id.get(&id).cloned())
    }

    async fn current_follow_set(
        &self,
        center: LocalId,
        direction: FollowDirection,
    ) -> Result<HashSet<LocalId>, StoreError> {
        Ok(self.followed_set(center, direction))
    }

    async fn upsert_user(&self, user: &RemoteUser) -> Result<LocalId, StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(id) = state.id_by_oid.get(&user.oid) {
            return Ok(*id);
        }
        state.next_id += 1;
        let id = LocalId(state.next_id);
        state.id_by_oid.insert(user.oid.clone(), id);
        state.oid_by_id.insert(id, user.oid.clone());
        Ok(id)
    }

    async fn set_follow_edge(
        &self,
        follower: LocalId,
        followed: LocalId,
        followed_flag: bool,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.edges.insert((follower, followed), followed_flag);
        state.edge_writes.push((follower, followed, followed_flag));
        Ok(())
    }

    async fn batch_persist_posts(&self, posts: &[Post]) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.post_batches.push(posts.to_vec());
        Ok(())
    }
}

// =============================================================================
// ScriptedConnection
// =============================================================================

/// Connection fake driven by pre-scripted responses
///
/// Records every call so tests can assert which routines ran and in
/// what quantity.
#[derive(Default)]
pub struct ScriptedConnection {
    supported: HashSet<ApiRoutine>,
    pub users: Vec<RemoteUser>,
    pub ids: Vec<RemoteId>,
    profiles: HashMap<RemoteId, Result<RemoteUser, ConnectionError>>,
    latest_posts: HashMap<RemoteId, Result<Post, ConnectionError>>,
    pub timeline: Vec<Post>,
    pub search_results: Vec<Post>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn support(mut self, routine: ApiRoutine) -> Self {
        self.supported.insert(routine);
        self
    }

    pub fn with_users(mut self, users: Vec<RemoteUser>) -> Self {
        self.users = users;
        self
    }

    pub fn with_ids(mut self, ids: Vec<&str>) -> Self {
        self.ids = ids.into_iter().map(RemoteId::new).collect();
        self
    }

    pub fn with_profile(mut self, oid: &str, result: Result<RemoteUser, ConnectionError>) -> Self {
        self.profiles.insert(RemoteId::new(oid), result);
        self
    }

    pub fn with_latest_post(mut self, oid: &str, result: Result<Post, ConnectionError>) -> Self {
        self.latest_posts.insert(RemoteId::new(oid), result);
        self
    }

    pub fn with_timeline(mut self, posts: Vec<Post>) -> Self {
        self.timeline = posts;
        self
    }

    pub fn with_search_results(mut self, posts: Vec<Post>) -> Self {
        self.search_results = posts;
        self
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    fn is_api_supported(&self, routine: ApiRoutine) -> bool {
        self.supported.contains(&routine)
    }

    async fn get_users_following(
        &self,
        user_oid: &RemoteId,
    ) -> Result<Vec<RemoteUser>, ConnectionError> {
        self.record(format!("get_users_following:{}", user_oid));
        Ok(self.users.clone())
    }

    async fn get_ids_of_users_following(
        &self,
        user_oid: &RemoteId,
    ) -> Result<Vec<RemoteId>, ConnectionError> {
        self.record(format!("get_ids_of_users_following:{}", user_oid));
        Ok(self.ids.clone())
    }

    async fn get_users_followed_by(
        &self,
        user_oid: &RemoteId,
    ) -> Result<Vec<RemoteUser>, ConnectionError> {
        self.record(format!("get_users_followed_by:{}", user_oid));
        Ok(self.users.clone())
    }

    async fn get_ids_of_users_followed_by(
        &self,
        user_oid: &RemoteId,
    ) -> Result<Vec<RemoteId>, ConnectionError> {
        self.record(format!("get_ids_of_users_followed_by:{}", user_oid));
        Ok(self.ids.clone())
    }

    async fn get_user(&self, user_oid: &RemoteId) -> Result<RemoteUser, ConnectionError> {
        self.record(format!("get_user:{}", user_oid));
        match self.profiles.get(user_oid) {
            Some(result) => result.clone(),
            None => Err(not_found(&format!("no profile scripted for {}", user_oid))),
        }
    }

    async fn get_latest_post_for(&self, user_oid: &RemoteId) -> Result<Post, ConnectionError> {
        self.record(format!("get_latest_post_for:{}", user_oid));
        match self.latest_posts.get(user_oid) {
            Some(result) => result.clone(),
            None => Err(not_found(&format!("no latest post scripted for {}", user_oid))),
        }
    }

    async fn get_user_timeline(
        &self,
        user_oid: &RemoteId,
        _limit: usize,
    ) -> Result<Vec<Post>, ConnectionError> {
        self.record(format!("get_user_timeline:{}", user_oid));
        Ok(self.timeline.clone())
    }

    async fn search_posts(
        &self,
        query: &str,
        _limit: usize,
    ) -> Result<Vec<Post>, ConnectionError> {
        self.record(format!("search_posts:{}", query));
        Ok(self.search_results.clone())
    }
}

// =============================================================================
// Progress + cancellation fakes
// =============================================================================

/// Progress sink that records every event
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<(String, bool)>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, bool)> {
        self.events.lock().unwrap().clone()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, is_detail)| !is_detail)
            .map(|(message, _)| message.clone())
            .collect()
    }
}

impl ProgressSink for RecordingProgress {
    fn report_progress(&self, message: &str, is_detail: bool) {
        self.events
            .lock()
            .unwrap()
            .push((message.to_string(), is_detail));
    }
}

/// Stop oracle that flips to stopping on the nth query
pub struct StopAfter {
    queries: AtomicUsize,
    at: usize,
}

impl StopAfter {
    /// `at = 3` means the third `is_stopping` query (and all later
    /// ones) return true.
    pub fn new(at: usize) -> Self {
        Self {
            queries: AtomicUsize::new(0),
            at,
        }
    }
}

impl ExecutorParent for StopAfter {
    fn is_stopping(&self) -> bool {
        let n = self.queries.fetch_add(1, Ordering::SeqCst) + 1;
        n >= self.at
    }
}

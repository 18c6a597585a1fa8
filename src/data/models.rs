//! Data models
//!
//! Rust structs representing remote entities and command descriptors.
//! Remote identifiers stay opaque strings; local identifiers are the
//! numeric ids handed out by the persistence layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

// =============================================================================
// ID Types
// =============================================================================

/// Opaque identifier assigned by the remote service
///
/// Stable across sync runs; the join key between local and remote state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(pub String);

impl RemoteId {
    pub fn new(oid: impl Into<String>) -> Self {
        Self(oid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RemoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric identifier assigned by the persistence layer
///
/// Stable for the lifetime of a locally-known entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalId(pub i64);

impl std::fmt::Display for LocalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Command ID wrapper (ULID format, 26 characters)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(pub String);

impl CommandId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }
}

impl Default for CommandId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which kind of entity a local id refers to when resolving its remote id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    User,
    Post,
}

// =============================================================================
// Remote entities
// =============================================================================

/// A user profile as fetched from the remote service
///
/// Immutable once constructed; consumed to upsert local user records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteUser {
    /// Remote identifier
    pub oid: RemoteId,
    /// Webfinger-style address (user@domain)
    pub address: String,
    /// Display name, if the profile sets one
    pub display_name: Option<String>,
    /// Profile page URL
    pub profile_url: Option<Url>,
    /// Latest post, when the fetch routine embeds it
    pub latest_post: Option<Post>,
}

impl RemoteUser {
    pub fn has_latest_post(&self) -> bool {
        self.latest_post.is_some()
    }
}

/// A post as fetched from the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Remote identifier
    pub oid: RemoteId,
    /// Remote identifier of the author
    pub author_oid: RemoteId,
    /// Post body (HTML as delivered by the remote)
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Which side of the center user a follow-graph sync walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowDirection {
    /// Users following the center user
    Followers,
    /// Users the center user follows
    Friends,
}

impl FollowDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Followers => "followers",
            Self::Friends => "friends",
        }
    }
}

// =============================================================================
// Commands and accounts
// =============================================================================

/// A service origin (one federated instance)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Origin(pub String);

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A locally configured account on one origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account name (user@domain)
    pub name: String,
    /// Origin the account belongs to
    pub origin: Origin,
}

/// What a command asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Periodic background refresh of a timeline
    AutomaticUpdate,
    /// Explicit timeline fetch
    FetchTimeline,
    /// Full-text post search
    SearchPosts,
    /// Sync the set of users following the target
    GetFollowers,
    /// Sync the set of users the target follows
    GetFriends,
    /// Refresh a single user profile
    GetUser,
    /// Fetch a single user's latest post
    GetLatestPost,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutomaticUpdate => "automatic_update",
            Self::FetchTimeline => "fetch_timeline",
            Self::SearchPosts => "search_posts",
            Self::GetFollowers => "get_followers",
            Self::GetFriends => "get_friends",
            Self::GetUser => "get_user",
            Self::GetLatestPost => "get_latest_post",
        }
    }
}

/// Which timeline an anonymous (account-less) command refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineType {
    Home,
    Public,
    User,
}

/// Command descriptor handed to the executor
///
/// `account: None` means the command is anonymous and fans out over
/// the configured accounts (or origins, for public timelines).
#[derive(Debug, Clone)]
pub struct CommandData {
    pub id: CommandId,
    pub kind: CommandKind,
    /// Local id of the user the command centers on
    pub target: Option<LocalId>,
    pub account: Option<Account>,
    pub origin: Option<Origin>,
    pub timeline_type: Option<TimelineType>,
    /// Free-text filter for search commands
    pub search_query: Option<String>,
}

impl CommandData {
    /// Minimal constructor; optional fields start empty.
    pub fn new(kind: CommandKind) -> Self {
        Self {
            id: CommandId::new(),
            kind,
            target: None,
            account: None,
            origin: None,
            timeline_type: None,
            search_query: None,
        }
    }

    pub fn with_target(mut self, target: LocalId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_account(mut self, account: Account) -> Self {
        self.origin = Some(account.origin.clone());
        self.account = Some(account);
        self
    }

    pub fn with_timeline_type(mut self, timeline_type: TimelineType) -> Self {
        self.timeline_type = Some(timeline_type);
        self
    }

    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }
}

impl std::fmt::Display for CommandData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "command {} ({})", self.id, self.kind.as_str())?;
        if let Some(target) = self.target {
            write!(f, " target={}", target)?;
        }
        if let Some(ref account) = self.account {
            write!(f, " account={}", account.name)?;
        }
        Ok(())
    }
}

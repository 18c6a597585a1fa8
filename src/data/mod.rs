//! Data layer
//!
//! Models for remote entities and commands, the persistence
//! abstraction, and the latest-post accumulator.

mod latest_posts;
mod models;
mod store;

pub use latest_posts::LatestPosts;
pub use models::{
    Account, CommandData, CommandId, CommandKind, FollowDirection, IdKind, LocalId, Origin, Post,
    RemoteId, RemoteUser, TimelineType,
};
#[cfg(test)]
pub use store::MockStore;
pub use store::Store;

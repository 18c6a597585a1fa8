//! Latest-post accumulator
//!
//! Collects the single newest post seen per author during a sync run
//! so the whole set can be persisted as one batch at reconciliation
//! time instead of one write per item.

use std::collections::HashMap;

use crate::data::models::{Post, RemoteId};

/// Per-author newest-post tracker
///
/// `observe` keeps the newer of two posts by the same author, so
/// embedded posts from a bulk fetch and individually hydrated posts
/// can be mixed without duplicating writes.
#[derive(Debug, Default)]
pub struct LatestPosts {
    by_author: HashMap<RemoteId, Post>,
}

impl LatestPosts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a post, keeping the newest one per author.
    pub fn observe(&mut self, post: Post) {
        match self.by_author.get(&post.author_oid) {
            Some(existing) if existing.created_at >= post.created_at => {}
            _ => {
                self.by_author.insert(post.author_oid.clone(), post);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_author.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_author.len()
    }

    /// Drain into a batch for `Store::batch_persist_posts`.
    pub fn into_batch(self) -> Vec<Post> {
        self.by_author.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn post(author: &str, oid: &str, age_minutes: i64) -> Post {
        Post {
            oid: RemoteId::new(oid),
            author_oid: RemoteId::new(author),
            content: format!("post {}", oid),
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[test]
    fn keeps_newest_post_per_author() {
        let mut latest = LatestPosts::new();
        latest.observe(post("alice", "old", 60));
        latest.observe(post("alice", "new", 1));
        latest.observe(post("alice", "older", 120));
        latest.observe(post("bob", "only", 30));

        let mut batch = latest.into_batch();
        batch.sort_by(|a, b| a.author_oid.0.cmp(&b.author_oid.0));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].oid, RemoteId::new("new"));
        assert_eq!(batch[1].oid, RemoteId::new("only"));
    }

    #[test]
    fn empty_accumulator_yields_empty_batch() {
        let latest = LatestPosts::new();
        assert!(latest.is_empty());
        assert!(latest.into_batch().is_empty());
    }
}

//! Follow-graph synchronization
//!
//! Fetches the current follower (or friends) list of a center user
//! from the remote service and reconciles it against the locally
//! persisted follow graph. Degrades gracefully when the remote only
//! exposes an id-list routine by re-hydrating user objects one at a
//! time, converging to the same final graph state as the rich path.
//!
//! Per-item fetches are isolated: a handful of stale or suspended
//! accounts predictably 404 in a large graph, and one bad entry must
//! not abort the whole sync. Reconciliation only runs if the fetch
//! and hydration phases were not stopped early, so the graph is never
//! left partially reconciled.

use async_trait::async_trait;

use crate::connection::ApiRoutine;
use crate::data::{
    CommandKind, FollowDirection, IdKind, LatestPosts, LocalId, RemoteId, RemoteUser,
};
use crate::error::{ConnectionError, SyncError};
use crate::service::context::ExecutionContext;
use crate::service::strategy::CommandExecutorStrategy;
use crate::service::CommandExecutor;

/// Follower/friends reconciliation strategy
pub struct FollowGraphSyncStrategy;

#[async_trait]
impl CommandExecutorStrategy for FollowGraphSyncStrategy {
    fn name(&self) -> &'static str {
        "FollowGraphSync"
    }

    async fn execute(&self, executor: &CommandExecutor, ctx: &mut ExecutionContext) {
        let direction = match ctx.command.kind {
            CommandKind::GetFollowers => FollowDirection::Followers,
            CommandKind::GetFriends => FollowDirection::Friends,
            other => {
                let error = SyncError::InvalidCommand(format!(
                    "{} is not a follow-graph command",
                    other.as_str()
                ));
                ctx.log_sync_error(&error, "follow-graph sync dispatched with wrong kind");
                ctx.result.mark_structural_failure(error.to_string());
                return;
            }
        };

        let Some((center, center_oid)) = self.lookup_center(executor, ctx).await else {
            return;
        };

        tracing::debug!(
            command = %ctx.command,
            center = %center,
            direction = direction.as_str(),
            "syncing follow graph"
        );

        if let Err(error) = self
            .sync_graph(executor, ctx, direction, center, &center_oid)
            .await
        {
            ctx.log_sync_error(
                &error,
                &format!("getting {} for user {}", direction.as_str(), center),
            );
            ctx.result.mark_structural_failure(error.to_string());
        }
    }
}

impl FollowGraphSyncStrategy {
    /// Resolve the center user's remote id, failing fast without
    /// contacting the network when it is unknown locally.
    async fn lookup_center(
        &self,
        executor: &CommandExecutor,
        ctx: &mut ExecutionContext,
    ) -> Option<(LocalId, RemoteId)> {
        let Some(center) = ctx.command.target else {
            ctx.result.increment_parse_exceptions();
            ctx.result
                .mark_structural_failure("follow-graph sync requires a target user");
            tracing::error!(command = %ctx.command, "no target user for follow-graph sync");
            return None;
        };

        match executor
            .store()
            .resolve_remote_id(IdKind::User, center)
            .await
        {
            Ok(Some(oid)) => Some((center, oid)),
            Ok(None) => {
                ctx.result.increment_parse_exceptions();
                ctx.result
                    .mark_structural_failure(format!("remote id not found for user {}", center));
                tracing::error!(command = %ctx.command, center = %center, "remote id not found");
                None
            }
            Err(error) => {
                let error = SyncError::from(error);
                ctx.log_sync_error(&error, &format!("resolving remote id of user {}", center));
                ctx.result.mark_structural_failure(error.to_string());
                None
            }
        }
    }

    /// Steps 1-8 of the sync: probe, bulk fetch, diff, hydrate, reconcile.
    ///
    /// Returns `Ok(())` on both normal completion and cooperative
    /// early stop; only structural failures become errors.
    async fn sync_graph(
        &self,
        executor: &CommandExecutor,
        ctx: &mut ExecutionContext,
        direction: FollowDirection,
        center: LocalId,
        center_oid: &RemoteId,
    ) -> Result<(), SyncError> {
        let conn = executor.connection();
        let store = executor.store();

        let (rich_routine, ids_routine) = match direction {
            FollowDirection::Followers => (ApiRoutine::GetFollowers, ApiRoutine::GetFollowersIds),
            FollowDirection::Friends => (ApiRoutine::GetFriends, ApiRoutine::GetFriendsIds),
        };

        // Users that are fetched and persisted during this run, with
        // the local id the store assigned on upsert.
        let mut users_new: Vec<(LocalId, RemoteUser)> = Vec::new();
        let mut oids_new: Vec<RemoteId> = Vec::new();
        let mut latest_posts = LatestPosts::new();
        let mut posts_loaded = false;
        let users_loaded;

        if conn.is_api_supported(rich_routine) {
            users_loaded = true;
            let users = match direction {
                FollowDirection::Followers => conn.get_users_following(center_oid).await?,
                FollowDirection::Friends => conn.get_users_followed_by(center_oid).await?,
            };
            for user in users {
                oids_new.push(user.oid.clone());
                if let Some(post) = &user.latest_post {
                    posts_loaded = true;
                    latest_posts.observe(post.clone());
                }
                let local_id = store.upsert_user(&user).await?;
                users_new.push((local_id, user));
            }
        } else if conn.is_api_supported(ids_routine) {
            users_loaded = false;
            oids_new = match direction {
                FollowDirection::Followers => conn.get_ids_of_users_following(center_oid).await?,
                FollowDirection::Friends => conn.get_ids_of_users_followed_by(center_oid).await?,
            };
        } else {
            return Err(ConnectionError::unsupported(format!(
                "{} and {}",
                rich_routine, ids_routine
            ))
            .into());
        }

        let mut old_set = store.current_follow_set(center, direction).await?;
        ctx.result.increment_downloaded_count();
        crate::metrics::ITEMS_DOWNLOADED_TOTAL.inc();
        executor.report_progress(
            &format!(
                "{}: {} -> {}",
                direction.as_str(),
                old_set.len(),
                oids_new.len()
            ),
            false,
        );

        if !users_loaded {
            let mut count = 0u64;
            for user_oid in &oids_new {
                count += 1;
                match conn.get_user(user_oid).await {
                    Ok(user) => {
                        if let Some(post) = &user.latest_post {
                            posts_loaded = true;
                            latest_posts.observe(post.clone());
                        }
                        let local_id = store.upsert_user(&user).await?;
                        executor.report_progress(&format!("{}. get user: {}", count, user.address), true);
                        ctx.result.increment_downloaded_count();
                        crate::metrics::ITEMS_DOWNLOADED_TOTAL.inc();
                        users_new.push((local_id, user));
                    }
                    Err(error) => {
                        self.note_hydration_failure(executor, ctx, user_oid, &error, "user");
                    }
                }
                if ctx.log_soft_error_if_stopping() {
                    return Ok(());
                }
            }
        }

        if !posts_loaded {
            let mut count = 0u64;
            for (_, user) in &users_new {
                count += 1;
                match conn.get_latest_post_for(&user.oid).await {
                    Ok(post) => {
                        latest_posts.observe(post);
                        executor.report_progress(
                            &format!("{}. get latest post: {}", count, user.address),
                            true,
                        );
                        ctx.result.increment_downloaded_count();
                        crate::metrics::ITEMS_DOWNLOADED_TOTAL.inc();
                    }
                    Err(error) => {
                        self.note_hydration_failure(executor, ctx, &user.oid, &error, "latest post");
                    }
                }
                if ctx.log_soft_error_if_stopping() {
                    return Ok(());
                }
            }
        }

        // Reconcile: set the follow flag for every user in the new
        // set, then clear it for everyone left over from the old set.
        for (local_id, _) in &users_new {
            old_set.remove(local_id);
            let (follower, followed) = edge_endpoints(direction, center, *local_id);
            store.set_follow_edge(follower, followed, true).await?;
        }
        for stale_id in old_set {
            let (follower, followed) = edge_endpoints(direction, center, stale_id);
            store.set_follow_edge(follower, followed, false).await?;
        }

        let batch = latest_posts.into_batch();
        if !batch.is_empty() {
            store.batch_persist_posts(&batch).await?;
        }

        tracing::debug!(
            command = %ctx.command,
            center = %center,
            direction = direction.as_str(),
            users = users_new.len(),
            "follow-graph sync ended"
        );
        Ok(())
    }

    /// Record one isolated per-item hydration failure.
    ///
    /// The error is swallowed at this granularity; the loop continues.
    /// When the configured policy asks for it, hard errors still bump
    /// the parse-exception counter.
    fn note_hydration_failure(
        &self,
        executor: &CommandExecutor,
        ctx: &mut ExecutionContext,
        oid: &RemoteId,
        error: &ConnectionError,
        what: &str,
    ) {
        tracing::info!(oid = %oid, error = %error, "failed to fetch {} during hydration; skipping", what);
        ctx.result.note_item_failure();
        crate::metrics::ITEM_FAILURES_TOTAL.inc();
        if executor.count_hard_hydration_errors() && error.is_hard() {
            ctx.result.increment_parse_exceptions();
        }
    }
}

/// Orient one follow edge around the center user.
///
/// Followers direction: the fetched user follows the center.
/// Friends direction: the center follows the fetched user.
fn edge_endpoints(direction: FollowDirection, center: LocalId, other: LocalId) -> (LocalId, LocalId) {
    match direction {
        FollowDirection::Followers => (other, center),
        FollowDirection::Friends => (center, other),
    }
}

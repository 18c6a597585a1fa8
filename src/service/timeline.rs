//! Timeline synchronization
//!
//! Fetches recent posts from the target user's timeline and persists
//! them as one batch. Shares the follow-graph strategy's fail-fast
//! lookup and cooperative-cancellation behavior.

use async_trait::async_trait;

use crate::connection::ApiRoutine;
use crate::data::IdKind;
use crate::error::{ConnectionError, SyncError};
use crate::service::context::ExecutionContext;
use crate::service::strategy::CommandExecutorStrategy;
use crate::service::CommandExecutor;

/// Timeline fetch strategy
pub struct TimelineSyncStrategy;

#[async_trait]
impl CommandExecutorStrategy for TimelineSyncStrategy {
    fn name(&self) -> &'static str {
        "Timeline"
    }

    async fn execute(&self, executor: &CommandExecutor, ctx: &mut ExecutionContext) {
        let Some(target) = ctx.command.target else {
            ctx.result.increment_parse_exceptions();
            ctx.result
                .mark_structural_failure("timeline sync requires a target user");
            tracing::error!(command = %ctx.command, "no target user for timeline sync");
            return;
        };

        if let Err(error) = self.fetch_timeline(executor, ctx, target).await {
            ctx.log_sync_error(&error, &format!("fetching timeline of user {}", target));
            ctx.result.mark_structural_failure(error.to_string());
        }
    }
}

impl TimelineSyncStrategy {
    async fn fetch_timeline(
        &self,
        executor: &CommandExecutor,
        ctx: &mut ExecutionContext,
        target: crate::data::LocalId,
    ) -> Result<(), SyncError> {
        let store = executor.store();
        let conn = executor.connection();

        let Some(oid) = store.resolve_remote_id(IdKind::User, target).await? else {
            return Err(SyncError::InvalidCommand(format!(
                "remote id not found for user {}",
                target
            )));
        };

        if !conn.is_api_supported(ApiRoutine::GetUserTimeline) {
            return Err(
                ConnectionError::unsupported(ApiRoutine::GetUserTimeline.as_str()).into(),
            );
        }

        if ctx.log_soft_error_if_stopping() {
            return Ok(());
        }

        let posts = conn
            .get_user_timeline(&oid, executor.timeline_fetch_limit())
            .await?;

        executor.report_progress(&format!("timeline: {} posts", posts.len()), false);

        for _ in &posts {
            ctx.result.increment_downloaded_count();
            crate::metrics::ITEMS_DOWNLOADED_TOTAL.inc();
        }

        if !posts.is_empty() {
            store.batch_persist_posts(&posts).await?;
        }

        tracing::debug!(
            command = %ctx.command,
            target = %target,
            posts = posts.len(),
            "timeline sync ended"
        );
        Ok(())
    }
}

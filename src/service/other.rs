//! Single-item refresh commands
//!
//! Catch-all strategy for commands that touch one remote entity:
//! refreshing a user profile or fetching one latest post. Unknown
//! kinds are logged and skipped without failing the command.

use async_trait::async_trait;

use crate::connection::ApiRoutine;
use crate::data::{CommandKind, IdKind, LocalId};
use crate::error::{ConnectionError, SyncError};
use crate::service::context::ExecutionContext;
use crate::service::strategy::CommandExecutorStrategy;
use crate::service::CommandExecutor;

/// Generic single-item strategy
pub struct OtherStrategy;

#[async_trait]
impl CommandExecutorStrategy for OtherStrategy {
    fn name(&self) -> &'static str {
        "Other"
    }

    async fn execute(&self, executor: &CommandExecutor, ctx: &mut ExecutionContext) {
        match ctx.command.kind {
            CommandKind::GetUser => self.run_target_command(executor, ctx, Step::User).await,
            CommandKind::GetLatestPost => {
                self.run_target_command(executor, ctx, Step::LatestPost).await
            }
            other => {
                tracing::debug!(command = %ctx.command, kind = other.as_str(), "no handler; skipping");
            }
        }
    }
}

enum Step {
    User,
    LatestPost,
}

impl OtherStrategy {
    async fn run_target_command(
        &self,
        executor: &CommandExecutor,
        ctx: &mut ExecutionContext,
        step: Step,
    ) {
        let Some(target) = ctx.command.target else {
            ctx.result.increment_parse_exceptions();
            ctx.result
                .mark_structural_failure("command requires a target user");
            tracing::error!(command = %ctx.command, "no target user");
            return;
        };

        let outcome = match step {
            Step::User => self.refresh_user(executor, ctx, target).await,
            Step::LatestPost => self.fetch_latest_post(executor, ctx, target).await,
        };
        if let Err(error) = outcome {
            ctx.log_sync_error(&error, &format!("refreshing user {}", target));
            ctx.result.mark_structural_failure(error.to_string());
        }
    }

    async fn refresh_user(
        &self,
        executor: &CommandExecutor,
        ctx: &mut ExecutionContext,
        target: LocalId,
    ) -> Result<(), SyncError> {
        let oid = self.resolve(executor, target).await?;
        let conn = executor.connection();

        if !conn.is_api_supported(ApiRoutine::GetUser) {
            return Err(ConnectionError::unsupported(ApiRoutine::GetUser.as_str()).into());
        }

        let user = conn.get_user(&oid).await?;
        executor.store().upsert_user(&user).await?;
        ctx.result.increment_downloaded_count();
        crate::metrics::ITEMS_DOWNLOADED_TOTAL.inc();
        executor.report_progress(&format!("get user: {}", user.address), false);
        Ok(())
    }

    async fn fetch_latest_post(
        &self,
        executor: &CommandExecutor,
        ctx: &mut ExecutionContext,
        target: LocalId,
    ) -> Result<(), SyncError> {
        let oid = self.resolve(executor, target).await?;
        let conn = executor.connection();

        if !conn.is_api_supported(ApiRoutine::GetLatestPost) {
            return Err(ConnectionError::unsupported(ApiRoutine::GetLatestPost.as_str()).into());
        }

        let post = conn.get_latest_post_for(&oid).await?;
        executor.store().batch_persist_posts(&[post]).await?;
        ctx.result.increment_downloaded_count();
        crate::metrics::ITEMS_DOWNLOADED_TOTAL.inc();
        Ok(())
    }

    async fn resolve(
        &self,
        executor: &CommandExecutor,
        target: LocalId,
    ) -> Result<crate::data::RemoteId, SyncError> {
        executor
            .store()
            .resolve_remote_id(IdKind::User, target)
            .await?
            .ok_or_else(|| {
                SyncError::InvalidCommand(format!("remote id not found for user {}", target))
            })
    }
}

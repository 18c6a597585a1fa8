//! Post search
//!
//! Runs a free-text search against the remote service and persists
//! matching posts as one batch.

use async_trait::async_trait;

use crate::connection::ApiRoutine;
use crate::error::{ConnectionError, SyncError};
use crate::service::context::ExecutionContext;
use crate::service::strategy::CommandExecutorStrategy;
use crate::service::CommandExecutor;

/// Search strategy
pub struct SearchStrategy;

#[async_trait]
impl CommandExecutorStrategy for SearchStrategy {
    fn name(&self) -> &'static str {
        "Search"
    }

    async fn execute(&self, executor: &CommandExecutor, ctx: &mut ExecutionContext) {
        let Some(query) = ctx.command.search_query.clone() else {
            ctx.result.increment_parse_exceptions();
            ctx.result
                .mark_structural_failure("search requires a query");
            tracing::error!(command = %ctx.command, "no query for search command");
            return;
        };

        if let Err(error) = self.search(executor, ctx, &query).await {
            ctx.log_sync_error(&error, &format!("searching posts for {:?}", query));
            ctx.result.mark_structural_failure(error.to_string());
        }
    }
}

impl SearchStrategy {
    async fn search(
        &self,
        executor: &CommandExecutor,
        ctx: &mut ExecutionContext,
        query: &str,
    ) -> Result<(), SyncError> {
        let conn = executor.connection();

        if !conn.is_api_supported(ApiRoutine::SearchPosts) {
            return Err(ConnectionError::unsupported(ApiRoutine::SearchPosts.as_str()).into());
        }

        if ctx.log_soft_error_if_stopping() {
            return Ok(());
        }

        let posts = conn
            .search_posts(query, executor.search_fetch_limit())
            .await?;

        executor.report_progress(&format!("search {:?}: {} posts", query, posts.len()), false);

        for _ in &posts {
            ctx.result.increment_downloaded_count();
            crate::metrics::ITEMS_DOWNLOADED_TOTAL.inc();
        }

        if !posts.is_empty() {
            executor.store().batch_persist_posts(&posts).await?;
        }

        tracing::debug!(command = %ctx.command, posts = posts.len(), "search ended");
        Ok(())
    }
}

//! Fan-out strategies
//!
//! Anonymous commands (no explicit account) are rerun once per
//! configured account, or once per origin for public timelines.
//! Children execute sequentially, share the parent's cancellation
//! oracle, and fold their counters into the parent result.

use async_trait::async_trait;

use crate::data::Account;
use crate::service::context::ExecutionContext;
use crate::service::strategy::CommandExecutorStrategy;
use crate::service::CommandExecutor;

/// Fan a command out over every configured account
pub struct AllAccountsStrategy;

#[async_trait]
impl CommandExecutorStrategy for AllAccountsStrategy {
    fn name(&self) -> &'static str {
        "AllAccounts"
    }

    async fn execute(&self, executor: &CommandExecutor, ctx: &mut ExecutionContext) {
        let accounts = executor.accounts().to_vec();
        fan_out(executor, ctx, accounts).await;
    }
}

/// Fan a command out over one account per origin
///
/// Public timelines are per-origin, not per-account, so running the
/// command once per origin avoids duplicate fetches when several
/// accounts share an instance.
pub struct AllOriginsStrategy;

#[async_trait]
impl CommandExecutorStrategy for AllOriginsStrategy {
    fn name(&self) -> &'static str {
        "AllOrigins"
    }

    async fn execute(&self, executor: &CommandExecutor, ctx: &mut ExecutionContext) {
        let mut seen = std::collections::HashSet::new();
        let accounts: Vec<Account> = executor
            .accounts()
            .iter()
            .filter(|account| seen.insert(account.origin.clone()))
            .cloned()
            .collect();
        fan_out(executor, ctx, accounts).await;
    }
}

async fn fan_out(executor: &CommandExecutor, ctx: &mut ExecutionContext, accounts: Vec<Account>) {
    if accounts.is_empty() {
        tracing::debug!(command = %ctx.command, "no accounts configured; nothing to do");
        return;
    }

    for account in accounts {
        if ctx.log_soft_error_if_stopping() {
            return;
        }

        let mut child_command = ctx.command.clone();
        child_command.account = Some(account.clone());
        child_command.origin = Some(account.origin.clone());

        tracing::debug!(
            command = %ctx.command,
            account = %account.name,
            "fanning out to account"
        );

        let child_result = executor
            .execute_with_parent(child_command, ctx.parent())
            .await;
        ctx.result.accumulate(&child_result);
    }
}

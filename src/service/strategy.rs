//! Strategy resolution and dispatch
//!
//! A command's shape (explicit account or not, which timeline, which
//! kind) maps to exactly one strategy. Resolution is a pure function
//! with no network or persistence side effects, evaluated once per
//! command dispatch; the returned kind is then materialized into a
//! trait object and run.

use async_trait::async_trait;

use crate::data::{CommandData, CommandKind, TimelineType};
use crate::service::context::ExecutionContext;
use crate::service::fan_out::{AllAccountsStrategy, AllOriginsStrategy};
use crate::service::follow_graph::FollowGraphSyncStrategy;
use crate::service::other::OtherStrategy;
use crate::service::search::SearchStrategy;
use crate::service::timeline::TimelineSyncStrategy;
use crate::service::CommandExecutor;

/// Shared lifecycle contract for all sync strategies
///
/// `execute` runs synchronously to completion or cooperative early
/// exit, operating entirely through side effects on the bound
/// context: counters, progress events, and Store writes.
#[async_trait]
pub trait CommandExecutorStrategy: Send + Sync {
    /// Strategy name for dispatch logging
    fn name(&self) -> &'static str;

    async fn execute(&self, executor: &CommandExecutor, ctx: &mut ExecutionContext);
}

/// Which strategy a command resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Anonymous public-timeline command: fan out over origins
    AllOrigins,
    /// Anonymous command: fan out over all configured accounts
    AllAccounts,
    /// Timeline fetch for one account
    Timeline,
    /// Post search for one account
    Search,
    /// Follow-graph reconciliation for one account
    FollowGraphSync,
    /// Everything else (single-item refresh commands)
    Other,
}

/// Map a command's shape to its strategy. Pure and deterministic.
pub fn resolve_strategy(command: &CommandData) -> StrategyKind {
    if command.account.is_none() {
        if command.timeline_type == Some(TimelineType::Public) {
            StrategyKind::AllOrigins
        } else {
            StrategyKind::AllAccounts
        }
    } else {
        match command.kind {
            CommandKind::AutomaticUpdate | CommandKind::FetchTimeline => StrategyKind::Timeline,
            CommandKind::SearchPosts => StrategyKind::Search,
            CommandKind::GetFollowers | CommandKind::GetFriends => StrategyKind::FollowGraphSync,
            _ => StrategyKind::Other,
        }
    }
}

/// Materialize a strategy kind into an executable strategy.
pub fn strategy_for(kind: StrategyKind) -> Box<dyn CommandExecutorStrategy> {
    match kind {
        StrategyKind::AllOrigins => Box::new(AllOriginsStrategy),
        StrategyKind::AllAccounts => Box::new(AllAccountsStrategy),
        StrategyKind::Timeline => Box::new(TimelineSyncStrategy),
        StrategyKind::Search => Box::new(SearchStrategy),
        StrategyKind::FollowGraphSync => Box::new(FollowGraphSyncStrategy),
        StrategyKind::Other => Box::new(OtherStrategy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Account, Origin};

    fn account() -> Account {
        Account {
            name: "resident@beach.example".to_string(),
            origin: Origin("beach.example".to_string()),
        }
    }

    #[test]
    fn anonymous_public_timeline_fans_out_over_origins() {
        let command = CommandData::new(CommandKind::FetchTimeline)
            .with_timeline_type(TimelineType::Public);
        assert_eq!(resolve_strategy(&command), StrategyKind::AllOrigins);
    }

    #[test]
    fn anonymous_non_public_fans_out_over_accounts() {
        let command = CommandData::new(CommandKind::FetchTimeline)
            .with_timeline_type(TimelineType::Home);
        assert_eq!(resolve_strategy(&command), StrategyKind::AllAccounts);

        let no_timeline = CommandData::new(CommandKind::GetFollowers);
        assert_eq!(resolve_strategy(&no_timeline), StrategyKind::AllAccounts);
    }

    #[test]
    fn account_commands_resolve_by_kind() {
        let cases = [
            (CommandKind::AutomaticUpdate, StrategyKind::Timeline),
            (CommandKind::FetchTimeline, StrategyKind::Timeline),
            (CommandKind::SearchPosts, StrategyKind::Search),
            (CommandKind::GetFollowers, StrategyKind::FollowGraphSync),
            (CommandKind::GetFriends, StrategyKind::FollowGraphSync),
            (CommandKind::GetUser, StrategyKind::Other),
            (CommandKind::GetLatestPost, StrategyKind::Other),
        ];
        for (kind, expected) in cases {
            let command = CommandData::new(kind).with_account(account());
            assert_eq!(resolve_strategy(&command), expected, "kind {:?}", kind);
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        let command = CommandData::new(CommandKind::GetFriends).with_account(account());
        let first = resolve_strategy(&command);
        let second = resolve_strategy(&command);
        assert_eq!(first, second);
    }
}

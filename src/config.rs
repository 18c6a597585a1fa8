//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;

use crate::data::{Account, Origin};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub sync: SyncConfig,
    /// Accounts known to this client
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sync engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Count hard per-item hydration errors as parse exceptions.
    ///
    /// When false, per-item failures during user/post hydration are
    /// logged and skipped without touching the exception counters.
    #[serde(default)]
    pub count_hard_hydration_errors: bool,
    /// Maximum posts fetched per timeline command
    #[serde(default = "default_timeline_fetch_limit")]
    pub timeline_fetch_limit: usize,
    /// Maximum posts fetched per search command
    #[serde(default = "default_search_fetch_limit")]
    pub search_fetch_limit: usize,
    /// Emit one detail progress event per hydrated item
    #[serde(default = "default_detail_progress")]
    pub detail_progress: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            count_hard_hydration_errors: false,
            timeline_fetch_limit: default_timeline_fetch_limit(),
            search_fetch_limit: default_search_fetch_limit(),
            detail_progress: default_detail_progress(),
        }
    }
}

fn default_timeline_fetch_limit() -> usize {
    200
}

fn default_search_fetch_limit() -> usize {
    40
}

fn default_detail_progress() -> bool {
    true
}

/// One configured account
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// Account name (user@domain)
    pub name: String,
    /// Origin the account belongs to (domain of the home instance)
    pub origin: String,
}

impl AccountConfig {
    pub fn to_account(&self) -> Account {
        Account {
            name: self.name.clone(),
            origin: Origin(self.origin.clone()),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format: "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (DRIFTWOOD__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::SyncError> {
        Self::load_from(None)
    }

    /// Load configuration with an explicit extra file, used by tests.
    pub fn load_from(extra_file: Option<&std::path::Path>) -> Result<Self, crate::error::SyncError> {
        use config::{Config, Environment, File};

        let mut builder = Config::builder()
            .set_default("sync.count_hard_hydration_errors", false)?
            .set_default("sync.timeline_fetch_limit", 200)?
            .set_default("sync.search_fetch_limit", 40)?
            .set_default("sync.detail_progress", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("DRIFTWOOD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::SyncError> {
        if self.sync.timeline_fetch_limit == 0 {
            return Err(crate::error::SyncError::Config(
                "sync.timeline_fetch_limit must be greater than 0".to_string(),
            ));
        }
        if self.sync.search_fetch_limit == 0 {
            return Err(crate::error::SyncError::Config(
                "sync.search_fetch_limit must be greater than 0".to_string(),
            ));
        }
        for account in &self.accounts {
            if account.name.trim().is_empty() || account.origin.trim().is_empty() {
                return Err(crate::error::SyncError::Config(
                    "accounts entries require non-empty name and origin".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_original_behavior() {
        let config = SyncConfig::default();
        assert!(!config.count_hard_hydration_errors);
        assert_eq!(config.timeline_fetch_limit, 200);
        assert_eq!(config.search_fetch_limit, 40);
        assert!(config.detail_progress);
    }

    #[test]
    fn load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("driftwood.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[sync]
count_hard_hydration_errors = true
timeline_fetch_limit = 50

[[accounts]]
name = "resident@beach.example"
origin = "beach.example"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(Some(&path)).unwrap();
        assert!(config.sync.count_hard_hydration_errors);
        assert_eq!(config.sync.timeline_fetch_limit, 50);
        assert_eq!(config.sync.search_fetch_limit, 40);
        assert_eq!(config.accounts.len(), 1);
        assert_eq!(
            config.accounts[0].to_account().origin,
            crate::data::Origin("beach.example".to_string())
        );
    }

    #[test]
    fn validate_rejects_zero_fetch_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("driftwood.toml");
        std::fs::write(&path, "[sync]\ntimeline_fetch_limit = 0\n").unwrap();

        let error = AppConfig::load_from(Some(&path)).unwrap_err();
        assert!(matches!(
            error,
            crate::error::SyncError::Config(message)
                if message.contains("timeline_fetch_limit")
        ));
    }
}

//! Layered configuration for the search proxy.
//!
//! Settings are loaded once at startup via [`load_settings`] and then held
//! behind a [`SettingsHandle`] so a future config-reload hook can swap the
//! active snapshot without restarting the process.

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, PerformanceConfig, RankingConfig, RuntimeEnvironment, SearchConfig, Settings,
    TokenizationConfig,
};

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Shared, hot-swappable settings snapshot.
///
/// Reads take the `parking_lot` read lock and clone the `Arc`, so readers
/// never block each other or a concurrent reload.
#[derive(Clone)]
pub struct SettingsHandle(Arc<RwLock<Arc<Settings>>>);

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self(Arc::new(RwLock::new(Arc::new(settings))))
    }

    pub fn current(&self) -> Arc<Settings> {
        self.0.read().clone()
    }

    /// Atomically replace the active snapshot, e.g. after a SIGHUP re-read.
    pub fn reload(&self, settings: Settings) {
        *self.0.write() = Arc::new(settings);
        tracing::info!("settings reloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_reload_replaces_snapshot() {
        let handle = SettingsHandle::new(Settings::default());
        assert_eq!(handle.current().search.max_concurrent_searches, 5);

        let mut updated = Settings::default();
        updated.search.max_concurrent_searches = 9;
        handle.reload(updated);

        assert_eq!(handle.current().search.max_concurrent_searches, 9);
    }
}

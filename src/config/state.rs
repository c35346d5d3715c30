// Application state module
// Composition root: every handler reaches its dependencies through here

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::Notify;

use super::types::Config;
use crate::db::Database;
use crate::error::Result;
use crate::http::CorsPolicy;
use crate::logger;
use crate::spa::StaticRoots;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Ordered static roots shared by the resolver and the fallback controller
    pub roots: StaticRoots,
    pub cors: CorsPolicy,
    pub db: Database,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,

    /// Notified once on SIGINT/SIGTERM
    pub shutdown: Arc<Notify>,
}

impl AppState {
    /// Wire configuration and an opened database into shared state
    ///
    /// Fails with a configuration error when no static root holds the SPA
    /// entry document, so a broken frontend deployment never starts serving.
    pub fn new(config: &Config, db: Database) -> Result<Self> {
        let roots = Self::static_roots(config)?;
        Ok(Self::with_roots(config, roots, db))
    }

    /// Build the ordered static roots and locate the SPA entry document
    ///
    /// Startup runs this before touching the database.
    pub fn static_roots(config: &Config) -> Result<StaticRoots> {
        let roots = StaticRoots::from_config(&config.static_files);
        let index = roots.require_index()?;
        logger::log_index_located(&index);
        Ok(roots)
    }

    pub fn with_roots(config: &Config, roots: StaticRoots, db: Database) -> Self {
        Self {
            config: config.clone(),
            roots,
            cors: CorsPolicy::from_config(&config.cors),
            db,
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
            shutdown: Arc::new(Notify::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn config_for(dir: &std::path::Path) -> Config {
        let mut config = Config::load_from("does-not-exist/config").expect("defaults");
        config.static_files.external_dir = Some(dir.display().to_string());
        config.static_files.bundled_dirs = Vec::new();
        config.database.path = dir.join("lar.db").display().to_string();
        config
    }

    #[test]
    fn test_missing_index_fails_before_any_database_exists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_for(dir.path());

        let err = AppState::static_roots(&config).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(!dir.path().join("lar.db").exists());
    }

    #[test]
    fn test_roots_then_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("index.html"), "<html>").expect("write");
        let config = config_for(dir.path());

        let roots = AppState::static_roots(&config).expect("roots");
        let state = AppState::with_roots(&config, roots, Database::open_in_memory().expect("db"));
        assert_eq!(
            state.roots.locate_index(),
            Some(dir.path().join("index.html"))
        );
    }
}

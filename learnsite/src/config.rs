//! Runtime settings for the site.

use std::path::PathBuf;

/// Connection, listener and media settings.
///
/// The binary fills this from flags and environment variables; tests
/// usually start from [`SiteConfig::in_memory()`].
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// SeaORM connection string (e.g., `"sqlite:./learnsite.db?mode=rwc"`).
    pub database_url: String,
    /// Socket address the HTTP server binds to.
    pub listen_addr: String,
    /// Directory served under `/media/`; `AppVariety::image` paths are relative to it.
    pub media_root: PathBuf,
}

impl SiteConfig {
    pub const DEFAULT_DATABASE_URL: &'static str = "sqlite:./learnsite.db?mode=rwc";
    pub const DEFAULT_LISTEN_ADDR: &'static str = "127.0.0.1:8000";
    pub const DEFAULT_MEDIA_ROOT: &'static str = "media";

    /// Settings backed by a throwaway in-memory SQLite database.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            ..Default::default()
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            database_url: Self::DEFAULT_DATABASE_URL.to_string(),
            listen_addr: Self::DEFAULT_LISTEN_ADDR.to_string(),
            media_root: PathBuf::from(Self::DEFAULT_MEDIA_ROOT),
        }
    }
}

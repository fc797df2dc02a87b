use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::constants::VERSION_CACHE_FILE;
use crate::core::UpgradeError;
use crate::upgrade::config::UpgradeConfig;
use crate::upgrade::registry::ReleaseRegistry;
use crate::upgrade::release::VersionTag;

/// Cached answer from the release registry.
///
/// Serialized to JSON at `<config_dir>/.version_cache`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCheckCache {
    /// The latest release tag reported by the registry.
    pub latest_version: VersionTag,
    /// The version that was running when this cache was written.
    pub current_version: VersionTag,
    /// UTC timestamp of the lookup.
    pub checked_at: DateTime<Utc>,
}

impl VersionCheckCache {
    /// Record a lookup made just now.
    #[must_use]
    pub fn new(current_version: VersionTag, latest_version: VersionTag) -> Self {
        Self {
            latest_version,
            current_version,
            checked_at: Utc::now(),
        }
    }

    /// Check if the cache is younger than `interval_seconds`.
    ///
    /// Entries stamped in the future (clock changes) are treated as stale.
    #[must_use]
    pub fn is_valid(&self, interval_seconds: u64) -> bool {
        let age = (Utc::now() - self.checked_at).num_seconds();
        age >= 0 && (age as u64) < interval_seconds
    }
}

/// Registry lookups with an on-disk cache, for the advisory startup check.
///
/// A cached answer is reused while it is younger than the configured interval
/// and was recorded by the same running version. An interval of zero turns
/// the cache off. A missing or unreadable cache is a miss, and a failure to
/// write it is logged and ignored.
#[derive(Debug, Clone)]
pub struct VersionChecker {
    cache_path: PathBuf,
    interval: u64,
}

impl VersionChecker {
    /// Checker caching at `cache_path` for `interval` seconds.
    pub fn new(cache_path: impl Into<PathBuf>, interval: u64) -> Self {
        Self {
            cache_path: cache_path.into(),
            interval,
        }
    }

    /// Checker caching inside `config_dir` per the `[upgrade]` settings.
    #[must_use]
    pub fn from_config(config_dir: &Path, config: &UpgradeConfig) -> Self {
        Self::new(config_dir.join(VERSION_CACHE_FILE), config.check_interval)
    }

    /// Location of the cache file.
    #[must_use]
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Latest release tag, from the cache when it is fresh.
    pub async fn latest(
        &self,
        registry: &ReleaseRegistry,
        current: &VersionTag,
    ) -> Result<VersionTag, UpgradeError> {
        if self.interval > 0
            && let Some(cache) = self.load_cache().await
            && cache.current_version == *current
            && cache.is_valid(self.interval)
        {
            debug!("Using cached latest version {}", cache.latest_version);
            return Ok(cache.latest_version);
        }

        let latest = registry.latest_version().await?;

        if self.interval > 0 {
            let cache = VersionCheckCache::new(current.clone(), latest.clone());
            if let Err(e) = self.save_cache(&cache).await {
                debug!("Could not save version cache: {e:#}");
            }
        }

        Ok(latest)
    }

    /// Load the version cache from disk, treating any failure as a miss.
    async fn load_cache(&self) -> Option<VersionCheckCache> {
        let content = match fs::read_to_string(&self.cache_path).await {
            Ok(content) => content,
            Err(e) => {
                debug!("No version cache at {}: {e}", self.cache_path.display());
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(cache) => Some(cache),
            Err(e) => {
                debug!("Ignoring corrupt version cache: {e}");
                None
            }
        }
    }

    /// Save the version cache to disk.
    async fn save_cache(&self, cache: &VersionCheckCache) -> Result<()> {
        let content =
            serde_json::to_string_pretty(cache).context("Failed to serialize version cache")?;

        // the directory belongs to `bashgpt config`; never create it here
        if let Some(parent) = self.cache_path.parent()
            && !parent.is_dir()
        {
            debug!("Not caching: {} does not exist", parent.display());
            return Ok(());
        }

        fs::write(&self.cache_path, content).await.context("Failed to write version cache")?;

        debug!("Saved version check to cache");
        Ok(())
    }

    /// Clear the version cache by removing the cache file.
    pub async fn clear_cache(&self) -> Result<()> {
        match fs::remove_file(&self.cache_path).await {
            Ok(()) => {
                debug!("Cleared version cache");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove version cache"),
        }
    }
}

//! User configuration stored at `<config_dir>/config.toml`.
//!
//! The file is optional; a missing file yields [`GlobalConfig::default`], and
//! missing keys inside an existing file fall back to their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::completion::CompletionConfig;
use crate::core::BashgptError;
use crate::upgrade::config::UpgradeConfig;

/// Global configuration for bashgpt.
///
/// # Example
///
/// ```toml
/// [upgrade]
/// check_on_startup = false
///
/// [completion]
/// model = "gpt-4o-mini"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Self-upgrade settings.
    #[serde(default)]
    pub upgrade: UpgradeConfig,

    /// Completion service settings.
    #[serde(default)]
    pub completion: CompletionConfig,
}

impl GlobalConfig {
    /// Load from `path`, or return defaults if there is no file there.
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load the configuration from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            BashgptError::Config {
                message: format!("Failed to parse config from {}: {e}", path.display()),
            }
            .into()
        })
    }
}

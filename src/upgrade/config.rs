use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_DOWNLOAD_BASE, DEFAULT_REPOSITORY,
};

/// Settings for the self-upgrade subsystem, stored under `[upgrade]`.
///
/// ```toml
/// [upgrade]
/// check_on_startup = true
/// check_interval = 86400
/// repository = "mikeb26/bashgpt"
/// api_base = "https://api.github.com"
/// download_base = "https://github.com"
/// ```
///
/// Every field has a default, so an empty or partial section is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeConfig {
    /// Whether ordinary commands warn when a newer release exists.
    #[serde(default = "default_check_on_startup")]
    pub check_on_startup: bool,

    /// Seconds a registry answer is reused by the startup check.
    ///
    /// `0` disables the cache and queries the registry on every invocation.
    /// The `upgrade` command itself always queries.
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,

    /// `owner/name` of the repository releases are published from.
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Base URL of the release registry API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Base URL release artifacts are downloaded from.
    #[serde(default = "default_download_base")]
    pub download_base: String,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            check_on_startup: default_check_on_startup(),
            check_interval: default_check_interval(),
            repository: default_repository(),
            api_base: default_api_base(),
            download_base: default_download_base(),
        }
    }
}

const fn default_check_on_startup() -> bool {
    true
}

const fn default_check_interval() -> u64 {
    DEFAULT_CHECK_INTERVAL_SECS
}

fn default_repository() -> String {
    DEFAULT_REPOSITORY.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_download_base() -> String {
    DEFAULT_DOWNLOAD_BASE.to_string()
}

//! Global constants used throughout the bashgpt codebase.
//!
//! Names, file locations, endpoints and timeouts shared by the CLI, the
//! completion client and the upgrade subsystem.

use std::time::Duration;

/// Name of the command as typed at the shell prompt.
pub const COMMAND_NAME: &str = "bashgpt";

/// File inside the config directory holding the OpenAI API key.
pub const KEY_FILE: &str = ".openai.key";

/// File inside the config directory holding the shell-integration script.
pub const AUTOCOMPLETE_SCRIPT: &str = "bashgpt_autocomplete.sh";

/// File inside the config directory holding user settings.
pub const CONFIG_FILE: &str = "config.toml";

/// File inside the config directory caching the last registry lookup.
pub const VERSION_CACHE_FILE: &str = ".version_cache";

/// Environment variable overriding the config directory location.
pub const CONFIG_DIR_ENV: &str = "BASHGPT_CONFIG_DIR";

/// Environment variable consulted when no key file has been written.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Embedded version of builds that were not produced by the release pipeline.
///
/// Upgrades are never attempted from a build carrying this version.
pub const DEV_VERSION: &str = "v0.devbuild";

/// Version identifier baked in at compile time.
///
/// Release builds set `BASHGPT_RELEASE_VERSION` to the tag being published.
pub const EMBEDDED_VERSION: &str = match option_env!("BASHGPT_RELEASE_VERSION") {
    Some(version) => version,
    None => DEV_VERSION,
};

/// GitHub repository (`owner/name`) releases are published from.
pub const DEFAULT_REPOSITORY: &str = "mikeb26/bashgpt";

/// Base URL of the release registry API.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Base URL release artifacts are downloaded from.
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://github.com";

/// Base URL of the chat completion service.
pub const DEFAULT_COMPLETION_BASE: &str = "https://api.openai.com/v1";

/// Model used for command suggestions.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Timeout applied to every network request (30 seconds).
///
/// This is the only cancellation mechanism for lookups and downloads.
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(30);

/// Default lifetime of a cached registry lookup (24 hours).
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 86_400;

/// Suffix appended to the executable path while an install is in flight.
pub const BACKUP_SUFFIX: &str = ".bak";

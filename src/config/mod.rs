//! Configuration management for bashgpt
//!
//! Everything bashgpt persists lives in one directory, `~/.config/bashgpt`
//! unless `BASHGPT_CONFIG_DIR` points elsewhere:
//!
//! - `config.toml` - optional settings, see [`GlobalConfig`]
//! - `.openai.key` - the API key written by `bashgpt config` (mode 0600)
//! - `bashgpt_autocomplete.sh` - the shell-integration script
//! - `.version_cache` - the last registry answer used by the startup check

mod global;

pub use global::GlobalConfig;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::constants::{API_KEY_ENV, COMMAND_NAME, CONFIG_DIR_ENV, KEY_FILE};
use crate::core::BashgptError;

/// Directory holding all bashgpt state.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let home = dirs::home_dir().ok_or(BashgptError::HomeDirNotFound)?;
    Ok(home.join(".config").join(COMMAND_NAME))
}

/// Create the config directory (mode 0700 on unix) if it is missing.
pub async fn ensure_config_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Could not create config directory {}", dir.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))
            .await
            .with_context(|| format!("Failed to set permissions on {}", dir.display()))?;
    }

    Ok(())
}

/// Write the API key to `<dir>/.openai.key` with owner-only permissions.
pub async fn save_api_key(dir: &Path, key: &str) -> Result<PathBuf> {
    let key_path = dir.join(KEY_FILE);

    fs::write(&key_path, key.trim())
        .await
        .with_context(|| format!("Could not write OpenAI API key file {}", key_path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(&key_path, std::fs::Permissions::from_mode(0o600))
            .await
            .with_context(|| format!("Failed to set permissions on {}", key_path.display()))?;
    }

    Ok(key_path)
}

/// Load the API key from `<dir>/.openai.key`, falling back to `OPENAI_API_KEY`.
pub async fn load_api_key(dir: &Path) -> Result<String> {
    let key_path = dir.join(KEY_FILE);

    match fs::read_to_string(&key_path).await {
        Ok(key) if !key.trim().is_empty() => return Ok(key.trim().to_string()),
        Ok(_) => debug!("Key file {} is empty", key_path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No key file at {}", key_path.display());
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Could not load OpenAI API key from {}", key_path.display())
            });
        }
    }

    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => {
            debug!("Using API key from {API_KEY_ENV}");
            Ok(key.trim().to_string())
        }
        _ => Err(BashgptError::KeyNotConfigured {
            command: COMMAND_NAME.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_config_dir_override() {
        let temp = TempDir::new().unwrap();
        unsafe {
            std::env::set_var(CONFIG_DIR_ENV, temp.path());
        }
        let dir = config_dir().unwrap();
        unsafe {
            std::env::remove_var(CONFIG_DIR_ENV);
        }
        assert_eq!(dir, temp.path());
    }

    #[test]
    #[serial]
    fn test_config_dir_default_under_home() {
        unsafe {
            std::env::remove_var(CONFIG_DIR_ENV);
        }
        if let Ok(dir) = config_dir() {
            assert!(dir.ends_with(".config/bashgpt"));
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_key_round_trip_and_trim() {
        let temp = TempDir::new().unwrap();
        let path = save_api_key(temp.path(), "  sk-test\n").await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "sk-test");
        assert_eq!(load_api_key(temp.path()).await.unwrap(), "sk-test");
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_key_falls_back_to_env() {
        let temp = TempDir::new().unwrap();
        unsafe {
            std::env::set_var(API_KEY_ENV, "sk-env");
        }
        let key = load_api_key(temp.path()).await;
        unsafe {
            std::env::remove_var(API_KEY_ENV);
        }
        assert_eq!(key.unwrap(), "sk-env");
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_key_is_reported() {
        let temp = TempDir::new().unwrap();
        unsafe {
            std::env::remove_var(API_KEY_ENV);
        }
        let err = load_api_key(temp.path()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BashgptError>(),
            Some(BashgptError::KeyNotConfigured { .. })
        ));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("bashgpt");

        ensure_config_dir(&dir).await.unwrap();
        let key_path = save_api_key(&dir, "sk-test").await.unwrap();

        let dir_mode = std::fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        let key_mode = std::fs::metadata(&key_path).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
        assert_eq!(key_mode, 0o600);
    }
}

//! The bash integration script shipped inside the binary.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{AUTOCOMPLETE_SCRIPT, COMMAND_NAME};
use crate::utils::fs::atomic_write;

/// Script text, as of this build.
pub const AUTOCOMPLETE_SCRIPT_TEXT: &str = include_str!("bashgpt_autocomplete.sh");

/// Make sure `<config_dir>/bashgpt_autocomplete.sh` matches this build.
///
/// Returns `true` when the script was (re)written. A missing config directory
/// is created.
pub fn ensure_latest_script(config_dir: &Path) -> Result<bool> {
    let script_path = script_path(config_dir);

    if let Ok(existing) = std::fs::read_to_string(&script_path)
        && existing == AUTOCOMPLETE_SCRIPT_TEXT
    {
        debug!("{} is up to date", script_path.display());
        return Ok(false);
    }

    atomic_write(&script_path, AUTOCOMPLETE_SCRIPT_TEXT.as_bytes(), 0o755)
        .with_context(|| format!("Could not update script {}", script_path.display()))?;
    debug!("Wrote {}", script_path.display());
    Ok(true)
}

/// Location of the script inside `config_dir`.
#[must_use]
pub fn script_path(config_dir: &Path) -> PathBuf {
    config_dir.join(AUTOCOMPLETE_SCRIPT)
}

/// Lines to add to `.bashrc` so the script is sourced.
#[must_use]
pub fn bashrc_snippet() -> String {
    format!(
        "  if [ -f ~/.config/{COMMAND_NAME}/{AUTOCOMPLETE_SCRIPT} ]; then\n      . ~/.config/{COMMAND_NAME}/{AUTOCOMPLETE_SCRIPT}\n  fi\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_script_written_once() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("bashgpt");

        assert!(ensure_latest_script(&dir).unwrap());
        assert!(!ensure_latest_script(&dir).unwrap());
        assert_eq!(std::fs::read_to_string(script_path(&dir)).unwrap(), AUTOCOMPLETE_SCRIPT_TEXT);
    }

    #[test]
    fn test_stale_script_replaced() {
        let temp = TempDir::new().unwrap();
        std::fs::write(script_path(temp.path()), "# old version\n").unwrap();

        assert!(ensure_latest_script(temp.path()).unwrap());
        assert_eq!(
            std::fs::read_to_string(script_path(temp.path())).unwrap(),
            AUTOCOMPLETE_SCRIPT_TEXT
        );

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode =
                std::fs::metadata(script_path(temp.path())).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o755);
        }
    }

    #[test]
    fn test_script_registers_completion() {
        assert!(AUTOCOMPLETE_SCRIPT_TEXT.contains("complete -o nospace -F _bashgpt_complete bashgpt"));
        assert!(bashrc_snippet().contains(". ~/.config/bashgpt/bashgpt_autocomplete.sh"));
    }
}

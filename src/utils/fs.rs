//! File system helpers shared by the installer and the script installer.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append `suffix` to the full file name of `path`.
///
/// Unlike [`Path::with_extension`], an existing extension is kept:
/// `/usr/bin/tool.exe` becomes `/usr/bin/tool.exe.bak`.
#[must_use]
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Write `content` to `path`, set `mode` (unix) and sync to disk.
///
/// The file is created or truncated. The mode is applied after the write so
/// the process umask cannot narrow it.
pub fn write_with_mode(path: &Path, content: &[u8], mode: u32) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    file.sync_all()
}

/// Replace `path` with `content` through a sibling temporary file.
///
/// Readers see either the old file or the complete new one.
pub fn atomic_write(path: &Path, content: &[u8], mode: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let temp_path = with_suffix(path, ".tmp");
    write_with_mode(&temp_path, content, mode)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

    fs::rename(&temp_path, path).with_context(|| {
        let _ = fs::remove_file(&temp_path);
        format!("Failed to rename {} to {}", temp_path.display(), path.display())
    })
}

//! Replacement of the running executable.
//!
//! The install is a backup-and-swap on the executable path `P`:
//!
//! ```text
//! P ──rename──▶ P.bak            Original → BackedUp
//! artifact ──rename──▶ P         BackedUp → Replaced
//!   └─ cross-device: copy bytes into P (0755, synced), delete artifact
//! failure: P.bak ──rename──▶ P   BackedUp → RolledBack, or Degraded if this fails
//! success: delete P.bak          (best effort)
//! ```
//!
//! At every point the previous binary is at `P` or `P.bak`, or the new one is
//! complete at `P`. The only state that breaks this is [`InstallState::Degraded`],
//! which is reported as [`UpgradeError::Degraded`] so the caller can tell the
//! operator how to restore `P.bak` by hand.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::constants::BACKUP_SUFFIX;
use crate::core::UpgradeError;
use crate::upgrade::release::VersionTag;
use crate::utils::fs::{with_suffix, write_with_mode};

/// File system primitives used by the installer.
///
/// Production code uses [`StdFileOps`]; tests substitute implementations that
/// fail or observe individual steps.
pub trait FileOps {
    /// Rename `from` to `to`, replacing `to` if it exists.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Write the contents of `from` to `to` as an executable and sync it.
    fn copy_executable(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Delete a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// [`FileOps`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileOps;

impl FileOps for StdFileOps {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn copy_executable(&self, from: &Path, to: &Path) -> io::Result<()> {
        let content = fs::read(from)?;
        write_with_mode(to, &content, 0o755)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// `EXDEV` on Linux and macOS.
const EXDEV: i32 = 18;

fn is_cross_device(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::CrossesDevices
        || (cfg!(unix) && error.raw_os_error() == Some(EXDEV))
}

/// Where an install attempt ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    /// Nothing has been touched.
    Original,
    /// The previous binary has been moved to `P.bak`.
    BackedUp,
    /// The new binary is at `P`.
    Replaced,
    /// The new binary could not be placed; the previous one is back at `P`.
    RolledBack,
    /// `P` is missing and the previous binary is stranded at `P.bak`.
    Degraded,
}

impl InstallState {
    /// State an install was left in when it failed with `error`.
    #[must_use]
    pub const fn after(error: &UpgradeError) -> Self {
        match error {
            UpgradeError::Install { .. } => Self::RolledBack,
            UpgradeError::Degraded { .. } => Self::Degraded,
            _ => Self::Original,
        }
    }
}

/// How the new binary reached the executable path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    /// Renamed into place on the same file system.
    Renamed,
    /// Copied across file systems.
    Copied,
}

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Executable path that now holds the new binary
    pub path: PathBuf,
    /// Version that was installed
    pub version: VersionTag,
    /// How the binary was put in place
    pub method: InstallMethod,
    /// Backup that could not be deleted, if any
    pub stray_backup: Option<PathBuf>,
    /// Downloaded artifact that could not be deleted after a copy, if any
    pub stray_artifact: Option<PathBuf>,
}

/// Swaps a downloaded binary in for the installed one.
#[derive(Debug, Clone, Default)]
pub struct AtomicInstaller<F: FileOps = StdFileOps> {
    ops: F,
    target: Option<PathBuf>,
}

impl AtomicInstaller {
    /// Installer replacing the running executable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: FileOps> AtomicInstaller<F> {
    /// Installer using custom file operations.
    #[must_use]
    pub const fn with_ops(ops: F) -> Self {
        Self { ops, target: None }
    }

    /// Replace `target` instead of the running executable.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Canonical path of the binary that will be replaced.
    pub fn resolve_target(&self) -> Result<PathBuf, UpgradeError> {
        let path = match &self.target {
            Some(path) => path.clone(),
            None => std::env::current_exe()
                .map_err(|e| UpgradeError::io("locate", PathBuf::from("current executable"), e))?,
        };

        path.canonicalize().map_err(|e| UpgradeError::io("resolve", path, e))
    }

    /// Install `artifact` as `version` in place of the target binary.
    ///
    /// On success the artifact has been moved (or copied and deleted) and the
    /// backup removed. Leftovers that could not be deleted are logged and
    /// listed in the report; they do not fail the install.
    pub fn install(&self, artifact: &Path, version: &VersionTag) -> Result<InstallReport, UpgradeError> {
        let path = self.resolve_target()?;
        let backup = with_suffix(&path, BACKUP_SUFFIX);
        let mut state = InstallState::Original;
        debug!("Installing {version} at {} ({state:?})", path.display());

        self.ops.rename(&path, &backup).map_err(|source| UpgradeError::Permission {
            path: path.clone(),
            backup: backup.clone(),
            source,
        })?;
        state = InstallState::BackedUp;
        debug!("Moved {} to {} ({state:?})", path.display(), backup.display());

        let method = match self.place(artifact, &path) {
            Ok(method) => method,
            Err(cause) => return Err(self.roll_back(path, backup, version, cause)),
        };
        state = InstallState::Replaced;
        info!("Installed {version} at {} via {method:?} ({state:?})", path.display());

        let stray_artifact = match method {
            InstallMethod::Copied => self.remove_leftover(artifact, "downloaded artifact"),
            InstallMethod::Renamed => None,
        };
        let stray_backup = self.remove_leftover(&backup, "backup");

        Ok(InstallReport {
            path,
            version: version.clone(),
            method,
            stray_backup,
            stray_artifact,
        })
    }

    fn place(&self, artifact: &Path, path: &Path) -> io::Result<InstallMethod> {
        match self.ops.rename(artifact, path) {
            Ok(()) => Ok(InstallMethod::Renamed),
            Err(e) if is_cross_device(&e) => {
                debug!("{} is on another file system, copying instead", artifact.display());
                self.ops.copy_executable(artifact, path)?;
                Ok(InstallMethod::Copied)
            }
            Err(e) => Err(e),
        }
    }

    fn roll_back(
        &self,
        path: PathBuf,
        backup: PathBuf,
        version: &VersionTag,
        source: io::Error,
    ) -> UpgradeError {
        warn!("Could not install {version} at {}: {source}; restoring backup", path.display());

        match self.ops.rename(&backup, &path) {
            Ok(()) => {
                info!("Restored {} ({:?})", path.display(), InstallState::RolledBack);
                UpgradeError::Install {
                    path,
                    version: version.clone(),
                    source,
                }
            }
            Err(rollback) => {
                tracing::error!(
                    "Restoring {} from {} failed: {rollback} ({:?})",
                    path.display(),
                    backup.display(),
                    InstallState::Degraded
                );
                UpgradeError::Degraded {
                    path,
                    backup,
                    version: version.clone(),
                    source,
                    rollback,
                }
            }
        }
    }

    fn remove_leftover(&self, path: &Path, what: &str) -> Option<PathBuf> {
        match self.ops.remove_file(path) {
            Ok(()) => None,
            Err(e) => {
                warn!("Could not remove {what} {}: {e}", path.display());
                Some(path.to_path_buf())
            }
        }
    }
}

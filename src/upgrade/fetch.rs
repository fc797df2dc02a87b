//! Download of release artifacts into temporary files.

use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::{debug, info};

use crate::core::UpgradeError;
use crate::upgrade::release::{ReleaseDescriptor, VersionTag};

/// A downloaded release binary waiting to be installed.
///
/// The file is executable and fully synced. Dropping the artifact deletes the
/// temporary file if it is still where the fetcher left it, so a failed
/// upgrade does not leave downloads behind.
#[derive(Debug)]
pub struct DownloadedArtifact {
    path: TempPath,
    tag: VersionTag,
    size: u64,
}

impl DownloadedArtifact {
    /// Location of the temporary file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the artifact belongs to.
    #[must_use]
    pub const fn tag(&self) -> &VersionTag {
        &self.tag
    }

    /// Payload size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }
}

/// Fetches release binaries over HTTP.
#[derive(Debug, Clone)]
pub struct ArtifactFetcher {
    client: Client,
    temp_dir: Option<PathBuf>,
}

impl ArtifactFetcher {
    /// Fetcher writing into the system temporary directory.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self {
            client,
            temp_dir: None,
        }
    }

    /// Write downloads into `dir` instead of the system temporary directory.
    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Download the binary of `release`.
    pub async fn fetch(&self, release: &ReleaseDescriptor) -> Result<DownloadedArtifact, UpgradeError> {
        let url = &release.download_url;
        info!("Downloading {} from {url}", release.tag);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| UpgradeError::Network {
                url: url.clone(),
                source,
            })?;

        let payload = response.bytes().await.map_err(|source| UpgradeError::Network {
            url: url.clone(),
            source,
        })?;

        if payload.is_empty() {
            return Err(UpgradeError::EmptyArtifact { url: url.clone() });
        }

        let path = self.write_temp(&payload)?;
        debug!("Wrote {} bytes to {}", payload.len(), path.display());

        Ok(DownloadedArtifact {
            path,
            tag: release.tag.clone(),
            size: payload.len() as u64,
        })
    }

    fn write_temp(&self, payload: &[u8]) -> Result<TempPath, UpgradeError> {
        let dir = self.temp_dir.clone().unwrap_or_else(std::env::temp_dir);

        let mut file = tempfile::Builder::new()
            .prefix("bashgpt-")
            .tempfile_in(&dir)
            .map_err(|e| UpgradeError::io("create temporary file in", &dir, e))?;

        file.write_all(payload).map_err(|e| UpgradeError::io("write", file.path(), e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            file.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o755))
                .map_err(|e| UpgradeError::io("set permissions on", file.path(), e))?;
        }

        file.as_file().sync_all().map_err(|e| UpgradeError::io("sync", file.path(), e))?;

        Ok(file.into_temp_path())
    }
}

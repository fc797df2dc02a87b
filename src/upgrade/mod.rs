//! Self-update functionality for bashgpt.
//!
//! bashgpt replaces its own executable with the newest GitHub release. The
//! work is split into small pieces that the [`Upgrader`] strings together:
//!
//! ```text
//! 1. Version lookup      ReleaseRegistry::latest_version
//!    └── equal to the embedded version? done
//! 2. Confirmation        Confirm (terminal prompt, default yes)
//! 3. Download            ArtifactFetcher::fetch → temp file, 0755, synced
//! 4. Install             AtomicInstaller::install
//!    ├── P → P.bak
//!    ├── artifact → P   (copy if on another file system)
//!    ├── on failure: P.bak → P
//!    └── on success: delete P.bak
//! ```
//!
//! Development builds (embedded version `v0.devbuild`) never look anything
//! up. Ordinary commands call [`Upgrader::check_for_upgrade`], which only
//! warns and consults a cache ([`VersionChecker`]) so the registry is not
//! queried on every invocation.
//!
//! # Example
//!
//! ```rust,no_run
//! use bashgpt::upgrade::{BuildInfo, TerminalConfirm, UpgradeOutcome, Upgrader, http_client};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let build = BuildInfo::current();
//! let client = http_client(&build)?;
//! let mut upgrader = Upgrader::new(build, client, TerminalConfirm);
//! match upgrader.run_upgrade().await? {
//!     UpgradeOutcome::Upgraded(report) => println!("Installed {}", report.version),
//!     other => println!("{other:?}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod fetch;
pub mod installer;
pub mod orchestrator;
pub mod registry;
pub mod release;
pub mod version_check;


pub use fetch::{ArtifactFetcher, DownloadedArtifact};
pub use installer::{
    AtomicInstaller, FileOps, InstallMethod, InstallReport, InstallState, StdFileOps,
};
pub use orchestrator::{AssumeYes, Confirm, TerminalConfirm, UpgradeOutcome, Upgrader};
pub use registry::ReleaseRegistry;
pub use release::{BuildInfo, ReleaseDescriptor, ReleaseEndpoints, VersionTag};
pub use version_check::VersionChecker;

use crate::constants::NETWORK_TIMEOUT;

/// HTTP client for registry lookups and downloads.
///
/// Every request is bounded by the 30 second network timeout and identifies
/// itself as `<command>/<version>`.
pub fn http_client(build: &BuildInfo) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(NETWORK_TIMEOUT)
        .user_agent(format!("{}/{}", build.command_name, build.version))
        .build()
}

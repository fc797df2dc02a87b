//! The upgrade workflow: look up, confirm, fetch, install.

use std::io::{self, BufRead, Write};
use tracing::{debug, info};

use crate::core::UpgradeError;
use crate::upgrade::fetch::ArtifactFetcher;
use crate::upgrade::installer::{AtomicInstaller, FileOps, InstallReport, StdFileOps};
use crate::upgrade::registry::ReleaseRegistry;
use crate::upgrade::release::{BuildInfo, VersionTag};
use crate::upgrade::version_check::VersionChecker;

/// Source of the user's answer to the upgrade question.
pub trait Confirm {
    /// Ask `question`; `Ok(true)` means go ahead.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Asks on stdout and reads one line from stdin. Defaults to yes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question}")?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(parse_answer(&answer))
    }
}

/// Accepts without asking, for `upgrade --yes`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        debug!("Assuming yes: {}", question.trim_end());
        Ok(true)
    }
}

/// Interpret a typed answer. Blank input (including EOF) means yes.
#[must_use]
pub fn parse_answer(answer: &str) -> bool {
    answer.trim_start().chars().next().is_none_or(|c| c.eq_ignore_ascii_case(&'y'))
}

/// How an upgrade run ended, short of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// This binary is a development build; nothing was looked up.
    DevBuild,
    /// The registry reports the running version.
    UpToDate {
        /// The running, and latest, version
        version: VersionTag,
    },
    /// A newer release exists but the user said no.
    Declined {
        /// The release that was offered
        latest: VersionTag,
    },
    /// The new release is installed.
    Upgraded(InstallReport),
}

/// Drives an upgrade of the running binary.
pub struct Upgrader<C: Confirm, F: FileOps = StdFileOps> {
    build: BuildInfo,
    registry: ReleaseRegistry,
    fetcher: ArtifactFetcher,
    installer: AtomicInstaller<F>,
    confirm: C,
    version_checker: Option<VersionChecker>,
}

impl<C: Confirm> Upgrader<C> {
    /// Upgrader for `build`, replacing the running executable.
    ///
    /// `client` is used for both the lookup and the download and should
    /// carry the network timeout.
    pub fn new(build: BuildInfo, client: reqwest::Client, confirm: C) -> Self {
        Self {
            registry: ReleaseRegistry::new(client.clone(), build.endpoints.clone()),
            fetcher: ArtifactFetcher::new(client),
            installer: AtomicInstaller::new(),
            build,
            confirm,
            version_checker: None,
        }
    }
}

impl<C: Confirm, F: FileOps> Upgrader<C, F> {
    /// Use a different installer (target path or file operations).
    pub fn with_installer<G: FileOps>(self, installer: AtomicInstaller<G>) -> Upgrader<C, G> {
        Upgrader {
            build: self.build,
            registry: self.registry,
            fetcher: self.fetcher,
            installer,
            confirm: self.confirm,
            version_checker: self.version_checker,
        }
    }

    /// Use a different fetcher.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: ArtifactFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Cache startup checks, and clear the cache after an upgrade.
    #[must_use]
    pub fn with_version_checker(mut self, checker: VersionChecker) -> Self {
        self.version_checker = Some(checker);
        self
    }

    /// The build being upgraded.
    pub const fn build(&self) -> &BuildInfo {
        &self.build
    }

    /// Run the interactive upgrade.
    ///
    /// Every failure is returned as is; nothing is retried. When the error is
    /// [`UpgradeError::Degraded`] the executable is missing and the caller
    /// must surface the recovery instructions.
    pub async fn run_upgrade(&mut self) -> Result<UpgradeOutcome, UpgradeError> {
        if self.build.is_dev_build() {
            info!("Skipping upgrade of development build {}", self.build.version);
            return Ok(UpgradeOutcome::DevBuild);
        }

        let latest = self.registry.latest_version().await?;
        if latest == self.build.version {
            debug!("Already on {latest}");
            return Ok(UpgradeOutcome::UpToDate { version: latest });
        }

        let question = format!(
            "A new version of {} is available ({latest}). Upgrade? (Y/N) [Y]: ",
            self.build.command_name
        );
        let accepted = self
            .confirm
            .confirm(&question)
            .map_err(|source| UpgradeError::Prompt { source })?;
        if !accepted {
            info!("Upgrade to {latest} declined");
            return Ok(UpgradeOutcome::Declined { latest });
        }

        let release = self.registry.descriptor_for(latest);
        let artifact = self.fetcher.fetch(&release).await?;
        debug!("Fetched {} ({} bytes)", artifact.tag(), artifact.size());

        let report = self.installer.install(artifact.path(), &release.tag)?;

        if let Some(checker) = &self.version_checker
            && let Err(e) = checker.clear_cache().await
        {
            debug!("Could not clear version cache: {e:#}");
        }

        Ok(UpgradeOutcome::Upgraded(report))
    }

    /// Latest release if it differs from the running version.
    ///
    /// Development builds return `None` without a lookup. Always queries the
    /// registry; the cache is only for [`check_for_upgrade`](Self::check_for_upgrade).
    pub async fn check_now(&self) -> Result<Option<VersionTag>, UpgradeError> {
        if self.build.is_dev_build() {
            return Ok(None);
        }

        let latest = self.registry.latest_version().await?;
        Ok((latest != self.build.version).then_some(latest))
    }

    /// Advisory check run before ordinary commands.
    ///
    /// Prints a warning to stderr and returns `true` when a different release
    /// is published. Never prompts and never fails: lookup errors are logged
    /// at debug level and reported as `false`.
    pub async fn check_for_upgrade(&self) -> bool {
        if self.build.is_dev_build() {
            return false;
        }

        let latest = match &self.version_checker {
            Some(checker) => checker.latest(&self.registry, &self.build.version).await,
            None => self.registry.latest_version().await,
        };

        match latest {
            Ok(latest) if latest != self.build.version => {
                eprint!(
                    "*WARN*: A new version of {name} is available ({latest}). Please upgrade via '{name} upgrade'.\n\n",
                    name = self.build.command_name
                );
                true
            }
            Ok(_) => false,
            Err(e) => {
                debug!("Upgrade check failed: {e}");
                false
            }
        }
    }
}

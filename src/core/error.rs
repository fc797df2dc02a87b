//! Error handling for bashgpt
//!
//! Errors are split the same way the rest of the crate is:
//!
//! - [`UpgradeError`] covers the self-upgrade subsystem. Every variant carries
//!   the path or URL that was being worked on (and the version, where one
//!   applies) plus the underlying cause, and maps onto an
//!   [`UpgradeErrorKind`] so callers can branch on the failure class without
//!   matching on fields.
//! - [`BashgptError`] covers the collaborators (key setup, completion call,
//!   configuration).
//! - [`ErrorContext`] wraps either one with user-facing details and a
//!   suggestion, and knows how to print itself. [`user_friendly_error`]
//!   builds one from whatever `anyhow::Error` reached `main`.
//!
//! A [`UpgradeErrorKind::Degraded`] failure means the executable is gone from
//! its path and must be restored by hand; it is rendered with its own banner
//! so it cannot be mistaken for an ordinary failed upgrade.

use crate::upgrade::VersionTag;
use colored::Colorize;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure class of an [`UpgradeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeErrorKind {
    /// Timeout, connection failure or bad HTTP status on lookup or download.
    Network,
    /// The registry answered with something that is not a release document.
    Parse,
    /// Local filesystem failure outside the install swap itself.
    Io,
    /// The installed binary could not be moved aside. Nothing was changed.
    Permission,
    /// Moving the new binary into place failed; the original was restored.
    Install,
    /// Moving the new binary into place failed and so did the restore.
    Degraded,
}

impl fmt::Display for UpgradeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Parse => "parse",
            Self::Io => "io",
            Self::Permission => "permission",
            Self::Install => "install",
            Self::Degraded => "degraded",
        };
        f.write_str(name)
    }
}

/// Errors produced while looking up, downloading or installing a release.
#[derive(Error, Debug)]
pub enum UpgradeError {
    /// A request to the registry or the download host failed.
    #[error("Request to {url} failed")]
    Network {
        /// URL that was requested
        url: String,
        /// Transport, timeout or status error
        #[source]
        source: reqwest::Error,
    },

    /// The download completed but carried no bytes.
    #[error("Download of {url} returned an empty payload")]
    EmptyArtifact {
        /// URL that was requested
        url: String,
    },

    /// The registry response could not be interpreted.
    #[error("Could not parse release information from {url}: {reason}")]
    Parse {
        /// URL whose body was parsed
        url: String,
        /// What was wrong with the body
        reason: String,
    },

    /// A local filesystem operation failed.
    #[error("Failed to {operation} {}", .path.display())]
    Io {
        /// Short verb phrase describing the operation
        operation: &'static str,
        /// Path the operation targeted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reading the user's answer to the upgrade prompt failed.
    #[error("Failed to read confirmation from the terminal")]
    Prompt {
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The running binary could not be renamed to its backup path.
    #[error("Could not replace existing {}; do you need to be root?", .path.display())]
    Permission {
        /// Installed binary
        path: PathBuf,
        /// Backup path the rename targeted
        backup: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The new binary could not be moved into place; the original was restored.
    #[error("Could not install {version} at {}; the previous binary was restored", .path.display())]
    Install {
        /// Installed binary
        path: PathBuf,
        /// Version that was being installed
        version: VersionTag,
        /// Why the new binary could not be put in place
        #[source]
        source: io::Error,
    },

    /// The new binary could not be moved into place and the restore failed.
    #[error(
        "Could not install {version} at {} and restoring {} failed: {rollback}",
        .path.display(),
        .backup.display()
    )]
    Degraded {
        /// Installed binary, now missing
        path: PathBuf,
        /// Backup still holding the previous binary
        backup: PathBuf,
        /// Version that was being installed
        version: VersionTag,
        /// Why the new binary could not be put in place
        #[source]
        source: io::Error,
        /// Why the backup could not be renamed back
        rollback: io::Error,
    },
}

impl UpgradeError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> UpgradeErrorKind {
        match self {
            Self::Network { .. } | Self::EmptyArtifact { .. } => UpgradeErrorKind::Network,
            Self::Parse { .. } => UpgradeErrorKind::Parse,
            Self::Io { .. } | Self::Prompt { .. } => UpgradeErrorKind::Io,
            Self::Permission { .. } => UpgradeErrorKind::Permission,
            Self::Install { .. } => UpgradeErrorKind::Install,
            Self::Degraded { .. } => UpgradeErrorKind::Degraded,
        }
    }

    /// Whether the executable was left missing and needs manual recovery.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Errors from the parts of bashgpt outside the upgrade subsystem.
#[derive(Error, Debug)]
pub enum BashgptError {
    /// No API key file and no key in the environment.
    #[error("Could not load OpenAI API key: run `{command} config` to configure")]
    KeyNotConfigured {
        /// Command name to suggest
        command: String,
    },

    /// The home directory could not be determined.
    #[error("Could not find user home directory")]
    HomeDirNotFound,

    /// The completion service rejected or failed the request.
    #[error("Completion request failed: {reason}")]
    Completion {
        /// Status or transport failure
        reason: String,
    },

    /// The completion service returned an unexpected number of answers.
    #[error("Expected 1 response, got {count}")]
    UnexpectedChoices {
        /// Number of choices returned
        count: usize,
    },

    /// The configuration file could not be read or written.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },
}

/// How loudly an [`ErrorContext`] should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The command failed; state is consistent.
    Error,
    /// The command failed and left the installation needing manual repair.
    Fatal,
}

/// An error bundled with user-facing details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error, with its cause chain
    pub error: anyhow::Error,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
    /// Rendering severity
    pub severity: Severity,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
            details: None,
            severity: Severity::Error,
        }
    }

    /// Add a suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Mark the error as requiring manual intervention.
    #[must_use]
    pub const fn fatal(mut self) -> Self {
        self.severity = Severity::Fatal;
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        if self.severity == Severity::Fatal {
            let rule = "=".repeat(72);
            eprintln!("{}", rule.red().bold());
            eprintln!(
                "{} {}",
                "FATAL:".red().bold(),
                "the upgrade failed and the previous binary could not be restored".bold()
            );
            eprintln!("{}", "Manual recovery is required before this command can run again.".red());
            eprintln!("{}", rule.red().bold());
        }

        eprintln!("{}: {:#}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.severity == Severity::Fatal {
            write!(f, "FATAL: ")?;
        }
        write!(f, "{:#}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error that reached the top level into a printable context.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let hints = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<UpgradeError>())
        .map(upgrade_hints)
        .or_else(|| error.downcast_ref::<BashgptError>().map(app_hints))
        .or_else(|| error.downcast_ref::<io::Error>().and_then(io_hints))
        .unwrap_or_default();

    let degraded = error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<UpgradeError>())
        .any(UpgradeError::is_degraded);

    let mut context = ErrorContext::new(error);
    if let Some(details) = hints.details {
        context = context.with_details(details);
    }
    if let Some(suggestion) = hints.suggestion {
        context = context.with_suggestion(suggestion);
    }
    if degraded {
        context = context.fatal();
    }
    context
}

#[derive(Default)]
struct Hints {
    details: Option<String>,
    suggestion: Option<String>,
}

impl Hints {
    fn suggest(suggestion: impl Into<String>) -> Self {
        Self {
            suggestion: Some(suggestion.into()),
            ..Self::default()
        }
    }
}

fn upgrade_hints(upgrade: &UpgradeError) -> Hints {
    match upgrade {
        UpgradeError::Degraded { path, backup, .. } => Hints {
            details: Some(format!(
                "No executable is present at {}; the previous binary is at {}",
                path.display(),
                backup.display()
            )),
            suggestion: Some(format!(
                "Restore it manually: mv '{}' '{}'",
                backup.display(),
                path.display()
            )),
        },
        UpgradeError::Permission { path, .. } => {
            let dir = path.parent().unwrap_or(path);
            Hints::suggest(format!(
                "Re-run with write access to {}, e.g. `sudo bashgpt upgrade`",
                dir.display()
            ))
        }
        UpgradeError::Install { .. } => Hints {
            details: Some("The previous binary is still installed and working".to_string()),
            ..Hints::default()
        },
        UpgradeError::Network { .. } | UpgradeError::EmptyArtifact { .. } => {
            Hints::suggest("Check your network connection and retry")
        }
        UpgradeError::Parse { .. } | UpgradeError::Io { .. } | UpgradeError::Prompt { .. } => {
            Hints::default()
        }
    }
}

fn app_hints(error: &BashgptError) -> Hints {
    match error {
        BashgptError::KeyNotConfigured { .. } => {
            Hints::suggest("Alternatively export OPENAI_API_KEY in your shell profile")
        }
        BashgptError::Completion { .. } | BashgptError::UnexpectedChoices { .. } => {
            Hints::suggest("Check your API key and network connection, then retry")
        }
        BashgptError::HomeDirNotFound => {
            Hints::suggest("Set HOME or BASHGPT_CONFIG_DIR to a writable directory")
        }
        BashgptError::Config { .. } => Hints::default(),
    }
}

fn io_hints(error: &io::Error) -> Option<Hints> {
    (error.kind() == io::ErrorKind::PermissionDenied).then(|| {
        Hints::suggest("Try running with elevated permissions (sudo) or check file ownership")
    })
}

//! Command-line interface for bashgpt.
//!
//! ```text
//! bashgpt config                      store the OpenAI API key, install the bash script
//! bashgpt sh <query>                  print a command for <query>
//! bashgpt sh <query> -- <command>     run a command suggested earlier
//! bashgpt upgrade [--yes] [--check]   replace this binary with the latest release
//! bashgpt version                     print the version
//! bashgpt help                        print usage
//! ```
//!
//! Every command except `upgrade` first warns when a newer release is
//! published (unless `upgrade.check_on_startup` is off) and refreshes the
//! bash script if an older copy is installed. Both steps are best effort and
//! never fail the command.

mod config;
mod sh;
mod upgrade;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{GlobalConfig, config_dir};
use crate::constants::{COMMAND_NAME, CONFIG_FILE, EMBEDDED_VERSION};
use crate::shell;
use crate::upgrade::{
    AssumeYes, BuildInfo, Confirm, ReleaseEndpoints, Upgrader, VersionChecker, http_client,
};

/// Turn natural-language queries at the bash prompt into shell commands.
#[derive(Parser, Debug)]
#[command(
    name = "bashgpt",
    about = "Turn natural-language queries at the bash prompt into shell commands",
    disable_version_flag = true,
    disable_help_subcommand = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all logging.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store your OpenAI API key and install the bash integration script.
    Config(config::ConfigCommand),

    /// Suggest a shell command for a query, or run a suggested command.
    Sh(sh::ShCommand),

    /// Upgrade bashgpt to the latest release.
    Upgrade(upgrade::UpgradeArgs),

    /// Print the version.
    Version,

    /// Print usage.
    Help,
}

impl Cli {
    /// Install the tracing subscriber for this invocation.
    ///
    /// `RUST_LOG` wins when set; otherwise `--verbose` selects debug, `--quiet`
    /// turns logging off, and the default shows warnings only.
    pub fn init_logging(&self) {
        let default = if self.verbose {
            "debug"
        } else if self.quiet {
            "off"
        } else {
            "warn"
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .try_init();
    }

    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        if !matches!(self.command, Commands::Upgrade(_)) {
            startup_checks().await;
        }

        match self.command {
            Commands::Config(cmd) => cmd.execute().await,
            Commands::Sh(cmd) => cmd.execute().await,
            Commands::Upgrade(cmd) => cmd.execute().await,
            Commands::Version => {
                println!("{COMMAND_NAME}-{EMBEDDED_VERSION}");
                Ok(())
            }
            Commands::Help => {
                Self::command().print_long_help().context("Failed to print help")?;
                Ok(())
            }
        }
    }
}

/// Where bashgpt keeps its state, and what `config.toml` says.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub dir: PathBuf,
    pub config: GlobalConfig,
}

impl Settings {
    pub(crate) async fn load() -> Result<Self> {
        let dir = config_dir()?;
        let config = GlobalConfig::load_or_default(&dir.join(CONFIG_FILE)).await?;
        Ok(Self { dir, config })
    }

    /// Upgrader for the running binary using the configured endpoints.
    pub(crate) fn upgrader<C: Confirm>(&self, confirm: C) -> Result<Upgrader<C>> {
        build_upgrader(&self.dir, &self.config, confirm)
    }
}

fn build_upgrader<C: Confirm>(dir: &Path, config: &GlobalConfig, confirm: C) -> Result<Upgrader<C>> {
    let build =
        BuildInfo::current().with_endpoints(ReleaseEndpoints::from_config(&config.upgrade));
    let client = http_client(&build).context("Failed to create HTTP client")?;

    Ok(Upgrader::new(build, client, confirm)
        .with_version_checker(VersionChecker::from_config(dir, &config.upgrade)))
}

/// Upgrade warning and script refresh ahead of ordinary commands.
async fn startup_checks() {
    let settings = match Settings::load().await {
        Ok(settings) => settings,
        Err(e) => {
            debug!("Skipping startup checks: {e:#}");
            return;
        }
    };

    if settings.config.upgrade.check_on_startup {
        match settings.upgrader(AssumeYes) {
            Ok(upgrader) => {
                upgrader.check_for_upgrade().await;
            }
            Err(e) => debug!("Skipping upgrade check: {e:#}"),
        }
    }

    // only refresh an existing installation; `config` creates the directory
    if settings.dir.is_dir()
        && let Err(e) = shell::ensure_latest_script(&settings.dir)
    {
        debug!("Could not refresh bash script: {e:#}");
    }
}

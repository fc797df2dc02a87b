use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use super::Settings;
use crate::upgrade::{AssumeYes, Confirm, TerminalConfirm, UpgradeOutcome};

/// Command-line arguments for `bashgpt upgrade`.
///
/// ```bash
/// bashgpt upgrade          # ask, then install the latest release
/// bashgpt upgrade --yes    # install without asking
/// bashgpt upgrade --check  # only report whether a newer release exists
/// ```
#[derive(Parser, Debug)]
pub struct UpgradeArgs {
    /// Only check whether a newer release is published.
    #[arg(long)]
    pub check: bool,

    /// Install without asking for confirmation.
    #[arg(short, long, conflicts_with = "check")]
    pub yes: bool,
}

impl UpgradeArgs {
    /// Run the upgrade command.
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load().await?;

        if self.check {
            return check_for_updates(&settings).await;
        }

        if self.yes {
            perform_upgrade(&settings, AssumeYes).await
        } else {
            perform_upgrade(&settings, TerminalConfirm).await
        }
    }
}

async fn check_for_updates(settings: &Settings) -> Result<()> {
    let upgrader = settings.upgrader(AssumeYes)?;
    let build = upgrader.build();

    if build.is_dev_build() {
        println!("Skipping {} upgrade check on development version", build.command_name);
        return Ok(());
    }

    match upgrader.check_now().await? {
        Some(latest) => {
            println!(
                "{} {} -> {}",
                "Update available:".green().bold(),
                build.version.to_string().yellow(),
                latest.to_string().green()
            );
            println!("Run `{} upgrade` to install the latest version", build.command_name);
        }
        None => println!(
            "{}",
            format!("You are on the latest version ({})", build.version).green()
        ),
    }

    Ok(())
}

async fn perform_upgrade<C: Confirm>(settings: &Settings, confirm: C) -> Result<()> {
    let mut upgrader = settings.upgrader(confirm)?;
    let name = upgrader.build().command_name.clone();

    match upgrader.run_upgrade().await? {
        UpgradeOutcome::DevBuild => {
            println!("Skipping {name} upgrade on development version");
        }
        UpgradeOutcome::UpToDate { version } => {
            println!("{name} {version} is already the latest version");
        }
        UpgradeOutcome::Declined { latest } => {
            println!("{}", format!("Upgrade to {latest} cancelled").yellow());
        }
        UpgradeOutcome::Upgraded(report) => {
            println!(
                "{}",
                format!("Upgraded {name} to {} at {}", report.version, report.path.display())
                    .green()
            );
            if let Some(artifact) = &report.stray_artifact {
                eprintln!(
                    "{} could not remove downloaded file {}",
                    "warning:".yellow().bold(),
                    artifact.display()
                );
            }
            if let Some(backup) = &report.stray_backup {
                eprintln!(
                    "{} could not remove previous binary {}; delete it by hand",
                    "warning:".yellow().bold(),
                    backup.display()
                );
            }
        }
    }

    Ok(())
}

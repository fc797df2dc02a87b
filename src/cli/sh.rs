use anyhow::{Context, Result, bail};
use clap::Args;
use std::io::Write;
use tokio::process::Command;
use tracing::debug;

use super::Settings;
use crate::completion::CompletionClient;
use crate::config::load_api_key;

/// Separates the query from a command line an earlier `sh` call suggested.
const COMMAND_DELIM: &str = "--";

/// Arguments for `bashgpt sh`.
///
/// Words before the first `--` form the query. Words after it are a command
/// line that an earlier `sh` call suggested; it is run as is instead of
/// asking again. The words are taken raw so queries may contain `-flags`.
#[derive(Args, Debug)]
pub struct ShCommand {
    /// Query words, optionally followed by `-- <command> [args...]`.
    #[arg(value_name = "QUERY", trailing_var_arg = true, allow_hyphen_values = true)]
    pub words: Vec<String>,
}

impl ShCommand {
    fn split(&self) -> (&[String], &[String]) {
        match self.words.iter().position(|w| w == COMMAND_DELIM) {
            Some(at) => (&self.words[..at], &self.words[at + 1..]),
            None => (self.words.as_slice(), &[]),
        }
    }

    /// Query words joined with single spaces.
    #[must_use]
    pub fn prompt(&self) -> String {
        self.split().0.join(" ")
    }

    /// The suggested command line after `--`, if any.
    #[must_use]
    pub fn command(&self) -> &[String] {
        self.split().1
    }

    /// Run the `sh` command.
    pub async fn execute(self) -> Result<()> {
        if let Some((program, args)) = self.command().split_first() {
            return run_command(program, args).await;
        }

        let prompt = self.prompt();
        if prompt.trim().is_empty() {
            bail!("No query given; usage: bashgpt sh <query>");
        }

        let settings = Settings::load().await?;
        let key = load_api_key(&settings.dir).await?;
        let client = CompletionClient::new(key, settings.config.completion.clone())
            .context("Failed to create completion client")?;

        let suggestion = client.suggest(&prompt).await?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(suggestion.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

async fn run_command(program: &str, args: &[String]) -> Result<()> {
    debug!("Running {program} {args:?}");

    let status = Command::new(program)
        .args(args)
        .status()
        .await
        .with_context(|| format!("Failed to run {program}"))?;

    if !status.success() {
        bail!("{program} failed with {status}");
    }
    Ok(())
}

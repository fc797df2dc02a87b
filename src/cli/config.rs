//! `bashgpt config`: first-time setup.
//!
//! Prompts for the OpenAI API key, stores it with owner-only permissions,
//! installs the bash integration script, and prints the `.bashrc` lines that
//! source it.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::io::{self, BufRead, Write};

use crate::config::{config_dir, ensure_config_dir, save_api_key};
use crate::shell::{bashrc_snippet, ensure_latest_script};

/// Arguments for `bashgpt config`.
#[derive(Args, Debug)]
pub struct ConfigCommand {}

impl ConfigCommand {
    /// Run the setup.
    pub async fn execute(self) -> Result<()> {
        let dir = config_dir()?;
        ensure_config_dir(&dir).await?;

        let key = prompt_for_key()?;
        let key_path = save_api_key(&dir, &key).await?;
        println!("{} {}", "Saved API key to".green(), key_path.display());

        ensure_latest_script(&dir).context("Could not write autocomplete script")?;

        println!("Add the following to your .bashrc or equivalent:");
        print!("{}", bashrc_snippet());
        Ok(())
    }
}

fn prompt_for_key() -> Result<String> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "Enter your OpenAI API key: ")?;
    stdout.flush()?;

    let mut key = String::new();
    io::stdin().lock().read_line(&mut key).context("Failed to read API key")?;
    Ok(key.trim().to_string())
}

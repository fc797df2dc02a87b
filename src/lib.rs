//! bashgpt turns natural-language queries typed at the bash prompt into shell
//! commands, and keeps itself up to date.
//!
//! # Modules
//!
//! - [`upgrade`] - self-upgrade: registry lookup, download, atomic install
//! - [`completion`] - the chat-completion call behind `bashgpt sh`
//! - [`config`] - config directory, `config.toml`, API key storage
//! - [`shell`] - the embedded bash integration script
//! - [`core`] - error types and their user-facing rendering
//! - [`cli`] - command-line parsing and command handlers
//!
//! # Configuration
//!
//! State lives in `~/.config/bashgpt` (or `$BASHGPT_CONFIG_DIR`):
//!
//! ```toml
//! # ~/.config/bashgpt/config.toml
//! [upgrade]
//! check_on_startup = true
//! check_interval = 86400
//!
//! [completion]
//! model = "gpt-3.5-turbo"
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod constants;
pub mod core;
pub mod shell;
pub mod upgrade;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

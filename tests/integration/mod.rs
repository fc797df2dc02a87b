//! Integration test suite for bashgpt
//!
//! These tests drive the built binary with `assert_cmd`. Each test points
//! `BASHGPT_CONFIG_DIR` at a fresh temporary directory and any network
//! endpoint at a local `wiremock` server, so nothing touches the real home
//! directory or the network.
//!
//! ```bash
//! cargo test --test integration
//! ```

mod cli;
mod common;
mod config;
mod sh;
mod upgrade;

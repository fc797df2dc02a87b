//! Core types shared across bashgpt.
//!
//! Currently this is the error system: typed errors for the upgrade subsystem
//! and the collaborators, and the user-facing rendering used by `main`.

pub mod error;

pub use error::{
    BashgptError, ErrorContext, Severity, UpgradeError, UpgradeErrorKind, user_friendly_error,
};

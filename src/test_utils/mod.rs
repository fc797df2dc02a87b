//! Test utilities for bashgpt
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration tests under `tests/`.

use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::upgrade::ReleaseEndpoints;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=bashgpt=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Release endpoints that point every request at `base_url`.
///
/// Lookups go to `<base_url>/repos/mikeb26/bashgpt/releases/latest` and
/// downloads to `<base_url>/mikeb26/bashgpt/releases/download/<tag>/bashgpt`.
pub fn endpoints_at(base_url: &str) -> ReleaseEndpoints {
    let base = base_url.trim_end_matches('/').to_string();
    ReleaseEndpoints {
        api_base: base.clone(),
        download_base: base,
        ..ReleaseEndpoints::default()
    }
}

/// Write an executable stand-in for an installed binary at `dir/name`.
pub fn fake_binary(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Err(e) = crate::utils::fs::write_with_mode(&path, content, 0o755) {
        panic!("Failed to write fake binary {}: {e}", path.display());
    }
    path
}

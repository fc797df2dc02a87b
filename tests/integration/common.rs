use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated config directory and a command wired to use it.
pub struct TestEnv {
    pub temp: TempDir,
    pub config_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        bashgpt::test_utils::init_test_logging(None);
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join("config").join("bashgpt");
        Self { temp, config_dir }
    }

    /// Create the config directory, as `bashgpt config` would.
    pub fn with_config_dir(self) -> Self {
        std::fs::create_dir_all(&self.config_dir).unwrap();
        self
    }

    /// Write `config.toml`.
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::create_dir_all(&self.config_dir).unwrap();
        std::fs::write(self.config_dir.join("config.toml"), toml).unwrap();
        self
    }

    /// Write the API key file.
    pub fn with_key(self, key: &str) -> Self {
        std::fs::create_dir_all(&self.config_dir).unwrap();
        std::fs::write(self.config_dir.join(".openai.key"), key).unwrap();
        self
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.config_dir.join(name)
    }

    pub fn home(&self) -> &Path {
        self.temp.path()
    }

    pub fn bashgpt(&self) -> Command {
        let mut cmd = Command::cargo_bin("bashgpt").unwrap();
        cmd.env("BASHGPT_CONFIG_DIR", &self.config_dir)
            .env("HOME", self.home())
            .env_remove("OPENAI_API_KEY")
            .env_remove("RUST_LOG");
        cmd
    }
}

/// `config.toml` sending every upgrade request to `base_url`.
pub fn upgrade_config(base_url: &str) -> String {
    format!(
        "[upgrade]\ncheck_on_startup = true\ncheck_interval = 0\napi_base = \"{base_url}\"\ndownload_base = \"{base_url}\"\n"
    )
}

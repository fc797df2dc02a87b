use bashgpt::constants::EMBEDDED_VERSION;
use bashgpt::shell::AUTOCOMPLETE_SCRIPT_TEXT;
use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn test_version_prints_embedded_version() {
    let env = TestEnv::new();
    env.bashgpt()
        .arg("version")
        .assert()
        .success()
        .stdout(format!("bashgpt-{EMBEDDED_VERSION}\n"));
}

#[test]
fn test_help_succeeds() {
    let env = TestEnv::new().with_config_dir();
    std::fs::write(env.path("bashgpt_autocomplete.sh"), "# stale\n").unwrap();

    env.bashgpt()
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("upgrade"))
        .stdout(predicate::str::contains("sh"));

    let script = std::fs::read_to_string(env.path("bashgpt_autocomplete.sh")).unwrap();
    assert_eq!(script, AUTOCOMPLETE_SCRIPT_TEXT);
}

#[test]
fn test_missing_subcommand_prints_help_and_fails() {
    let env = TestEnv::new();
    env.bashgpt()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let env = TestEnv::new();
    env.bashgpt().arg("frobnicate").assert().code(1);
}

#[test]
fn test_ordinary_command_refreshes_stale_script() {
    let env = TestEnv::new().with_config_dir();
    std::fs::write(env.path("bashgpt_autocomplete.sh"), "# stale\n").unwrap();

    env.bashgpt().arg("version").assert().success();

    let script = std::fs::read_to_string(env.path("bashgpt_autocomplete.sh")).unwrap();
    assert_eq!(script, AUTOCOMPLETE_SCRIPT_TEXT);
}

#[test]
fn test_ordinary_command_does_not_create_config_dir() {
    let env = TestEnv::new();
    env.bashgpt().arg("version").assert().success();
    assert!(!env.config_dir.exists());
}

#[test]
fn test_broken_config_is_reported() {
    let env = TestEnv::new().with_config("[upgrade\n");
    env.bashgpt()
        .args(["sh", "list", "files"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config"));
}

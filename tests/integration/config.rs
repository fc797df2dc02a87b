use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn test_config_stores_key_and_installs_script() {
    let env = TestEnv::new();

    env.bashgpt()
        .arg("config")
        .write_stdin("  sk-integration  \n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter your OpenAI API key: "))
        .stdout(predicate::str::contains(
            ". ~/.config/bashgpt/bashgpt_autocomplete.sh",
        ));

    let key = std::fs::read_to_string(env.path(".openai.key")).unwrap();
    assert_eq!(key, "sk-integration");
    assert!(env.path("bashgpt_autocomplete.sh").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = |p: std::path::PathBuf| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(env.config_dir.clone()), 0o700);
        assert_eq!(mode(env.path(".openai.key")), 0o600);
        assert_eq!(mode(env.path("bashgpt_autocomplete.sh")), 0o755);
    }
}

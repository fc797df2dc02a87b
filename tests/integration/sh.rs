use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::TestEnv;

#[test]
fn test_sh_without_key_fails() {
    let env = TestEnv::new();
    env.bashgpt()
        .args(["sh", "list", "files"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("run `bashgpt config` to configure"));
}

#[cfg(unix)]
#[test]
fn test_sh_runs_suggested_command() {
    let env = TestEnv::new();
    env.bashgpt()
        .args(["sh", "say", "hello", "--", "echo", "hello", "-n"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"));
}

#[cfg(unix)]
#[test]
fn test_sh_runs_command_with_flags_without_key() {
    let env = TestEnv::new();
    env.bashgpt()
        .args(["sh", "print", "-n", "words", "--", "printf", "%s-%s", "-a", "b"])
        .assert()
        .success()
        .stdout("-a-b");
}

#[cfg(unix)]
#[test]
fn test_sh_failing_command_fails() {
    let env = TestEnv::new();
    env.bashgpt()
        .args(["sh", "fail", "--", "false"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("false failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sh_prints_suggestion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-integration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "```bash\ndu -sh *\n```" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new()
        .with_key("sk-integration\n")
        .with_config(&format!(
            "[upgrade]\ncheck_on_startup = false\n\n[completion]\napi_base = \"{}\"\n",
            server.uri()
        ));

    env.bashgpt()
        .args(["sh", "show", "directory", "sizes"])
        .assert()
        .success()
        .stdout("du -sh *\n");
}

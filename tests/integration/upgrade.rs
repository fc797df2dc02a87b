use bashgpt::upgrade::BuildInfo;
use predicates::prelude::*;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{TestEnv, upgrade_config};

/// Mock server that fails the test if anything contacts it.
async fn untouchable_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dev_build_skips_upgrade_without_lookup() {
    if !BuildInfo::current().is_dev_build() {
        return;
    }
    let server = untouchable_server().await;
    let env = TestEnv::new().with_config(&upgrade_config(&server.uri()));

    env.bashgpt()
        .arg("upgrade")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Skipping bashgpt upgrade on development version",
        ));

    env.bashgpt()
        .args(["upgrade", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping bashgpt upgrade check"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dev_build_startup_check_is_silent() {
    if !BuildInfo::current().is_dev_build() {
        return;
    }
    let server = untouchable_server().await;
    let env = TestEnv::new().with_config(&upgrade_config(&server.uri()));

    env.bashgpt()
        .arg("version")
        .assert()
        .success()
        .stderr(predicate::str::contains("*WARN*").not());
}

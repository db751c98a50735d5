//! Bootstrap failures leave users running without a credential

use decentralbet_loadtest::config::Config;
use decentralbet_loadtest::payload::Credentials;
use decentralbet_loadtest::runner::run;

mod common;
use common::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rejected_auth_does_not_stop_the_run() {
    let stub = StubServer::start(StubBehavior::auth_rejected()).await;

    let config = Config {
        host: stub.host(),
        profiles: vec!["DecentralBetUser".to_string(), "AdminUser".to_string()],
        admin: Credentials {
            email: "ops@decentralbet.com".to_string(),
            password: "OpsPassword1!".to_string(),
        },
        users: Some(4),
        iterations: 3,
        think_time: false,
        ..Config::default()
    };

    let report = tokio::time::timeout(RUN_DEADLINE, run(&config, goose_config()))
        .await
        .expect("capped run did not finish")
        .unwrap();

    // Registration conflict and login rejection were both hit
    assert!(stub.hits("POST /api/v1/auth/register") > 0);
    assert!(stub.hits("POST /api/v1/auth/login") > 0);

    // Admins logged in with the configured credentials, not the defaults
    assert!(stub.logins_for("ops@decentralbet.com") > 0);
    assert_eq!(stub.logins_for("admin@decentralbet.com"), 0);

    // Users carried on into their task loops without a token
    assert!(stub.hits("GET /api/v1/dashboard") > 0);
    assert!(stub.hits("GET /api/v1/users") > 0);
    assert_eq!(stub.total_authorized_hits(), 0);

    // Only rejected auth calls can count as failures
    let auth_calls =
        stub.hits("POST /api/v1/auth/register") + stub.hits("POST /api/v1/auth/login");
    assert!(report.summary.total_failures <= auth_calls as u64);
    assert!(report.summary.total_requests > report.summary.total_failures);
}

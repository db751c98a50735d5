//! End-to-end run of the normal_load preset against the stub backend

use decentralbet_loadtest::config::Config;
use decentralbet_loadtest::runner::run;
use std::time::Duration;

mod common;
use common::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_normal_load_against_stub_completes() {
    let stub = StubServer::start(StubBehavior::ok()).await;

    let config = Config {
        host: stub.host(),
        scenario: "normal_load".to_string(),
        users: Some(10),
        run_time: Some(Duration::from_secs(2)),
        think_time: false,
        ..Config::default()
    };

    let report = run(&config, goose_config()).await.unwrap();

    assert_eq!(report.preset.name, "normal_load");
    assert_eq!(report.host, stub.host());
    assert_eq!(report.start_lines[0], "Starting DecentralBet load test...");
    assert!(report.start_lines[1].contains(&stub.host()));

    assert_eq!(report.stop_lines[0], "Load test completed!");
    assert!(
        report
            .stop_lines
            .iter()
            .any(|line| line.starts_with("Total requests:"))
    );
    assert!(
        report
            .stop_lines
            .iter()
            .any(|line| line.starts_with("Total failures:"))
    );

    assert!(report.summary.total_requests > 0);
    assert!(report.summary.total_failures <= report.summary.total_requests);
    assert!(stub.total_hits() > 0);

    // Every profile ran
    assert!(stub.hits("POST /api/v1/auth/register") > 0);
    assert!(stub.hits("GET /health") > 0);
    assert!(report.summary.handshakes.attempts > 0);
    assert!(stub.hits("GET /socket.io/") > 0);
}

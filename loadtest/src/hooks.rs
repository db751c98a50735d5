//! Lifecycle hooks
//!
//! Observational callbacks around a run: one per completed request, one when
//! the run starts and one when it stops. None of them influence control flow.

use crate::summary::RunSummary;
use std::time::Duration;
use tracing::{error, warn};

/// Requests slower than this are reported as slow
pub const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_millis(1000);

/// What a hook knows about a finished request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome<'a> {
    pub method: &'a str,
    pub name: &'a str,
    pub response_time_ms: u64,
    pub error: Option<&'a str>,
}

/// A request worth reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestNotice {
    Failed { line: String },
    Slow { line: String },
}

impl RequestNotice {
    pub fn line(&self) -> &str {
        match self {
            RequestNotice::Failed { line } | RequestNotice::Slow { line } => line,
        }
    }
}

/// Classify a finished request. Errors win over slowness.
pub fn assess(outcome: &RequestOutcome<'_>) -> Option<RequestNotice> {
    if let Some(err) = outcome.error {
        return Some(RequestNotice::Failed {
            line: format!(
                "Request failed: {} {} - {}",
                outcome.method, outcome.name, err
            ),
        });
    }

    if u128::from(outcome.response_time_ms) > SLOW_REQUEST_THRESHOLD.as_millis() {
        return Some(RequestNotice::Slow {
            line: format!(
                "Slow request: {} {} - {}ms",
                outcome.method, outcome.name, outcome.response_time_ms
            ),
        });
    }

    None
}

/// Request-completion hook
pub fn on_request(outcome: &RequestOutcome<'_>) {
    match assess(outcome) {
        Some(RequestNotice::Failed { line }) => error!("{}", line),
        Some(RequestNotice::Slow { line }) => warn!("{}", line),
        None => {}
    }
}

/// Lines printed when the run starts
pub fn start_lines(host: &str) -> Vec<String> {
    vec![
        "Starting DecentralBet load test...".to_string(),
        format!("Target host: {}", host),
    ]
}

/// Lines printed when the run stops
pub fn stop_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![
        "Load test completed!".to_string(),
        format!("Total requests: {}", summary.total_requests),
        format!("Total failures: {}", summary.total_failures),
        format!(
            "Average response time: {:.2}ms",
            summary.average_response_time_ms()
        ),
        format!(
            "95th percentile response time: {}ms",
            summary.latency.percentile(0.95).unwrap_or(0)
        ),
    ];

    if summary.handshakes.attempts > 0 {
        lines.push(format!(
            "WebSocket handshakes: {} ({} failed)",
            summary.handshakes.attempts, summary.handshakes.failures
        ));
    }

    lines
}

//! Request helper shared by bootstrap and tasks
//!
//! Every HTTP call goes through `send`, which hands the request to goose (so
//! it lands in the run statistics under its label) and then fires the
//! request-completion hook.

use crate::catalog::Method;
use crate::hooks::{self, RequestOutcome};
use goose::goose::{GooseRequest, GooseResponse, GooseUser, TransactionError};
use goose::metrics::GooseRequestMetric;
use serde_json::Value;

/// Issue one request labelled `name`
pub async fn send(
    user: &mut GooseUser,
    method: Method,
    path: &str,
    name: &str,
    body: Option<&Value>,
) -> Result<GooseResponse, Box<TransactionError>> {
    let mut builder = user.get_request_builder(&method.goose_method(), path)?;
    if let Some(body) = body {
        builder = builder.json(body);
    }

    let request = GooseRequest::builder()
        .method(method.goose_method())
        .path(path)
        .name(name)
        .set_request_builder(builder)
        .build();

    let goose = user.request(request).await?;
    report(method, name, &goose.request);
    Ok(goose)
}

/// Fire the request hook for a goose request metric
fn report(method: Method, name: &str, metric: &GooseRequestMetric) {
    let error = failure_reason(metric.success, metric.status_code, &metric.error);
    hooks::on_request(&RequestOutcome {
        method: method.as_str(),
        name,
        response_time_ms: metric.response_time,
        error: error.as_deref(),
    });
}

fn failure_reason(success: bool, status_code: u16, error: &str) -> Option<String> {
    if success {
        None
    } else if error.is_empty() {
        Some(format!("HTTP {}", status_code))
    } else {
        Some(error.to_string())
    }
}

/// Status code and body of a response, or `None` on transport failure
pub async fn read_response(goose: GooseResponse) -> Option<(u16, String)> {
    match goose.response {
        Ok(response) => {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Some((status, body))
        }
        Err(_) => None,
    }
}

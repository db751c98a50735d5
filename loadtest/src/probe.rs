//! WebSocket handshake probe
//!
//! Opens a real socket.io WebSocket transport against the target, waits for
//! the engine.io open packet, closes the socket, and reports the handshake
//! time through the request hook.
//! Goose only tracks HTTP requests, so handshakes are tallied separately.

use crate::catalog::TaskSpec;
use crate::hooks::{self, RequestOutcome};
use crate::summary::record_handshake;
use goose::goose::{GooseUser, TransactionResult};
use futures_util::StreamExt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;

/// Query string selecting the engine.io v4 WebSocket transport
const ENGINE_IO_QUERY: &str = "EIO=4&transport=websocket";

/// Engine.io packet type of the first frame a server sends
const ENGINE_IO_OPEN: char = '0';

pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Unsupported scheme for WebSocket probe: {0}")]
    UnsupportedScheme(String),

    #[error("Handshake timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("Expected engine.io open packet, got {0}")]
    UnexpectedFrame(String),
}

/// Map an http(s) URL onto the ws(s) URL of the engine.io transport
pub fn handshake_url(http_url: &str) -> Result<String, ProbeError> {
    let ws_url = if let Some(rest) = http_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = http_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        return Err(ProbeError::UnsupportedScheme(http_url.to_string()));
    };

    let separator = if ws_url.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}{}", ws_url, separator, ENGINE_IO_QUERY))
}

async fn handshake(url: &str) -> Result<(), ProbeError> {
    tokio::time::timeout(HANDSHAKE_TIMEOUT, open_transport(url))
        .await
        .map_err(|_| ProbeError::TimedOut(HANDSHAKE_TIMEOUT))?
}

async fn open_transport(url: &str) -> Result<(), ProbeError> {
    let (mut socket, response) = connect_async(url)
        .await
        .map_err(|e| ProbeError::Handshake(e.to_string()))?;
    debug!("WebSocket upgraded: {} ({})", url, response.status());

    let first = socket.next().await;
    let _ = socket.close(None).await;

    match first {
        Some(Ok(Message::Text(text))) if text.as_str().starts_with(ENGINE_IO_OPEN) => {
            debug!("engine.io open: {}", text.as_str());
            Ok(())
        }
        Some(Ok(other)) => Err(ProbeError::UnexpectedFrame(other.to_string())),
        Some(Err(e)) => Err(ProbeError::Handshake(e.to_string())),
        None => Err(ProbeError::UnexpectedFrame("end of stream".to_string())),
    }
}

/// Whole milliseconds, saturating at `u64::MAX`
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Task body for `Payload::Handshake`
pub async fn run(user: &mut GooseUser, task: &TaskSpec) -> TransactionResult {
    let http_url = user.build_url(task.path)?;

    let started = Instant::now();
    let result = match handshake_url(&http_url) {
        Ok(url) => handshake(&url).await,
        Err(e) => Err(e),
    };
    let elapsed_ms = millis(started.elapsed());

    record_handshake(result.is_ok());
    let error = result.err().map(|e| e.to_string());
    hooks::on_request(&RequestOutcome {
        method: task.method.as_str(),
        name: task.label,
        response_time_ms: elapsed_ms,
        error: error.as_deref(),
    });
    Ok(())
}

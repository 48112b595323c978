//! HTTP client for the remote customer API.
//!
//! [`ApiClient::send`] performs a single `PUT` with a JSON body and never
//! fails: every transport or protocol problem is logged and folded into a
//! [`TransmissionResult`] with an empty body.
//!
//! | Situation                                   | Result            |
//! |---------------------------------------------|-------------------|
//! | 2xx/3xx with a JSON body                    | `(status, body)`  |
//! | 2xx/3xx with a body that is not JSON        | `(status, None)`  |
//! | 4xx/5xx                                     | `(status, None)`  |
//! | refused, reset, unreachable, DNS failure    | `(503, None)`     |
//! | any other request failure                   | `(500, None)`     |
//!
//! No timeout is set and nothing is retried.

use serde::Serialize;
use serde_json::Value;
use std::error::Error as _;
use std::io::ErrorKind;
use tracing::{error, info};

/// Status reported when the remote host cannot be reached.
pub const CONNECTION_FAILED_STATUS: u16 = 503;

/// Status reported when a request failed without a response.
pub const REQUEST_FAILED_STATUS: u16 = 500;

/// Outcome of one transmission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransmissionResult {
    pub status: u16,
    pub body: Option<Value>,
}

impl TransmissionResult {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    fn failed(status: u16) -> Self {
        Self { status, body: None }
    }

    /// Whether the remote end accepted the payload and answered with JSON.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.body.is_some()
    }
}

/// Renders as `<status> - <body>`, with `None` for a missing body.
impl std::fmt::Display for TransmissionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.body {
            Some(body) => write!(f, "{} - {}", self.status, body),
            None => write!(f, "{} - None", self.status),
        }
    }
}

/// Client for the remote customer API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured `reqwest` client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// `PUT` `payload` as JSON to `url`.
    pub async fn send<T: Serialize + ?Sized>(&self, url: &str, payload: &T) -> TransmissionResult {
        info!(%url, "Sending payload to API");

        let response = match self.http.put(url).json(payload).send().await {
            Ok(response) => response,
            Err(e) if is_connection_failure(&e) => {
                error!(%url, "Connection error: {}", e);
                return TransmissionResult::failed(CONNECTION_FAILED_STATUS);
            }
            Err(e) => {
                error!(%url, "Request error: {}", e);
                let status = e.status().map_or(REQUEST_FAILED_STATUS, |s| s.as_u16());
                return TransmissionResult::failed(status);
            }
        };

        let status = response.status();
        info!(status = status.as_u16(), "API responded");

        if status.is_client_error() || status.is_server_error() {
            error!(status = status.as_u16(), "Request error: HTTP {}", status);
            return TransmissionResult::failed(status.as_u16());
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                error!(status = status.as_u16(), "Failed to read response body: {}", e);
                return TransmissionResult::failed(status.as_u16());
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => TransmissionResult::new(status.as_u16(), Some(body)),
            Err(e) => {
                error!(status = status.as_u16(), "Failed to decode JSON response: {}", e);
                TransmissionResult::failed(status.as_u16())
            }
        }
    }
}

/// Whether the request never reached a responding server.
fn is_connection_failure(err: &reqwest::Error) -> bool {
    if err.is_connect() {
        return true;
    }

    let mut source = err.source();
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                ErrorKind::ConnectionRefused
                    | ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
            ) {
                return true;
            }
        }
        source = inner.source();
    }
    false
}

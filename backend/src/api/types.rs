//! REST API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::TransmissionResult;
use crate::error::ServerError;

/// Body of a `POST /api/send` reply.
///
/// `response` is the remote JSON body, or `null` when there was none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendResponse {
    pub status: u16,
    pub response: Option<Value>,
}

impl From<TransmissionResult> for SendResponse {
    fn from(result: TransmissionResult) -> Self {
        Self {
            status: result.status,
            response: result.body,
        }
    }
}

/// Create an error response body.
pub fn error_response(error: &str) -> Value {
    json!({ "error": error })
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&self.to_string()))).into_response()
    }
}

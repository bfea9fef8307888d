/**
 * Error Conversion
 *
 * `BackendError` implements `IntoResponse` so handlers can return it directly,
 * and converts into a relay error frame for the WebSocket side. Extractor
 * rejections (malformed JSON bodies, unparseable path ids) become validation
 * errors so every 4xx carries the same body.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Subscription already purchased",
 *   "kind": "already_purchased",
 *   "status": 409
 * }
 * ```
 */

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;
use crate::shared::RelayOutbound;

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        BackendError::validation("body", rejection.body_text())
    }
}

impl From<PathRejection> for BackendError {
    fn from(rejection: PathRejection) -> Self {
        BackendError::validation("path", rejection.body_text())
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_internal() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }

        let body = serde_json::json!({
            "error": self.message(),
            "kind": self.kind(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<&BackendError> for RelayOutbound {
    fn from(err: &BackendError) -> Self {
        RelayOutbound::error(err.message())
    }
}

//! Response construction.
//!
//! # Responsibilities
//! - Pass upstream JSON bodies through to the frontend
//! - Substitute the local generic error object where the contract says so
//!
//! # Design Decisions
//! - Upstream rejections keep the upstream status code; most operations
//!   replace the body with a generic object so upstream error internals
//!   don't leak, order submission forwards the body for form feedback
//! - Transport and JSON-parse failures collapse to 500 + generic body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// Locally generated generic error object.
pub fn generic_error(status: StatusCode) -> Response {
    (status, Json(json!({ "error": "Failed to process request" }))).into_response()
}

/// Upstream JSON body passed through with the given status.
pub fn passthrough(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

//! Route handlers
//!
//! Handlers parse the request, call the lifecycle and render the legacy
//! response texts. Every lifecycle failure becomes a 500 with a readable
//! message; nothing structured is exposed. JSON bodies that fail to decode
//! take the same path as an `Invalid` error.

pub mod escrow;
pub mod inspection;
pub mod negotiation;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use estate_core::{AssetId, EstateError, Result};
use serde::Deserialize;
use std::fmt::Display;
use tracing::warn;

/// Body of the single-asset routes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRequest {
    /// Target asset
    pub asset_id: String,
}

impl AssetRequest {
    fn asset_id(&self) -> Result<AssetId> {
        AssetId::parse(&self.asset_id)
    }
}

/// JSON body as extracted, rejection included
pub type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;

/// Unwrap an extracted body, turning a rejection into `Invalid`
pub(crate) fn parse_body<T>(body: JsonBody<T>) -> Result<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| EstateError::invalid(rejection.body_text()))
}

/// 500 with `{prefix}{error}`
pub(crate) fn failure(operation: &str, prefix: &str, error: impl Display) -> Response {
    warn!(operation, error = %error, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("{prefix}{error}"),
    )
        .into_response()
}

pub(crate) fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, message.into()).into_response()
}

/// Liveness probe
pub async fn health() -> &'static str {
    "OK"
}

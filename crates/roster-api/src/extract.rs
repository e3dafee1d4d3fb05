//! Body and path extractors that fail with [`ApiError`].
//!
//! axum's own `Json` and `Path` reject with plain-text 400/415/422 responses.
//! These wrappers run the same extraction but turn every rejection into
//! `ApiError::BadRequest`, so malformed input gets the usual 400 and
//! `{"error": ...}` body.

use axum::extract::{
  FromRequest, FromRequestParts,
  rejection::{JsonRejection, PathRejection},
};

use crate::error::ApiError;

/// A JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Typed URL path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParams<T>(pub T);

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    tracing::debug!(status = %rejection.status(), "rejected request body: {rejection}");
    ApiError::BadRequest(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    tracing::debug!(status = %rejection.status(), "rejected path: {rejection}");
    ApiError::BadRequest(rejection.body_text())
  }
}

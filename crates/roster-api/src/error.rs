//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure becomes a stable status code plus `{"error": "<message>"}`.
//! Internal failures are logged and replaced with a generic message so that
//! database and hashing errors never reach the client.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roster_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

use crate::{credentials::CredentialError, token::TokenError};

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing, malformed, invalid or expired token, or a token of the wrong
  /// role for the endpoint.
  #[error("Authentication required")]
  Unauthenticated,

  #[error("Invalid email or password")]
  InvalidCredentials,

  #[error("{0}")]
  BadRequest(String),

  #[error(transparent)]
  Domain(#[from] roster_core::Error),

  #[error("credential error: {0}")]
  Credentials(#[from] CredentialError),

  #[error("token error: {0}")]
  Token(#[from] TokenError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Unauthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Domain(e) => match e.kind() {
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        // Duplicate emails and requests.
        ErrorKind::Conflict => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
      },
      ApiError::Credentials(_) | ApiError::Token(_) | ApiError::Store(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
      "An error occurred".to_string()
    } else {
      self.to_string()
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

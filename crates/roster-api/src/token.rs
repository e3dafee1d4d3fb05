//! Signed, time-bound identity tokens.
//!
//! Tokens are HS256 JWTs carrying `{id, role, iat, exp}`. They are an
//! authorization capability, not a secret payload: anyone holding one can read
//! the role and id, but only the holder of the signing key can mint one.
//! Rotating the key invalidates every outstanding token.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
  errors::ErrorKind,
};
use roster_core::identity::{Principal, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long an issued token stays valid.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
  /// Row id in the role's table.
  id:   i64,
  role: Role,
  iat:  i64,
  exp:  i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
  #[error("malformed token")]
  Malformed,

  #[error("token signature mismatch")]
  SignatureMismatch,

  #[error("token expired")]
  Expired,

  #[error("failed to sign token: {0}")]
  Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and validates tokens with a single process-wide key.
pub struct TokenService {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
}

impl TokenService {
  pub fn new(secret: &[u8]) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is exact: valid through `exp`, rejected one second later.
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      validation,
    }
  }

  pub fn issue(&self, principal: Principal) -> Result<String, TokenError> {
    self.issue_at(principal, Utc::now())
  }

  /// Issue a token as if the current time were `issued_at`.
  pub fn issue_at(
    &self,
    principal: Principal,
    issued_at: DateTime<Utc>,
  ) -> Result<String, TokenError> {
    let claims = Claims {
      id:   principal.subject_id(),
      role: principal.role(),
      iat:  issued_at.timestamp(),
      exp:  (issued_at + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(TokenError::Signing)
  }

  /// Check signature and expiry, then rebuild the principal.
  pub fn validate(&self, token: &str) -> Result<Principal, TokenError> {
    let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
      match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
        _ => TokenError::Malformed,
      }
    })?;
    Ok(Principal::from_parts(data.claims.id, data.claims.role))
  }
}

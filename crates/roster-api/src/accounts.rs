//! Signup, login and profile lookup, shared by both roles.

use roster_core::{
  identity::{NewIdentity, Principal, Profile, Role},
  store::ClassroomStore,
};
use serde::Deserialize;

use crate::{credentials, error::ApiError, token::TokenService};

#[derive(Debug, Deserialize)]
pub struct SignupBody {
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub password:   String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// A freshly authenticated identity and its token.
#[derive(Debug, Clone)]
pub struct Session {
  pub id:    i64,
  pub token: String,
}

impl SignupBody {
  fn validate(&self) -> Result<(), ApiError> {
    if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
      return Err(ApiError::BadRequest("First and last name are required".into()));
    }
    if !self.email.contains('@') {
      return Err(ApiError::BadRequest("A valid email is required".into()));
    }
    if self.password.is_empty() {
      return Err(ApiError::BadRequest("Password is required".into()));
    }
    Ok(())
  }
}

/// Register a new identity in `role`'s table and issue its first token.
pub async fn signup<S: ClassroomStore>(
  store: &S,
  tokens: &TokenService,
  role: Role,
  body: SignupBody,
) -> Result<Session, ApiError> {
  body.validate()?;
  let email = body.email.trim().to_owned();

  let duplicate = || roster_core::Error::DuplicateEmail { role, email: email.clone() };

  // Cheap early exit before paying for a hash; the UNIQUE constraint below
  // still decides races.
  if store
    .find_identity_by_email(role, &email)
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(duplicate().into());
  }

  let password_hash = credentials::hash_blocking(body.password).await?;

  let identity = store
    .create_identity(role, NewIdentity {
      first_name: body.first_name,
      last_name: body.last_name,
      email: email.clone(),
      password_hash,
    })
    .await
    .map_err(ApiError::store)?
    .ok_or_else(duplicate)?;

  let token = tokens.issue(identity.principal())?;
  tracing::info!(role = %role, id = identity.id, "signed up");
  Ok(Session { id: identity.id, token })
}

/// Check credentials and issue a token. An unknown email and a wrong password
/// are indistinguishable to the caller.
pub async fn login<S: ClassroomStore>(
  store: &S,
  tokens: &TokenService,
  role: Role,
  body: LoginBody,
) -> Result<Session, ApiError> {
  let identity = store
    .find_identity_by_email(role, body.email.trim())
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::InvalidCredentials)?;

  if !credentials::verify_blocking(body.password, identity.password_hash.clone()).await? {
    return Err(ApiError::InvalidCredentials);
  }

  let token = tokens.issue(identity.principal())?;
  Ok(Session { id: identity.id, token })
}

/// The public profile behind `principal`. A valid token whose identity has
/// vanished is treated as unauthenticated.
pub async fn profile<S: ClassroomStore>(
  store: &S,
  principal: Principal,
) -> Result<Profile, ApiError> {
  store
    .get_identity(principal.role(), principal.subject_id())
    .await
    .map_err(ApiError::store)?
    .map(|identity| identity.profile())
    .ok_or(ApiError::Unauthenticated)
}

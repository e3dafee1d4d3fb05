//! Bearer-token extractors.
//!
//! [`Authenticated`] resolves any valid token to a [`Principal`]. The
//! role-specific extractors [`TeacherAuth`] and [`StudentAuth`] additionally
//! require the matching role and an identity row that still exists. A token of
//! the other role, or one whose identity is gone, is rejected with 401 exactly
//! like a missing token.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header::AUTHORIZATION, request::Parts};
use roster_core::{
  id::{StudentId, TeacherId},
  identity::Principal,
  store::ClassroomStore,
};

use crate::{AppState, error::ApiError, token::TokenService};

/// Any authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub Principal);

/// An authenticated teacher.
#[derive(Debug, Clone, Copy)]
pub struct TeacherAuth(pub TeacherId);

/// An authenticated student.
#[derive(Debug, Clone, Copy)]
pub struct StudentAuth(pub StudentId);

/// The token from an `Authorization: Bearer <token>` header, if the header is
/// present and well formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.trim().split_once(' ')?;
  if !scheme.eq_ignore_ascii_case("bearer") {
    return None;
  }
  let token = token.trim();
  (!token.is_empty()).then_some(token)
}

/// Verify the bearer token in `headers`. Used by the extractors and usable
/// from manual dispatch.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<Principal, ApiError> {
  let token = bearer_token(headers).ok_or(ApiError::Unauthenticated)?;
  tokens.validate(token).map_err(|e| {
    tracing::debug!("rejected bearer token: {e}");
    ApiError::Unauthenticated
  })
}

/// Reject a principal whose identity row no longer exists.
async fn require_identity<S: ClassroomStore>(
  store: &S,
  principal: Principal,
) -> Result<(), ApiError> {
  let identity = store
    .get_identity(principal.role(), principal.subject_id())
    .await
    .map_err(ApiError::store)?;
  if identity.is_none() {
    tracing::debug!(
      role = %principal.role(),
      id = principal.subject_id(),
      "token for unknown identity"
    );
    return Err(ApiError::Unauthenticated);
  }
  Ok(())
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: ClassroomStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    authenticate(&parts.headers, &state.tokens).map(Authenticated)
  }
}

impl<S> FromRequestParts<AppState<S>> for TeacherAuth
where
  S: ClassroomStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let Authenticated(principal) = Authenticated::from_request_parts(parts, state).await?;
    let teacher = principal.as_teacher().ok_or(ApiError::Unauthenticated)?;
    require_identity(state.store.as_ref(), principal).await?;
    Ok(TeacherAuth(teacher))
  }
}

impl<S> FromRequestParts<AppState<S>> for StudentAuth
where
  S: ClassroomStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let Authenticated(principal) = Authenticated::from_request_parts(parts, state).await?;
    let student = principal.as_student().ok_or(ApiError::Unauthenticated)?;
    require_identity(state.store.as_ref(), principal).await?;
    Ok(StudentAuth(student))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::{HeaderValue, Request};
  use chrono::{Duration, Utc};
  use roster_core::identity::{NewIdentity, Role};
  use roster_store_sqlite::SqliteStore;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState::new(store, TokenService::new(b"secret"))
  }

  async fn seed(state: &AppState<SqliteStore>, role: Role, email: &str) -> i64 {
    state
      .store
      .create_identity(role, NewIdentity {
        first_name:    "Ada".into(),
        last_name:     "Lovelace".into(),
        email:         email.into(),
        password_hash: "$argon2id$v=19$placeholder".into(),
      })
      .await
      .unwrap()
      .unwrap()
      .id
  }

  fn request(auth: Option<&str>) -> Parts {
    let mut builder = Request::builder();
    if let Some(value) = auth {
      builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(()).unwrap().into_parts().0
  }

  #[test]
  fn bearer_parsing() {
    let mut headers = HeaderMap::new();
    assert_eq!(bearer_token(&headers), None);

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
    assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

    headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc"));
    assert_eq!(bearer_token(&headers), Some("abc"));

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
    assert_eq!(bearer_token(&headers), None);

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));
    assert_eq!(bearer_token(&headers), None);

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer    "));
    assert_eq!(bearer_token(&headers), None);
  }

  #[tokio::test]
  async fn valid_teacher_token() {
    let state = make_state().await;
    let teacher = TeacherId(seed(&state, Role::Teacher, "t@example.com").await);
    let token = state.tokens.issue(Principal::Teacher(teacher)).unwrap();
    let mut parts = request(Some(&format!("Bearer {token}")));

    let TeacherAuth(id) = TeacherAuth::from_request_parts(&mut parts, &state).await.unwrap();
    assert_eq!(id, teacher);
  }

  #[tokio::test]
  async fn token_for_unknown_identity() {
    let state = make_state().await;
    let token = state.tokens.issue(Principal::Teacher(TeacherId(7))).unwrap();

    let mut parts = request(Some(&format!("Bearer {token}")));
    let result = TeacherAuth::from_request_parts(&mut parts, &state).await;
    assert!(matches!(result, Err(ApiError::Unauthenticated)));

    // The signature alone is still enough for the role-agnostic extractor.
    let mut parts = request(Some(&format!("Bearer {token}")));
    let Authenticated(principal) =
      Authenticated::from_request_parts(&mut parts, &state).await.unwrap();
    assert_eq!(principal, Principal::Teacher(TeacherId(7)));
  }

  #[tokio::test]
  async fn missing_header() {
    let state = make_state().await;
    let mut parts = request(None);
    let result = Authenticated::from_request_parts(&mut parts, &state).await;
    assert!(matches!(result, Err(ApiError::Unauthenticated)));
  }

  #[tokio::test]
  async fn malformed_header_value() {
    let state = make_state().await;
    let mut parts = request(Some("Token whatever"));
    let result = Authenticated::from_request_parts(&mut parts, &state).await;
    assert!(matches!(result, Err(ApiError::Unauthenticated)));
  }

  #[tokio::test]
  async fn expired_token() {
    let state = make_state().await;
    let token = state
      .tokens
      .issue_at(Principal::Student(StudentId(1)), Utc::now() - Duration::hours(2))
      .unwrap();
    let mut parts = request(Some(&format!("Bearer {token}")));
    let result = StudentAuth::from_request_parts(&mut parts, &state).await;
    assert!(matches!(result, Err(ApiError::Unauthenticated)));
  }

  #[tokio::test]
  async fn role_mismatch_is_unauthenticated() {
    let state = make_state().await;
    let student = StudentId(seed(&state, Role::Student, "s@example.com").await);
    let token = state.tokens.issue(Principal::Student(student)).unwrap();

    let mut parts = request(Some(&format!("Bearer {token}")));
    let result = TeacherAuth::from_request_parts(&mut parts, &state).await;
    assert!(matches!(result, Err(ApiError::Unauthenticated)));

    let mut parts = request(Some(&format!("Bearer {token}")));
    let StudentAuth(id) = StudentAuth::from_request_parts(&mut parts, &state).await.unwrap();
    assert_eq!(id, student);
  }
}

//! Handlers for `/api/student` endpoints.

use axum::{Json, extract::State};
use roster_core::{
  enrollment::StudentClass,
  identity::{Profile, Role},
  store::ClassroomStore,
  workflow,
};
use serde_json::{Value, json};

use crate::{
  AppState,
  accounts::{self, LoginBody, SignupBody},
  auth::StudentAuth,
  error::ApiError,
  extract::JsonBody,
};

/// `POST /api/student/signup`
pub async fn signup<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<SignupBody>,
) -> Result<Json<Value>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  let session =
    accounts::signup(state.store.as_ref(), &state.tokens, Role::Student, body).await?;
  Ok(Json(json!({
    "message":    "Student signed up successfully",
    "student_id": session.id,
    "token":      session.token,
  })))
}

/// `POST /api/student/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<Value>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  let session =
    accounts::login(state.store.as_ref(), &state.tokens, Role::Student, body).await?;
  Ok(Json(json!({
    "message":    "Student logged in successfully",
    "student_id": session.id,
    "token":      session.token,
  })))
}

/// `GET /api/student/profile`
pub async fn profile<S>(
  State(state): State<AppState<S>>,
  StudentAuth(student): StudentAuth,
) -> Result<Json<Profile>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  Ok(Json(accounts::profile(state.store.as_ref(), student.into()).await?))
}

/// `GET /api/student/classes`: every class the student is enrolled in.
pub async fn classes<S>(
  State(state): State<AppState<S>>,
  StudentAuth(student): StudentAuth,
) -> Result<Json<Vec<StudentClass>>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  Ok(Json(workflow::enrollments_for_student(state.store.as_ref(), student).await?))
}

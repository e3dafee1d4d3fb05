//! Handlers for `/api/teacher` endpoints.
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | `POST` | `/teacher/signup` | none |
//! | `POST` | `/teacher/login` | none |
//! | `GET`  | `/teacher/profile` | teacher |
//! | `GET`  | `/teacher/class-requests` | teacher, owning at least one class |
//! | `GET`  | `/teacher/approved-students` | teacher, owning at least one class |

use axum::{Json, extract::State};
use roster_core::{
  enrollment::{EnrolledStudent, PendingRequest},
  identity::{Profile, Role},
  store::ClassroomStore,
  workflow,
};
use serde_json::{Value, json};

use crate::{
  AppState,
  accounts::{self, LoginBody, SignupBody},
  auth::TeacherAuth,
  error::ApiError,
  extract::JsonBody,
};

/// `POST /api/teacher/signup`
pub async fn signup<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<SignupBody>,
) -> Result<Json<Value>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  let session =
    accounts::signup(state.store.as_ref(), &state.tokens, Role::Teacher, body).await?;
  Ok(Json(json!({
    "message":    "Teacher signed up successfully",
    "teacher_id": session.id,
    "token":      session.token,
  })))
}

/// `POST /api/teacher/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<Value>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  let session =
    accounts::login(state.store.as_ref(), &state.tokens, Role::Teacher, body).await?;
  Ok(Json(json!({
    "message":    "Teacher logged in successfully",
    "teacher_id": session.id,
    "token":      session.token,
  })))
}

/// `GET /api/teacher/profile`
pub async fn profile<S>(
  State(state): State<AppState<S>>,
  TeacherAuth(teacher): TeacherAuth,
) -> Result<Json<Profile>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  Ok(Json(accounts::profile(state.store.as_ref(), teacher.into()).await?))
}

/// `GET /api/teacher/class-requests`
pub async fn class_requests<S>(
  State(state): State<AppState<S>>,
  TeacherAuth(teacher): TeacherAuth,
) -> Result<Json<Vec<PendingRequest>>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  Ok(Json(workflow::requests_for_teacher(state.store.as_ref(), teacher).await?))
}

/// `GET /api/teacher/approved-students`
pub async fn approved_students<S>(
  State(state): State<AppState<S>>,
  TeacherAuth(teacher): TeacherAuth,
) -> Result<Json<Vec<EnrolledStudent>>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  Ok(Json(workflow::enrollments_for_teacher(state.store.as_ref(), teacher).await?))
}

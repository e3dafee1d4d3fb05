//! Handlers for `/api/classes` endpoints.
//!
//! | Method   | Path | Auth | Notes |
//! |----------|------|------|-------|
//! | `GET`    | `/classes` | none | Every class |
//! | `POST`   | `/classes` | teacher | Body: [`ClassFields`] |
//! | `PUT`    | `/classes/{class_id}` | owner | Replaces title, description, image |
//! | `DELETE` | `/classes/{class_id}` | owner | Cascades to requests and enrollments |
//! | `POST`   | `/classes/{class_id}/approve/{student_id}` | owner | `REQUESTED -> ENROLLED` |
//! | `POST`   | `/classes/{class_id}/request` | student | `NONE -> REQUESTED` |

use axum::{Json, extract::State};
use roster_core::{
  class::{Class, ClassFields},
  id::{ClassId, StudentId},
  registry,
  store::ClassroomStore,
  workflow,
};
use serde_json::{Value, json};

use crate::{
  AppState,
  auth::{StudentAuth, TeacherAuth},
  error::ApiError,
  extract::{JsonBody, PathParams},
  handlers::message,
};

/// `GET /api/classes`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<Class>>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  Ok(Json(registry::list(state.store.as_ref()).await?))
}

/// `POST /api/classes`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  TeacherAuth(teacher): TeacherAuth,
  JsonBody(fields): JsonBody<ClassFields>,
) -> Result<Json<Value>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  let class = registry::create(state.store.as_ref(), teacher, fields).await?;
  tracing::info!(class_id = %class.id, teacher_id = %teacher, "class created");
  Ok(Json(json!({ "message": "Class created successfully", "class_id": class.id })))
}

/// `PUT /api/classes/{class_id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  TeacherAuth(teacher): TeacherAuth,
  PathParams(class_id): PathParams<ClassId>,
  JsonBody(fields): JsonBody<ClassFields>,
) -> Result<Json<Value>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  let class = registry::update(state.store.as_ref(), teacher, class_id, fields).await?;
  Ok(Json(json!({ "message": "Class updated successfully", "class_id": class.id })))
}

/// `DELETE /api/classes/{class_id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  TeacherAuth(teacher): TeacherAuth,
  PathParams(class_id): PathParams<ClassId>,
) -> Result<Json<Value>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  let class_id = registry::delete(state.store.as_ref(), teacher, class_id).await?;
  tracing::info!(class_id = %class_id, teacher_id = %teacher, "class deleted");
  Ok(Json(json!({ "message": "Class deleted successfully", "class_id": class_id })))
}

/// `POST /api/classes/{class_id}/approve/{student_id}`
pub async fn approve<S>(
  State(state): State<AppState<S>>,
  TeacherAuth(teacher): TeacherAuth,
  PathParams((class_id, student_id)): PathParams<(ClassId, StudentId)>,
) -> Result<Json<Value>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  let enrollment =
    workflow::approve(state.store.as_ref(), teacher, class_id, student_id).await?;
  tracing::info!(
    class_id = %class_id,
    student_id = %student_id,
    enrollment_id = %enrollment.id,
    "request approved"
  );
  Ok(message("Request approved successfully"))
}

/// `POST /api/classes/{class_id}/request`
pub async fn request<S>(
  State(state): State<AppState<S>>,
  StudentAuth(student): StudentAuth,
  PathParams(class_id): PathParams<ClassId>,
) -> Result<Json<Value>, ApiError>
where
  S: ClassroomStore + Clone + 'static,
{
  workflow::request(state.store.as_ref(), student, class_id).await?;
  Ok(message("Request sent successfully"))
}

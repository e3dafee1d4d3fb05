//! JSON HTTP API for Roster.
//!
//! Exposes an axum [`Router`] backed by any [`ClassroomStore`]: signup and
//! login for teachers and students, class management for teachers, and the
//! request/approve enrollment workflow.

pub mod accounts;
pub mod auth;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod token;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use roster_core::store::ClassroomStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use handlers::{classes, student, teacher};
use token::TokenService;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:         String,
  #[serde(default = "default_port")]
  pub port:         u16,
  #[serde(default = "default_store_path")]
  pub store_path:   PathBuf,
  /// HMAC key for signing tokens. Changing it logs everybody out.
  pub token_secret: String,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 9002 }

fn default_store_path() -> PathBuf { PathBuf::from("roster.sqlite") }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ClassroomStore> {
  pub store:  Arc<S>,
  pub tokens: Arc<TokenService>,
}

impl<S: ClassroomStore> AppState<S> {
  pub fn new(store: S, tokens: TokenService) -> Self {
    Self { store: Arc::new(store), tokens: Arc::new(tokens) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the API, mounted under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ClassroomStore + Clone + 'static,
{
  Router::new()
    // Classes
    .route("/api/classes",                                 get(classes::list::<S>).post(classes::create::<S>))
    .route("/api/classes/{class_id}",                      put(classes::update::<S>).delete(classes::delete::<S>))
    .route("/api/classes/{class_id}/approve/{student_id}", post(classes::approve::<S>))
    .route("/api/classes/{class_id}/request",              post(classes::request::<S>))
    // Teachers
    .route("/api/teacher/signup",            post(teacher::signup::<S>))
    .route("/api/teacher/login",             post(teacher::login::<S>))
    .route("/api/teacher/profile",           get(teacher::profile::<S>))
    .route("/api/teacher/class-requests",    get(teacher::class_requests::<S>))
    .route("/api/teacher/approved-students", get(teacher::approved_students::<S>))
    // Students
    .route("/api/student/signup",  post(student::signup::<S>))
    .route("/api/student/login",   post(student::login::<S>))
    .route("/api/student/profile", get(student::profile::<S>))
    .route("/api/student/classes", get(student::classes::<S>))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use roster_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState::new(store, TokenService::new(b"integration-secret"))
  }

  async fn call(
    state:  &AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    token:  Option<&str>,
    body:   Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    router(state.clone()).oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn signup_body(email: &str) -> Value {
    json!({
      "first_name": "Ada",
      "last_name":  "Lovelace",
      "email":      email,
      "password":   "hunter2",
    })
  }

  /// Sign up and return `(id, token)`.
  async fn signup(state: &AppState<SqliteStore>, role: &str, email: &str) -> (i64, String) {
    let resp = call(state, "POST", &format!("/api/{role}/signup"), None, Some(signup_body(email))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let id = body[format!("{role}_id")].as_i64().unwrap();
    (id, body["token"].as_str().unwrap().to_string())
  }

  async fn create_class(state: &AppState<SqliteStore>, token: &str, title: &str) -> i64 {
    let resp = call(state, "POST", "/api/classes", Some(token), Some(json!({ "title": title }))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    json_body(resp).await["class_id"].as_i64().unwrap()
  }

  // ── Accounts ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn signup_then_duplicate_is_400() {
    let state = make_state().await;
    signup(&state, "teacher", "ada@example.com").await;

    let resp = call(&state, "POST", "/api/teacher/signup", None, Some(signup_body("ada@example.com"))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      json_body(resp).await["error"],
      "Teacher with the same email already exists"
    );

    // Same email is free in the other role.
    signup(&state, "student", "ada@example.com").await;
  }

  #[tokio::test]
  async fn signup_rejects_invalid_input() {
    let state = make_state().await;
    let mut body = signup_body("not-an-email");
    let resp = call(&state, "POST", "/api/student/signup", None, Some(body.clone())).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    body["email"] = json!("ok@example.com");
    body["password"] = json!("");
    let resp = call(&state, "POST", "/api/student/signup", None, Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn login_and_profile() {
    let state = make_state().await;
    let (id, _) = signup(&state, "teacher", "ada@example.com").await;

    let resp = call(
      &state,
      "POST",
      "/api/teacher/login",
      None,
      Some(json!({ "email": "ada@example.com", "password": "hunter2" })),
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["teacher_id"], id);
    let token = body["token"].as_str().unwrap().to_string();

    let resp = call(&state, "GET", "/api/teacher/profile", Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let profile = json_body(resp).await;
    assert_eq!(profile["id"], id);
    assert_eq!(profile["email"], "ada@example.com");
    assert!(profile.get("password").is_none());
    assert!(profile.get("password_hash").is_none());
  }

  #[tokio::test]
  async fn login_failures_are_401() {
    let state = make_state().await;
    signup(&state, "student", "s@example.com").await;

    let wrong_password = json!({ "email": "s@example.com", "password": "nope" });
    let resp = call(&state, "POST", "/api/student/login", None, Some(wrong_password)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await["error"], "Invalid email or password");

    let unknown = json!({ "email": "ghost@example.com", "password": "hunter2" });
    let resp = call(&state, "POST", "/api/student/login", None, Some(unknown)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Student credentials do not open the teacher table.
    let cross = json!({ "email": "s@example.com", "password": "hunter2" });
    let resp = call(&state, "POST", "/api/teacher/login", None, Some(cross)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Authorization ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn protected_routes_require_token() {
    let state = make_state().await;
    for (method, uri) in [
      ("GET", "/api/teacher/profile"),
      ("GET", "/api/teacher/class-requests"),
      ("GET", "/api/teacher/approved-students"),
      ("GET", "/api/student/profile"),
      ("GET", "/api/student/classes"),
      ("POST", "/api/classes/1/request"),
      ("POST", "/api/classes/1/approve/1"),
      ("DELETE", "/api/classes/1"),
    ] {
      let resp = call(&state, method, uri, None, None).await;
      assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }

    let resp = call(&state, "GET", "/api/student/profile", Some("garbage"), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn wrong_role_is_401_not_403() {
    let state = make_state().await;
    let (_, student_token) = signup(&state, "student", "s@example.com").await;

    let resp = call(&state, "POST", "/api/classes", Some(&student_token), Some(json!({ "title": "Hack" }))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = call(&state, "GET", "/api/teacher/profile", Some(&student_token), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn expired_token_is_401() {
    let state = make_state().await;
    let (id, _) = signup(&state, "teacher", "t@example.com").await;
    let stale = state
      .tokens
      .issue_at(
        roster_core::identity::Principal::from_parts(id, roster_core::identity::Role::Teacher),
        chrono::Utc::now() - chrono::Duration::hours(2),
      )
      .unwrap();

    let resp = call(&state, "GET", "/api/teacher/profile", Some(&stale), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Classes ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn class_lifecycle() {
    let state = make_state().await;
    let (teacher_id, token) = signup(&state, "teacher", "t@example.com").await;
    let class_id = create_class(&state, &token, "Algebra").await;

    let resp = call(&state, "GET", "/api/classes", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let classes = json_body(resp).await;
    assert_eq!(classes[0]["id"], class_id);
    assert_eq!(classes[0]["teacher_id"], teacher_id);
    assert_eq!(classes[0]["title"], "Algebra");

    let resp = call(
      &state,
      "PUT",
      &format!("/api/classes/{class_id}"),
      Some(&token),
      Some(json!({ "title": "Algebra II", "description": "Harder", "image": "a.png" })),
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["class_id"], class_id);

    let classes = json_body(call(&state, "GET", "/api/classes", None, None).await).await;
    assert_eq!(classes[0]["title"], "Algebra II");
    assert_eq!(classes[0]["image"], "a.png");

    let resp = call(&state, "DELETE", &format!("/api/classes/{class_id}"), Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let classes = json_body(call(&state, "GET", "/api/classes", None, None).await).await;
    assert_eq!(classes, json!([]));
  }

  #[tokio::test]
  async fn missing_class_is_404_even_for_non_owner() {
    let state = make_state().await;
    let (_, token) = signup(&state, "teacher", "a@example.com").await;

    let resp = call(&state, "DELETE", "/api/classes/9999", Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["error"], "Class not found");

    let resp = call(&state, "PUT", "/api/classes/9999", Some(&token), Some(json!({ "title": "x" }))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = call(&state, "POST", "/api/classes/9999/approve/1", Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn non_owner_is_403() {
    let state = make_state().await;
    let (_, owner) = signup(&state, "teacher", "owner@example.com").await;
    let (_, intruder) = signup(&state, "teacher", "intruder@example.com").await;
    let class_id = create_class(&state, &owner, "Geometry").await;

    let resp = call(&state, "DELETE", &format!("/api/classes/{class_id}"), Some(&intruder), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = call(
      &state,
      "PUT",
      &format!("/api/classes/{class_id}"),
      Some(&intruder),
      Some(json!({ "title": "Mine now" })),
    ).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  // ── Enrollment workflow ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn request_approve_and_list() {
    let state = make_state().await;
    let (_, teacher) = signup(&state, "teacher", "t@example.com").await;
    let (student_id, student) = signup(&state, "student", "s@example.com").await;
    let class_id = create_class(&state, &teacher, "Physics").await;

    let resp = call(&state, "POST", &format!("/api/classes/{class_id}/request"), Some(&student), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["message"], "Request sent successfully");

    let resp = call(&state, "GET", "/api/teacher/class-requests", Some(&teacher), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let requests = json_body(resp).await;
    assert_eq!(requests.as_array().unwrap().len(), 1);
    assert_eq!(requests[0]["student_id"], student_id);
    assert_eq!(requests[0]["class_title"], "Physics");

    let approve_uri = format!("/api/classes/{class_id}/approve/{student_id}");
    let resp = call(&state, "POST", &approve_uri, Some(&teacher), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["message"], "Request approved successfully");

    // Second approval finds no request.
    let resp = call(&state, "POST", &approve_uri, Some(&teacher), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["error"], "Class request not found");

    let requests = json_body(call(&state, "GET", "/api/teacher/class-requests", Some(&teacher), None).await).await;
    assert_eq!(requests, json!([]));

    let resp = call(&state, "GET", "/api/teacher/approved-students", Some(&teacher), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let enrolled = json_body(resp).await;
    assert_eq!(enrolled.as_array().unwrap().len(), 1);
    assert_eq!(enrolled[0]["student_id"], student_id);
    assert_eq!(enrolled[0]["class_id"], class_id);

    let resp = call(&state, "GET", "/api/student/classes", Some(&student), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let mine = json_body(resp).await;
    assert_eq!(mine[0]["id"], class_id);
    assert_eq!(mine[0]["first_name"], "Ada");
  }

  #[tokio::test]
  async fn duplicate_request_is_400() {
    let state = make_state().await;
    let (_, teacher) = signup(&state, "teacher", "t@example.com").await;
    let (_, student) = signup(&state, "student", "s@example.com").await;
    let class_id = create_class(&state, &teacher, "Latin").await;

    let uri = format!("/api/classes/{class_id}/request");
    assert_eq!(call(&state, "POST", &uri, Some(&student), None).await.status(), StatusCode::OK);

    let resp = call(&state, "POST", &uri, Some(&student), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "Request already sent for this class");
  }

  #[tokio::test]
  async fn request_for_unknown_class_is_404() {
    let state = make_state().await;
    let (_, student) = signup(&state, "student", "s@example.com").await;
    let resp = call(&state, "POST", "/api/classes/404/request", Some(&student), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn teacher_without_classes_cannot_list() {
    let state = make_state().await;
    let (_, teacher) = signup(&state, "teacher", "t@example.com").await;

    let resp = call(&state, "GET", "/api/teacher/class-requests", Some(&teacher), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = call(&state, "GET", "/api/teacher/approved-students", Some(&teacher), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn approve_by_non_owner_is_403() {
    let state = make_state().await;
    let (_, owner) = signup(&state, "teacher", "owner@example.com").await;
    let (_, intruder) = signup(&state, "teacher", "intruder@example.com").await;
    let (student_id, student) = signup(&state, "student", "s@example.com").await;
    let class_id = create_class(&state, &owner, "Poetry").await;

    call(&state, "POST", &format!("/api/classes/{class_id}/request"), Some(&student), None).await;
    let resp = call(
      &state,
      "POST",
      &format!("/api/classes/{class_id}/approve/{student_id}"),
      Some(&intruder),
      None,
    ).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  // ── Malformed input ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn signup_with_missing_field_is_json_400() {
    let state = make_state().await;
    let body = json!({ "email": "a@b.c", "password": "x" });
    let resp = call(&state, "POST", "/api/teacher/signup", None, Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
    let error = json_body(resp).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("first_name"), "{error}");
  }

  #[tokio::test]
  async fn class_without_title_is_json_400() {
    let state = make_state().await;
    let (_, token) = signup(&state, "teacher", "t@example.com").await;
    let resp = call(&state, "POST", "/api/classes", Some(&token), Some(json!({}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn body_without_content_type_is_json_400() {
    let state = make_state().await;
    let req = Request::builder()
      .method("POST")
      .uri("/api/student/login")
      .body(Body::from(r#"{"email":"s@example.com","password":"x"}"#))
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn non_numeric_class_id_is_json_400() {
    let state = make_state().await;
    let (_, teacher) = signup(&state, "teacher", "t@example.com").await;
    let (_, student) = signup(&state, "student", "s@example.com").await;

    let resp = call(&state, "PUT", "/api/classes/abc", Some(&teacher), Some(json!({ "title": "x" }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
    assert!(json_body(resp).await["error"].is_string());

    let resp = call(&state, "POST", "/api/classes/1/approve/xyz", Some(&teacher), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());

    let resp = call(&state, "POST", "/api/classes/abc/request", Some(&student), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  // ── Vanished identities ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn token_for_missing_identity_is_401_everywhere() {
    use roster_core::{
      id::{StudentId, TeacherId},
      identity::Principal,
    };

    let state = make_state().await;
    let (_, owner) = signup(&state, "teacher", "owner@example.com").await;
    let class_id = create_class(&state, &owner, "Chemistry").await;

    let ghost_teacher = state.tokens.issue(Principal::Teacher(TeacherId(4242))).unwrap();
    let ghost_student = state.tokens.issue(Principal::Student(StudentId(4242))).unwrap();

    let resp = call(&state, "POST", "/api/classes", Some(&ghost_teacher), Some(json!({ "title": "x" }))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await["error"], "Authentication required");

    let resp = call(&state, "GET", "/api/teacher/profile", Some(&ghost_teacher), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let uri = format!("/api/classes/{class_id}/request");
    let resp = call(&state, "POST", &uri, Some(&ghost_student), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = call(&state, "GET", "/api/student/classes", Some(&ghost_student), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }
}

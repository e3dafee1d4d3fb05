pub mod classes;
pub mod student;
pub mod teacher;

use axum::Json;
use serde_json::{Value, json};

/// `{"message": ...}`, the body of operations with nothing else to return.
pub(super) fn message(text: &str) -> Json<Value> { Json(json!({ "message": text })) }

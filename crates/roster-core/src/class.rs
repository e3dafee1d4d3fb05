//! Classes: course offerings owned by exactly one teacher.

use serde::{Deserialize, Serialize};

use crate::id::{ClassId, TeacherId};

/// A persisted class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
  pub id:          ClassId,
  /// The owning teacher. Only this teacher may update, delete, or approve
  /// requests for the class.
  pub teacher_id:  TeacherId,
  pub title:       String,
  pub description: Option<String>,
  /// URL or path of a cover image; opaque to the backend.
  pub image:       Option<String>,
}

/// The editable fields of a class, used for both create and update. An update
/// replaces all three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFields {
  pub title:       String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub image:       Option<String>,
}

impl ClassFields {
  pub fn new(title: impl Into<String>) -> Self {
    Self { title: title.into(), description: None, image: None }
  }
}

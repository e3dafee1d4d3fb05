//! Join requests, enrollments, and the joined rows the listings return.
//!
//! Per `(student, class)` pair the lifecycle is `NONE -> REQUESTED ->
//! ENROLLED`. A [`ClassRequest`] row means `REQUESTED`; a [`Enrollment`] row
//! means `ENROLLED`. Approval deletes the former and inserts the latter in one
//! transaction, so the two never coexist for the same pair.

use serde::{Deserialize, Serialize};

use crate::id::{ClassId, EnrollmentId, RequestId, StudentId};

/// A pending, unapproved intent by a student to join a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRequest {
  pub id:         RequestId,
  pub student_id: StudentId,
  pub class_id:   ClassId,
}

/// Confirmed membership of a student in a class (`student_classes`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
  pub id:         EnrollmentId,
  pub student_id: StudentId,
  pub class_id:   ClassId,
}

// ─── Listing rows ────────────────────────────────────────────────────────────

/// A pending request joined with the requesting student and the class, as
/// shown to the owning teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
  pub request_id:        RequestId,
  pub student_id:        StudentId,
  pub first_name:        String,
  pub last_name:         String,
  pub email:             String,
  pub class_id:          ClassId,
  pub class_title:       String,
  pub class_description: Option<String>,
  pub class_image:       Option<String>,
}

/// An enrolled student joined with the class they attend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolledStudent {
  pub student_id:        StudentId,
  pub first_name:        String,
  pub last_name:         String,
  pub email:             String,
  pub class_id:          ClassId,
  pub class_title:       String,
  pub class_description: Option<String>,
  pub class_image:       Option<String>,
}

/// A class a student is enrolled in, with the owning teacher's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentClass {
  pub id:          ClassId,
  pub title:       String,
  pub description: Option<String>,
  pub image:       Option<String>,
  /// Teacher's first name.
  pub first_name:  String,
  /// Teacher's last name.
  pub last_name:   String,
}

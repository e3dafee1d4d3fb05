//! Mapping between SQLite rows and domain types.
//!
//! Ids are stored as plain `INTEGER` columns and wrapped in their typed
//! newtypes on the way out. Each decoder expects the column order of the
//! matching `*_COLUMNS` constant.

use roster_core::{
  class::Class,
  enrollment::{ClassRequest, EnrolledStudent, Enrollment, PendingRequest, StudentClass},
  id::{ClassId, EnrollmentId, RequestId, StudentId, TeacherId},
  identity::{Identity, Role},
};
use rusqlite::{ErrorCode, Row};

// ─── Role tables ─────────────────────────────────────────────────────────────

/// The table holding identities of `role`. Only ever interpolated from this
/// fixed set, never from caller input.
pub fn identity_table(role: Role) -> &'static str {
  match role {
    Role::Teacher => "teachers",
    Role::Student => "students",
  }
}

// ─── Constraint violations ───────────────────────────────────────────────────

/// `true` if `e` is a `UNIQUE` (or primary key) violation. Foreign-key and
/// `NOT NULL` failures share the primary `SQLITE_CONSTRAINT` code, so the
/// extended code has to be checked.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
  match e {
    rusqlite::Error::SqliteFailure(err, _) => {
      err.code == ErrorCode::ConstraintViolation
        && matches!(
          err.extended_code,
          rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )
    }
    _ => false,
  }
}

// ─── Identity ────────────────────────────────────────────────────────────────

pub const IDENTITY_COLUMNS: &str = "id, first_name, last_name, email, password";

pub fn identity(role: Role, row: &Row<'_>) -> rusqlite::Result<Identity> {
  Ok(Identity {
    id: row.get(0)?,
    role,
    first_name: row.get(1)?,
    last_name: row.get(2)?,
    email: row.get(3)?,
    password_hash: row.get(4)?,
  })
}

// ─── Class ───────────────────────────────────────────────────────────────────

pub const CLASS_COLUMNS: &str = "id, teacher_id, title, description, image";

pub fn class(row: &Row<'_>) -> rusqlite::Result<Class> {
  Ok(Class {
    id:          ClassId(row.get(0)?),
    teacher_id:  TeacherId(row.get(1)?),
    title:       row.get(2)?,
    description: row.get(3)?,
    image:       row.get(4)?,
  })
}

// ─── Requests and enrollments ────────────────────────────────────────────────

pub fn class_request(row: &Row<'_>) -> rusqlite::Result<ClassRequest> {
  Ok(ClassRequest {
    id:         RequestId(row.get(0)?),
    student_id: StudentId(row.get(1)?),
    class_id:   ClassId(row.get(2)?),
  })
}

pub fn enrollment(row: &Row<'_>) -> rusqlite::Result<Enrollment> {
  Ok(Enrollment {
    id:         EnrollmentId(row.get(0)?),
    student_id: StudentId(row.get(1)?),
    class_id:   ClassId(row.get(2)?),
  })
}

// ─── Joined listings ─────────────────────────────────────────────────────────

pub fn pending_request(row: &Row<'_>) -> rusqlite::Result<PendingRequest> {
  Ok(PendingRequest {
    request_id:        RequestId(row.get(0)?),
    student_id:        StudentId(row.get(1)?),
    first_name:        row.get(2)?,
    last_name:         row.get(3)?,
    email:             row.get(4)?,
    class_id:          ClassId(row.get(5)?),
    class_title:       row.get(6)?,
    class_description: row.get(7)?,
    class_image:       row.get(8)?,
  })
}

pub fn enrolled_student(row: &Row<'_>) -> rusqlite::Result<EnrolledStudent> {
  Ok(EnrolledStudent {
    student_id:        StudentId(row.get(0)?),
    first_name:        row.get(1)?,
    last_name:         row.get(2)?,
    email:             row.get(3)?,
    class_id:          ClassId(row.get(4)?),
    class_title:       row.get(5)?,
    class_description: row.get(6)?,
    class_image:       row.get(7)?,
  })
}

pub fn student_class(row: &Row<'_>) -> rusqlite::Result<StudentClass> {
  Ok(StudentClass {
    id:          ClassId(row.get(0)?),
    title:       row.get(1)?,
    description: row.get(2)?,
    image:       row.get(3)?,
    first_name:  row.get(4)?,
    last_name:   row.get(5)?,
  })
}

//! Identities and principals.
//!
//! Teachers and students are stored in separate tables with an identical shape,
//! so a single [`Identity`] type tagged with its [`Role`] describes both. A
//! [`Principal`] is the authenticated form of an identity: it is derived from a
//! validated token and never persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{StudentId, TeacherId};

// ─── Role ────────────────────────────────────────────────────────────────────

/// Which entity set an identity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Teacher,
  Student,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Teacher => "teacher",
      Self::Student => "student",
    }
  }

  /// Capitalised label used in user-facing messages.
  pub fn label(self) -> &'static str {
    match self {
      Self::Teacher => "Teacher",
      Self::Student => "Student",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Principal ───────────────────────────────────────────────────────────────

/// An authenticated caller. Each variant carries the row id in its own role's
/// table, so a teacher-only operation can demand a [`TeacherId`] and never be
/// handed a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Principal {
  Teacher(TeacherId),
  Student(StudentId),
}

impl Principal {
  /// Rebuild a principal from the raw `(subject_id, role)` pair carried in a
  /// token.
  pub fn from_parts(subject_id: i64, role: Role) -> Self {
    match role {
      Role::Teacher => Self::Teacher(TeacherId(subject_id)),
      Role::Student => Self::Student(StudentId(subject_id)),
    }
  }

  pub fn subject_id(self) -> i64 {
    match self {
      Self::Teacher(id) => id.get(),
      Self::Student(id) => id.get(),
    }
  }

  pub fn role(self) -> Role {
    match self {
      Self::Teacher(_) => Role::Teacher,
      Self::Student(_) => Role::Student,
    }
  }

  /// The teacher id, or `None` if this principal is a student.
  pub fn as_teacher(self) -> Option<TeacherId> {
    match self {
      Self::Teacher(id) => Some(id),
      Self::Student(_) => None,
    }
  }

  /// The student id, or `None` if this principal is a teacher.
  pub fn as_student(self) -> Option<StudentId> {
    match self {
      Self::Student(id) => Some(id),
      Self::Teacher(_) => None,
    }
  }
}

impl From<TeacherId> for Principal {
  fn from(id: TeacherId) -> Self { Self::Teacher(id) }
}

impl From<StudentId> for Principal {
  fn from(id: StudentId) -> Self { Self::Student(id) }
}

// ─── Identity records ────────────────────────────────────────────────────────

/// A stored teacher or student, including the password hash.
///
/// Deliberately not `Serialize`; use [`Identity::profile`] for anything that
/// leaves the process.
#[derive(Debug, Clone)]
pub struct Identity {
  pub id:            i64,
  pub role:          Role,
  pub first_name:    String,
  pub last_name:     String,
  /// Unique within the identity's own role table only.
  pub email:         String,
  /// Opaque PHC string produced by the credential hasher.
  pub password_hash: String,
}

impl Identity {
  pub fn principal(&self) -> Principal { Principal::from_parts(self.id, self.role) }

  pub fn profile(&self) -> Profile {
    Profile {
      id:         self.id,
      first_name: self.first_name.clone(),
      last_name:  self.last_name.clone(),
      email:      self.email.clone(),
    }
  }
}

/// Input to [`crate::store::ClassroomStore::create_identity`]. The password
/// must already be hashed; the store never sees plaintext.
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  pub password_hash: String,
}

/// The public projection of an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub id:         i64,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn role_accessors_only_match_their_own_variant() {
    let teacher = Principal::from_parts(7, Role::Teacher);
    assert_eq!(teacher.as_teacher(), Some(TeacherId(7)));
    assert_eq!(teacher.as_student(), None);

    let student = Principal::from_parts(7, Role::Student);
    assert_eq!(student.as_student(), Some(StudentId(7)));
    assert_eq!(student.as_teacher(), None);
  }

  #[test]
  fn principal_parts_round_trip() {
    let p = Principal::Student(StudentId(12));
    assert_eq!(Principal::from_parts(p.subject_id(), p.role()), p);
  }

  #[test]
  fn role_serialises_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
    let role: Role = serde_json::from_str("\"student\"").unwrap();
    assert_eq!(role, Role::Student);
  }

  #[test]
  fn profile_omits_password_hash() {
    let identity = Identity {
      id:            3,
      role:          Role::Teacher,
      first_name:    "Ada".into(),
      last_name:     "Lovelace".into(),
      email:         "ada@example.com".into(),
      password_hash: "$argon2id$secret".into(),
    };
    let json = serde_json::to_value(identity.profile()).unwrap();
    assert!(json.get("password_hash").is_none());
    assert_eq!(json["email"], "ada@example.com");
    assert_eq!(identity.principal(), Principal::Teacher(TeacherId(3)));
  }
}

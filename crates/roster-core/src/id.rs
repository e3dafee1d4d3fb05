//! Typed row identifiers.
//!
//! Every persisted entity is keyed by a SQLite `INTEGER PRIMARY KEY`. Wrapping
//! each in its own newtype keeps a `StudentId` from being passed where a
//! `ClassId` is expected. All of them serialise as bare integers.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! row_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
      Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl $name {
      pub fn get(self) -> i64 { self.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
      }
    }
  };
}

row_id!(
  /// Primary key of a row in `teachers`.
  TeacherId
);
row_id!(
  /// Primary key of a row in `students`.
  StudentId
);
row_id!(
  /// Primary key of a row in `classes`.
  ClassId
);
row_id!(
  /// Primary key of a row in `class_requests`.
  RequestId
);
row_id!(
  /// Primary key of a row in `student_classes`.
  EnrollmentId
);

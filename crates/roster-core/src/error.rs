//! Error types for `roster-core`.

use thiserror::Error;

use crate::{
  id::{ClassId, StudentId, TeacherId},
  identity::Role,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Class not found")]
  ClassNotFound(ClassId),

  #[error("Class request not found")]
  RequestNotFound { student: StudentId, class: ClassId },

  #[error("Not authorized to manage this class")]
  NotClassOwner { teacher: TeacherId, class: ClassId },

  #[error("Not authorized: teacher owns no classes")]
  NoOwnedClasses(TeacherId),

  #[error("Request already sent for this class")]
  DuplicateRequest { student: StudentId, class: ClassId },

  #[error("{} with the same email already exists", .role.label())]
  DuplicateEmail { role: Role, email: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification of an [`Error`], used by transport layers to pick a
/// status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Authenticated, but not the owner of (or otherwise eligible for) the
  /// target.
  Forbidden,
  /// A referenced entity is absent.
  NotFound,
  /// A uniqueness rule would be broken.
  Conflict,
  /// Persistence failure.
  Internal,
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::ClassNotFound(_) | Self::RequestNotFound { .. } => ErrorKind::NotFound,
      Self::NotClassOwner { .. } | Self::NoOwnedClasses(_) => ErrorKind::Forbidden,
      Self::DuplicateRequest { .. } | Self::DuplicateEmail { .. } => ErrorKind::Conflict,
      Self::Store(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

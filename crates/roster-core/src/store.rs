//! The `ClassroomStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! It exposes plain persistence primitives; the ownership and state-machine
//! rules live in [`crate::registry`] and [`crate::workflow`], which are written
//! against this abstraction rather than any concrete backend.

use std::future::Future;

use crate::{
  class::{Class, ClassFields},
  enrollment::{ClassRequest, EnrolledStudent, Enrollment, PendingRequest, StudentClass},
  id::{ClassId, StudentId, TeacherId},
  identity::{Identity, NewIdentity, Role},
};

/// Abstraction over a roster persistence backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ClassroomStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Identities ────────────────────────────────────────────────────────

  /// Insert a teacher or student. Returns `None` if the email is already
  /// taken within that role's table.
  fn create_identity(
    &self,
    role: Role,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// Look up an identity by email within one role's table.
  fn find_identity_by_email<'a>(
    &'a self,
    role: Role,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;

  /// Look up an identity by row id within one role's table.
  fn get_identity(
    &self,
    role: Role,
    id: i64,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  // ── Classes ───────────────────────────────────────────────────────────

  /// Every class, ordered by id.
  fn list_classes(
    &self,
  ) -> impl Future<Output = Result<Vec<Class>, Self::Error>> + Send + '_;

  fn get_class(
    &self,
    id: ClassId,
  ) -> impl Future<Output = Result<Option<Class>, Self::Error>> + Send + '_;

  fn create_class(
    &self,
    owner: TeacherId,
    fields: ClassFields,
  ) -> impl Future<Output = Result<Class, Self::Error>> + Send + '_;

  /// Replace the editable fields. Returns `None` if the class does not exist.
  fn update_class(
    &self,
    id: ClassId,
    fields: ClassFields,
  ) -> impl Future<Output = Result<Option<Class>, Self::Error>> + Send + '_;

  /// Delete a class together with its pending requests and enrollments.
  /// Returns `false` if the class did not exist.
  fn delete_class(
    &self,
    id: ClassId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Ids of every class owned by `owner`, ordered by id.
  fn owned_class_ids(
    &self,
    owner: TeacherId,
  ) -> impl Future<Output = Result<Vec<ClassId>, Self::Error>> + Send + '_;

  // ── Requests and enrollments ──────────────────────────────────────────

  /// The open request for the pair, if any.
  fn find_request(
    &self,
    student: StudentId,
    class: ClassId,
  ) -> impl Future<Output = Result<Option<ClassRequest>, Self::Error>> + Send + '_;

  /// Insert a pending request. Returns `None` if one is already open for the
  /// pair.
  fn create_request(
    &self,
    student: StudentId,
    class: ClassId,
  ) -> impl Future<Output = Result<Option<ClassRequest>, Self::Error>> + Send + '_;

  /// Atomically consume the pending request for the pair and record the
  /// enrollment. Returns `None`, with nothing written, if no request is open.
  ///
  /// If the pair is already enrolled the request is still consumed and the
  /// existing enrollment is returned; enrollments are unique per pair.
  fn approve_request(
    &self,
    student: StudentId,
    class: ClassId,
  ) -> impl Future<Output = Result<Option<Enrollment>, Self::Error>> + Send + '_;

  // ── Listings ──────────────────────────────────────────────────────────

  /// Pending requests for any class owned by `owner`.
  fn pending_requests_for(
    &self,
    owner: TeacherId,
  ) -> impl Future<Output = Result<Vec<PendingRequest>, Self::Error>> + Send + '_;

  /// Enrolled students across every class owned by `owner`.
  fn enrolled_students_for(
    &self,
    owner: TeacherId,
  ) -> impl Future<Output = Result<Vec<EnrolledStudent>, Self::Error>> + Send + '_;

  /// Classes `student` is enrolled in, with the owning teacher's name.
  fn classes_for_student(
    &self,
    student: StudentId,
  ) -> impl Future<Output = Result<Vec<StudentClass>, Self::Error>> + Send + '_;
}

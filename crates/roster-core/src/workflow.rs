//! The enrollment state machine.
//!
//! ```text
//! NONE --request--> REQUESTED --approve--> ENROLLED
//! ```
//!
//! There is no transition out of `ENROLLED` and no reject or withdraw path.
//! `request` does not look at `ENROLLED`: an enrolled student may request the
//! same class again, and approving that request leaves the single existing
//! enrollment in place.

use crate::{
  Error, Result,
  enrollment::{ClassRequest, EnrolledStudent, Enrollment, PendingRequest, StudentClass},
  id::{ClassId, StudentId, TeacherId},
  registry::owned_class,
  store::ClassroomStore,
};

/// `NONE -> REQUESTED`.
pub async fn request<S: ClassroomStore>(
  store: &S,
  student: StudentId,
  class_id: ClassId,
) -> Result<ClassRequest> {
  store
    .get_class(class_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ClassNotFound(class_id))?;

  let duplicate = Error::DuplicateRequest { student, class: class_id };
  if store.find_request(student, class_id).await.map_err(Error::store)?.is_some() {
    return Err(duplicate);
  }

  // Two racing requests can both pass the check; the store's uniqueness
  // decides between them.
  store
    .create_request(student, class_id)
    .await
    .map_err(Error::store)?
    .ok_or(duplicate)
}

/// `REQUESTED -> ENROLLED`. The request is consumed and the enrollment written
/// as one unit, so a second call for the same pair finds no request.
pub async fn approve<S: ClassroomStore>(
  store: &S,
  teacher: TeacherId,
  class_id: ClassId,
  student: StudentId,
) -> Result<Enrollment> {
  owned_class(store, teacher, class_id).await?;

  store
    .approve_request(student, class_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::RequestNotFound { student, class: class_id })
}

pub async fn requests_for_teacher<S: ClassroomStore>(
  store: &S,
  teacher: TeacherId,
) -> Result<Vec<PendingRequest>> {
  require_owned_classes(store, teacher).await?;
  store.pending_requests_for(teacher).await.map_err(Error::store)
}

pub async fn enrollments_for_teacher<S: ClassroomStore>(
  store: &S,
  teacher: TeacherId,
) -> Result<Vec<EnrolledStudent>> {
  require_owned_classes(store, teacher).await?;
  store.enrolled_students_for(teacher).await.map_err(Error::store)
}

pub async fn enrollments_for_student<S: ClassroomStore>(
  store: &S,
  student: StudentId,
) -> Result<Vec<StudentClass>> {
  store.classes_for_student(student).await.map_err(Error::store)
}

/// Teacher listings are refused outright for a teacher with no classes.
async fn require_owned_classes<S: ClassroomStore>(
  store: &S,
  teacher: TeacherId,
) -> Result<()> {
  let owned = store.owned_class_ids(teacher).await.map_err(Error::store)?;
  if owned.is_empty() {
    return Err(Error::NoOwnedClasses(teacher));
  }
  Ok(())
}

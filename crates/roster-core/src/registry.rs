//! Class registry rules.
//!
//! Mutations require a [`TeacherId`], so a student can never reach them. For
//! every mutation existence is checked before ownership: a class that does not
//! exist is [`Error::ClassNotFound`] no matter who asks.

use crate::{
  Error, Result,
  class::{Class, ClassFields},
  id::{ClassId, TeacherId},
  store::ClassroomStore,
};

/// Every class, for the public listing.
pub async fn list<S: ClassroomStore>(store: &S) -> Result<Vec<Class>> {
  store.list_classes().await.map_err(Error::store)
}

pub async fn create<S: ClassroomStore>(
  store: &S,
  owner: TeacherId,
  fields: ClassFields,
) -> Result<Class> {
  store.create_class(owner, fields).await.map_err(Error::store)
}

pub async fn update<S: ClassroomStore>(
  store: &S,
  owner: TeacherId,
  class_id: ClassId,
  fields: ClassFields,
) -> Result<Class> {
  owned_class(store, owner, class_id).await?;
  store
    .update_class(class_id, fields)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ClassNotFound(class_id))
}

pub async fn delete<S: ClassroomStore>(
  store: &S,
  owner: TeacherId,
  class_id: ClassId,
) -> Result<ClassId> {
  owned_class(store, owner, class_id).await?;
  if store.delete_class(class_id).await.map_err(Error::store)? {
    Ok(class_id)
  } else {
    Err(Error::ClassNotFound(class_id))
  }
}

/// Fetch a class and check that `owner` owns it.
pub async fn owned_class<S: ClassroomStore>(
  store: &S,
  owner: TeacherId,
  class_id: ClassId,
) -> Result<Class> {
  let class = store
    .get_class(class_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ClassNotFound(class_id))?;

  if class.teacher_id != owner {
    return Err(Error::NotClassOwner { teacher: owner, class: class_id });
  }
  Ok(class)
}

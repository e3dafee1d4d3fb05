//! [`SqliteStore`], the SQLite implementation of [`ClassroomStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, TransactionBehavior};

use roster_core::{
  class::{Class, ClassFields},
  enrollment::{ClassRequest, EnrolledStudent, Enrollment, PendingRequest, StudentClass},
  id::{ClassId, RequestId, StudentId, TeacherId},
  identity::{Identity, NewIdentity, Role},
  store::ClassroomStore,
};

use crate::{
  Error, Result,
  rows::{self, CLASS_COLUMNS, IDENTITY_COLUMNS, identity_table, is_unique_violation},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

#[cfg(test)]
impl SqliteStore {
  pub(crate) async fn find_enrollment(
    &self,
    student: StudentId,
    class:   ClassId,
  ) -> Result<Option<Enrollment>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT id, student_id, class_id FROM student_classes
                 WHERE student_id = ?1 AND class_id = ?2",
                rusqlite::params![student.get(), class.get()],
                rows::enrollment,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  /// Run raw SQL against the underlying connection.
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ClassroomStore impl ─────────────────────────────────────────────────────

impl ClassroomStore for SqliteStore {
  type Error = Error;

  // ── Identities ────────────────────────────────────────────────────────────

  async fn create_identity(
    &self,
    role:  Role,
    input: NewIdentity,
  ) -> Result<Option<Identity>> {
    let table = identity_table(role);

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          &format!(
            "INSERT INTO {table} (first_name, last_name, email, password)
             VALUES (?1, ?2, ?3, ?4)"
          ),
          rusqlite::params![
            input.first_name,
            input.last_name,
            input.email,
            input.password_hash,
          ],
        );
        match inserted {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_unique_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match id {
      Some(id) => self.get_identity(role, id).await,
      None => Ok(None),
    }
  }

  async fn find_identity_by_email(
    &self,
    role:  Role,
    email: &str,
  ) -> Result<Option<Identity>> {
    let table = identity_table(role);
    let email = email.to_owned();

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!("SELECT {IDENTITY_COLUMNS} FROM {table} WHERE email = ?1"),
                rusqlite::params![email],
                |row| rows::identity(role, row),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn get_identity(&self, role: Role, id: i64) -> Result<Option<Identity>> {
    let table = identity_table(role);

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!("SELECT {IDENTITY_COLUMNS} FROM {table} WHERE id = ?1"),
                rusqlite::params![id],
                |row| rows::identity(role, row),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  // ── Classes ───────────────────────────────────────────────────────────────

  async fn list_classes(&self) -> Result<Vec<Class>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt =
            conn.prepare(&format!("SELECT {CLASS_COLUMNS} FROM classes ORDER BY id"))?;
          let classes = stmt
            .query_map([], rows::class)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(classes)
        })
        .await?,
    )
  }

  async fn get_class(&self, id: ClassId) -> Result<Option<Class>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!("SELECT {CLASS_COLUMNS} FROM classes WHERE id = ?1"),
                rusqlite::params![id.get()],
                rows::class,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn create_class(&self, owner: TeacherId, fields: ClassFields) -> Result<Class> {
    let ClassFields { title, description, image } = fields;

    let id: i64 = self
      .conn
      .call({
        let (title, description, image) =
          (title.clone(), description.clone(), image.clone());
        move |conn| {
          conn.execute(
            "INSERT INTO classes (teacher_id, title, description, image)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![owner.get(), title, description, image],
          )?;
          Ok(conn.last_insert_rowid())
        }
      })
      .await?;

    Ok(Class { id: ClassId(id), teacher_id: owner, title, description, image })
  }

  async fn update_class(&self, id: ClassId, fields: ClassFields) -> Result<Option<Class>> {
    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE classes SET title = ?1, description = ?2, image = ?3 WHERE id = ?4",
          rusqlite::params![fields.title, fields.description, fields.image, id.get()],
        )?)
      })
      .await?;

    if updated == 0 {
      return Ok(None);
    }
    self.get_class(id).await
  }

  async fn delete_class(&self, id: ClassId) -> Result<bool> {
    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM classes WHERE id = ?1",
          rusqlite::params![id.get()],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn owned_class_ids(&self, owner: TeacherId) -> Result<Vec<ClassId>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt =
            conn.prepare("SELECT id FROM classes WHERE teacher_id = ?1 ORDER BY id")?;
          let ids = stmt
            .query_map(rusqlite::params![owner.get()], |row| Ok(ClassId(row.get(0)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(ids)
        })
        .await?,
    )
  }

  // ── Requests and enrollments ──────────────────────────────────────────────

  async fn find_request(
    &self,
    student: StudentId,
    class:   ClassId,
  ) -> Result<Option<ClassRequest>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT id, student_id, class_id FROM class_requests
                 WHERE student_id = ?1 AND class_id = ?2",
                rusqlite::params![student.get(), class.get()],
                rows::class_request,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn create_request(
    &self,
    student: StudentId,
    class:   ClassId,
  ) -> Result<Option<ClassRequest>> {
    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO class_requests (student_id, class_id) VALUES (?1, ?2)",
          rusqlite::params![student.get(), class.get()],
        );
        match inserted {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_unique_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(id.map(|id| ClassRequest {
      id:         RequestId(id),
      student_id: student,
      class_id:   class,
    }))
  }

  async fn approve_request(
    &self,
    student: StudentId,
    class:   ClassId,
  ) -> Result<Option<Enrollment>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          // IMMEDIATE takes the write lock up front, so no other writer can
          // slip in between the lookup and the delete.
          let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

          let request_id: Option<i64> = tx
            .query_row(
              "SELECT id FROM class_requests WHERE student_id = ?1 AND class_id = ?2",
              rusqlite::params![student.get(), class.get()],
              |row| row.get(0),
            )
            .optional()?;

          // Dropping `tx` rolls back; nothing has been written.
          let Some(request_id) = request_id else {
            return Ok(None);
          };

          tx.execute(
            "DELETE FROM class_requests WHERE id = ?1",
            rusqlite::params![request_id],
          )?;
          tx.execute(
            "INSERT OR IGNORE INTO student_classes (student_id, class_id) VALUES (?1, ?2)",
            rusqlite::params![student.get(), class.get()],
          )?;
          let enrollment = tx.query_row(
            "SELECT id, student_id, class_id FROM student_classes
             WHERE student_id = ?1 AND class_id = ?2",
            rusqlite::params![student.get(), class.get()],
            rows::enrollment,
          )?;

          tx.commit()?;
          Ok(Some(enrollment))
        })
        .await?,
    )
  }

  // ── Listings ──────────────────────────────────────────────────────────────

  async fn pending_requests_for(&self, owner: TeacherId) -> Result<Vec<PendingRequest>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(
            "SELECT
               cr.id AS request_id, s.id AS student_id,
               s.first_name, s.last_name, s.email,
               c.id AS class_id, c.title AS class_title,
               c.description AS class_description, c.image AS class_image
             FROM class_requests cr
             INNER JOIN students s ON cr.student_id = s.id
             INNER JOIN classes  c ON cr.class_id   = c.id
             WHERE c.teacher_id = ?1
             ORDER BY cr.id",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![owner.get()], rows::pending_request)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn enrolled_students_for(&self, owner: TeacherId) -> Result<Vec<EnrolledStudent>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(
            "SELECT
               s.id AS student_id, s.first_name, s.last_name, s.email,
               c.id AS class_id, c.title AS class_title,
               c.description AS class_description, c.image AS class_image
             FROM students s
             INNER JOIN student_classes sc ON s.id        = sc.student_id
             INNER JOIN classes         c  ON sc.class_id = c.id
             WHERE c.teacher_id = ?1
             ORDER BY sc.id",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![owner.get()], rows::enrolled_student)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn classes_for_student(&self, student: StudentId) -> Result<Vec<StudentClass>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(
            "SELECT c.id, c.title, c.description, c.image, t.first_name, t.last_name
             FROM classes c
             INNER JOIN student_classes sc ON c.id         = sc.class_id
             INNER JOIN teachers        t  ON c.teacher_id = t.id
             WHERE sc.student_id = ?1
             ORDER BY sc.id",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![student.get()], rows::student_class)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }
}

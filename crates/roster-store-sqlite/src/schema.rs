//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `foreign_keys` is a per-connection setting, so it lives here rather than in
/// the database file.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Email is unique per role table, not across both.
CREATE TABLE IF NOT EXISTS teachers (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name  TEXT NOT NULL,
    email      TEXT NOT NULL UNIQUE,
    password   TEXT NOT NULL          -- PHC hash string, never plaintext
);

CREATE TABLE IF NOT EXISTS students (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name  TEXT NOT NULL,
    email      TEXT NOT NULL UNIQUE,
    password   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS classes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    teacher_id  INTEGER NOT NULL REFERENCES teachers(id),
    title       TEXT NOT NULL,
    description TEXT,
    image       TEXT
);

-- Enrollments. At most one per (student, class).
CREATE TABLE IF NOT EXISTS student_classes (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students(id),
    class_id   INTEGER NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
    UNIQUE (student_id, class_id)
);

-- Pending requests. At most one open request per (student, class).
CREATE TABLE IF NOT EXISTS class_requests (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students(id),
    class_id   INTEGER NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
    UNIQUE (student_id, class_id)
);

CREATE INDEX IF NOT EXISTS classes_teacher_idx         ON classes(teacher_id);
CREATE INDEX IF NOT EXISTS class_requests_class_idx    ON class_requests(class_id);
CREATE INDEX IF NOT EXISTS student_classes_class_idx   ON student_classes(class_id);
CREATE INDEX IF NOT EXISTS student_classes_student_idx ON student_classes(student_id);

PRAGMA user_version = 1;
";

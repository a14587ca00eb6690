//! Student/subject repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Look up students and subjects referenced by tasks.
//! - Auto-create placeholder records for unknown ids.
//!
//! # Invariants
//! - `ensure_*` is a single `INSERT OR IGNORE`, so concurrent callers never
//!   create duplicates or overwrite an existing record.
//! - Auto-created subjects carry `DEFAULT_SUBJECT_DIFFICULTY`.

use crate::model::directory::{Student, Subject};
use crate::repo::{ensure_tables, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Record returned by `ensure_*`, flagging whether it was just inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensured<T> {
    pub record: T,
    pub created: bool,
}

/// Repository interface for the student/subject directory.
pub trait DirectoryRepository {
    fn get_student(&self, id: &str) -> RepoResult<Option<Student>>;
    /// Returns the student, inserting a placeholder when absent.
    fn ensure_student(&self, id: &str) -> RepoResult<Ensured<Student>>;
    fn get_subject(&self, id: &str) -> RepoResult<Option<Subject>>;
    /// Returns the subject, inserting a placeholder when absent.
    fn ensure_subject(&self, id: &str) -> RepoResult<Ensured<Subject>>;
    /// Inserts or replaces name and difficulty for one subject.
    fn upsert_subject(&self, subject: &Subject) -> RepoResult<()>;
    /// Lists subjects ordered by id.
    fn list_subjects(&self) -> RepoResult<Vec<Subject>>;
}

/// SQLite-backed directory repository.
pub struct SqliteDirectoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDirectoryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["students", "subjects"])?;
        Ok(Self { conn })
    }
}

impl DirectoryRepository for SqliteDirectoryRepository<'_> {
    fn get_student(&self, id: &str) -> RepoResult<Option<Student>> {
        let student = self
            .conn
            .query_row(
                "SELECT student_id, full_name FROM students WHERE student_id = ?1;",
                [id],
                |row| {
                    Ok(Student {
                        id: row.get("student_id")?,
                        full_name: row.get("full_name")?,
                    })
                },
            )
            .optional()?;
        Ok(student)
    }

    fn ensure_student(&self, id: &str) -> RepoResult<Ensured<Student>> {
        let placeholder = Student::placeholder(id);
        placeholder.validate()?;

        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO students (student_id, full_name) VALUES (?1, ?2);",
            params![placeholder.id.as_str(), placeholder.full_name.as_str()],
        )?;
        let record = self.get_student(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("student `{id}` missing after insert"))
        })?;

        Ok(Ensured {
            record,
            created: inserted == 1,
        })
    }

    fn get_subject(&self, id: &str) -> RepoResult<Option<Subject>> {
        let mut stmt = self.conn.prepare(
            "SELECT subject_id, name, difficulty FROM subjects WHERE subject_id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_subject_row(row)?));
        }
        Ok(None)
    }

    fn ensure_subject(&self, id: &str) -> RepoResult<Ensured<Subject>> {
        let placeholder = Subject::placeholder(id);
        placeholder.validate()?;

        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO subjects (subject_id, name, difficulty) VALUES (?1, ?2, ?3);",
            params![
                placeholder.id.as_str(),
                placeholder.name.as_str(),
                placeholder.difficulty
            ],
        )?;
        let record = self.get_subject(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("subject `{id}` missing after insert"))
        })?;

        Ok(Ensured {
            record,
            created: inserted == 1,
        })
    }

    fn upsert_subject(&self, subject: &Subject) -> RepoResult<()> {
        subject.validate()?;

        self.conn.execute(
            "INSERT INTO subjects (subject_id, name, difficulty) VALUES (?1, ?2, ?3)
             ON CONFLICT (subject_id) DO UPDATE SET
                name = excluded.name,
                difficulty = excluded.difficulty;",
            params![subject.id.as_str(), subject.name.as_str(), subject.difficulty],
        )?;
        Ok(())
    }

    fn list_subjects(&self) -> RepoResult<Vec<Subject>> {
        let mut stmt = self.conn.prepare(
            "SELECT subject_id, name, difficulty FROM subjects ORDER BY subject_id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next()? {
            subjects.push(parse_subject_row(row)?);
        }
        Ok(subjects)
    }
}

fn parse_subject_row(row: &Row<'_>) -> RepoResult<Subject> {
    let subject = Subject {
        id: row.get("subject_id")?,
        name: row.get("name")?,
        difficulty: row.get("difficulty")?,
    };
    subject.validate().map_err(|err| {
        RepoError::InvalidData(format!("subject `{}`: {err}", subject.id))
    })?;
    Ok(subject)
}

//! Shared in-memory tables.
//!
//! Mirrors the three relational tables and the constraints the PostgreSQL
//! schema enforces: generated keys, the `(person_id, course_id)` primary
//! key, and both foreign keys of `person_course`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::domain::foundation::{CourseId, DomainError, PersonId};
use crate::domain::person::PersonType;

/// Scalar columns of a stored person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PersonRecord {
    pub first_name: String,
    pub last_name: String,
    pub person_type: PersonType,
    pub age: i32,
}

impl PersonRecord {
    pub fn last_name_matches(&self, last_name: &str) -> bool {
        self.last_name.to_lowercase() == last_name.to_lowercase()
    }
}

/// The full table set. Cloned wholesale to stage a transaction.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub courses: BTreeMap<CourseId, String>,
    pub persons: BTreeMap<PersonId, PersonRecord>,
    pub enrollments: BTreeSet<(PersonId, CourseId)>,
    last_course_id: i32,
    last_person_id: i32,
}

impl Tables {
    pub fn insert_course(&mut self, name: &str) -> CourseId {
        self.last_course_id += 1;
        let id = CourseId::new(self.last_course_id);
        self.courses.insert(id, name.to_string());
        id
    }

    pub fn insert_person(&mut self, record: PersonRecord) -> PersonId {
        self.last_person_id += 1;
        let id = PersonId::new(self.last_person_id);
        self.persons.insert(id, record);
        id
    }

    /// Adds one `person_course` row, enforcing the same constraints as the
    /// relational schema. The error string mimics the database message.
    pub fn enroll(&mut self, person_id: PersonId, course_id: CourseId) -> Result<(), String> {
        if !self.persons.contains_key(&person_id) {
            return Err(format!(
                "insert on person_course violates foreign key constraint: person {} does not exist",
                person_id
            ));
        }
        if !self.courses.contains_key(&course_id) {
            return Err(format!(
                "insert on person_course violates foreign key constraint: course {} does not exist",
                course_id
            ));
        }
        if !self.enrollments.insert((person_id, course_id)) {
            return Err(format!(
                "duplicate key value violates unique constraint: ({}, {}) already exists",
                person_id, course_id
            ));
        }
        Ok(())
    }

    /// Removes every enrollment of `person_id`, returning how many went.
    pub fn unenroll_all(&mut self, person_id: PersonId) -> usize {
        let before = self.enrollments.len();
        self.enrollments.retain(|(person, _)| *person != person_id);
        before - self.enrollments.len()
    }

    /// Course ids of a person in ascending order.
    pub fn course_ids_of(&self, person_id: PersonId) -> Vec<CourseId> {
        self.enrollments
            .iter()
            .filter(|(person, _)| *person == person_id)
            .map(|(_, course)| *course)
            .collect()
    }

    pub fn course_is_referenced(&self, course_id: CourseId) -> bool {
        self.enrollments.iter().any(|(_, course)| *course == course_id)
    }

    /// Ids of persons whose last name matches, ascending.
    pub fn persons_named(&self, last_name: &str) -> Vec<PersonId> {
        self.persons
            .iter()
            .filter(|(_, record)| record.last_name_matches(last_name))
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Handle to the shared tables. Clones share the same storage, so a course
/// repository and a person repository built from one database see each
/// other's rows the way two PostgreSQL repositories sharing a pool do.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    /// Runs `work` against a scratch copy of the tables and publishes the
    /// copy only if `work` succeeds. Writers are serialized by the lock.
    pub(crate) async fn transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut Tables) -> Result<T, DomainError>,
    {
        let mut guard = self.tables.write().await;
        let mut scratch = guard.clone();
        let value = work(&mut scratch)?;
        *guard = scratch;
        Ok(value)
    }

    /// Number of rows in `course`
    pub async fn course_count(&self) -> usize {
        self.tables.read().await.courses.len()
    }

    /// Number of rows in `person`
    pub async fn person_count(&self) -> usize {
        self.tables.read().await.persons.len()
    }

    /// Number of rows in `person_course`
    pub async fn enrollment_count(&self) -> usize {
        self.tables.read().await.enrollments.len()
    }
}

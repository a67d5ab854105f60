//! Course repository port.
//!
//! Defines the contract for persisting and retrieving courses. Every
//! operation is a single statement, so implementations do not need a
//! transaction.

use async_trait::async_trait;

use crate::domain::course::Course;
use crate::domain::foundation::{CourseId, DomainError};

/// Repository port for the `course` table.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// All courses ordered by ascending id. An empty table yields an empty
    /// list.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on read failure
    async fn list(&self) -> Result<Vec<Course>, DomainError>;

    /// Fetch a single course.
    ///
    /// # Errors
    ///
    /// - `CourseNotFound` if no row has this id
    /// - `DatabaseError` on any other read failure
    async fn get_by_id(&self, id: CourseId) -> Result<Course, DomainError>;

    /// Insert a course and return it with its generated id.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` if the insert fails (e.g. constraint violation)
    async fn create(&self, name: &str) -> Result<Course, DomainError>;

    /// Rename a course.
    ///
    /// # Errors
    ///
    /// - `CourseNotFound` if the update affected zero rows
    /// - `DatabaseError` if the statement fails
    async fn update(&self, id: CourseId, name: &str) -> Result<Course, DomainError>;

    /// Remove a course.
    ///
    /// # Errors
    ///
    /// - `CourseNotFound` if the delete affected zero rows
    /// - `DatabaseError` if the statement fails, including when persons
    ///   are still enrolled in the course
    async fn delete(&self, id: CourseId) -> Result<(), DomainError>;
}

//! PostgreSQL implementation of CourseRepository.
//!
//! Persists courses to the `course` table.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::course::Course;
use crate::domain::foundation::{CourseId, DomainError, ErrorCode};
use crate::ports::CourseRepository;

/// PostgreSQL implementation of CourseRepository.
#[derive(Clone)]
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    /// Creates a new PostgresCourseRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn list(&self) -> Result<Vec<Course>, DomainError> {
        let rows = sqlx::query("SELECT id, name FROM course ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage("course.list", "select", e))?;

        rows.into_iter()
            .map(|row| row_to_course("course.list", row))
            .collect()
    }

    async fn get_by_id(&self, id: CourseId) -> Result<Course, DomainError> {
        let row = sqlx::query("SELECT id, name FROM course WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage("course.get_by_id", "select", e))?;

        match row {
            Some(row) => row_to_course("course.get_by_id", row),
            None => Err(course_not_found(id)),
        }
    }

    async fn create(&self, name: &str) -> Result<Course, DomainError> {
        let row = sqlx::query("INSERT INTO course (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage("course.create", "insert", e))?;

        let course = row_to_course("course.create", row)?;
        tracing::debug!(course_id = %course.id, "course created");
        Ok(course)
    }

    async fn update(&self, id: CourseId, name: &str) -> Result<Course, DomainError> {
        let result = sqlx::query("UPDATE course SET name = $1 WHERE id = $2")
            .bind(name)
            .bind(id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage("course.update", "update", e))?;

        if result.rows_affected() == 0 {
            return Err(course_not_found(id));
        }

        Ok(Course::new(id, name))
    }

    async fn delete(&self, id: CourseId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM course WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage("course.delete", "delete", e))?;

        if result.rows_affected() == 0 {
            return Err(course_not_found(id));
        }

        tracing::debug!(course_id = %id, "course deleted");
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn course_not_found(id: CourseId) -> DomainError {
    DomainError::new(
        ErrorCode::CourseNotFound,
        format!("No course found with id: {}", id),
    )
    .with_detail("course_id", id.to_string())
}

fn row_to_course(operation: &str, row: sqlx::postgres::PgRow) -> Result<Course, DomainError> {
    let id: i32 = row
        .try_get("id")
        .map_err(|e| DomainError::storage(operation, "decode id", e))?;

    let name: String = row
        .try_get("name")
        .map_err(|e| DomainError::storage(operation, "decode name", e))?;

    Ok(Course::new(CourseId::new(id), name))
}

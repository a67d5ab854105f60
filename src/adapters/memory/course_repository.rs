//! In-memory implementation of CourseRepository.

use async_trait::async_trait;

use super::store::InMemoryDatabase;
use crate::domain::course::Course;
use crate::domain::foundation::{CourseId, DomainError, ErrorCode};
use crate::ports::CourseRepository;

/// In-memory course repository backed by an [`InMemoryDatabase`].
#[derive(Debug, Clone)]
pub struct InMemoryCourseRepository {
    db: InMemoryDatabase,
}

impl InMemoryCourseRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn list(&self) -> Result<Vec<Course>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables
            .courses
            .iter()
            .map(|(id, name)| Course::new(*id, name.clone()))
            .collect())
    }

    async fn get_by_id(&self, id: CourseId) -> Result<Course, DomainError> {
        let tables = self.db.read().await;
        tables
            .courses
            .get(&id)
            .map(|name| Course::new(id, name.clone()))
            .ok_or_else(|| course_not_found(id))
    }

    async fn create(&self, name: &str) -> Result<Course, DomainError> {
        self.db
            .transaction(|tables| {
                let id = tables.insert_course(name);
                Ok(Course::new(id, name))
            })
            .await
    }

    async fn update(&self, id: CourseId, name: &str) -> Result<Course, DomainError> {
        self.db
            .transaction(|tables| match tables.courses.get_mut(&id) {
                Some(stored) => {
                    *stored = name.to_string();
                    Ok(Course::new(id, name))
                }
                None => Err(course_not_found(id)),
            })
            .await
    }

    async fn delete(&self, id: CourseId) -> Result<(), DomainError> {
        self.db
            .transaction(|tables| {
                if tables.course_is_referenced(id) {
                    return Err(DomainError::storage(
                        "course.delete",
                        "delete",
                        "delete on course violates foreign key constraint on person_course",
                    ));
                }
                match tables.courses.remove(&id) {
                    Some(_) => Ok(()),
                    None => Err(course_not_found(id)),
                }
            })
            .await
    }
}

fn course_not_found(id: CourseId) -> DomainError {
    DomainError::new(
        ErrorCode::CourseNotFound,
        format!("No course found with id: {}", id),
    )
    .with_detail("course_id", id.to_string())
}

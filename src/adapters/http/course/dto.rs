//! HTTP DTOs for course endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::course::Course;
use crate::domain::foundation::ValidationError;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/course` and `PUT /api/course/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseRequest {
    pub name: String,
}

impl CourseRequest {
    /// Returns the name to store, or the list of problems.
    pub fn validate(&self) -> Result<&str, Vec<ValidationError>> {
        if self.name.trim().is_empty() {
            return Err(vec![ValidationError::empty_field("name")]);
        }
        Ok(&self.name)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CourseOutput {
    pub id: i32,
    pub name: String,
}

impl From<Course> for CourseOutput {
    fn from(course: Course) -> Self {
        Self {
            id: course.id.as_i32(),
            name: course.name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    pub course: CourseOutput,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            course: course.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoursesResponse {
    pub courses: Vec<CourseOutput>,
}

impl From<Vec<Course>> for CoursesResponse {
    fn from(courses: Vec<Course>) -> Self {
        Self {
            courses: courses.into_iter().map(CourseOutput::from).collect(),
        }
    }
}

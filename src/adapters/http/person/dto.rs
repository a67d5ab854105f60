//! HTTP DTOs for person endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, ValidationError};
use crate::domain::person::{Person, PersonDetails, PersonType};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/person` and `PUT /api/person/:name`.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "type")]
    pub person_type: String,
    pub age: i32,
    #[serde(default)]
    pub courses: Vec<i32>,
}

impl PersonRequest {
    /// Checks every field and converts to domain input.
    ///
    /// All problems are collected rather than stopping at the first.
    pub fn into_details(self) -> Result<PersonDetails, Vec<ValidationError>> {
        let mut problems = Vec::new();

        if self.first_name.trim().is_empty() {
            problems.push(ValidationError::empty_field("first_name"));
        }
        if self.last_name.trim().is_empty() {
            problems.push(ValidationError::empty_field("last_name"));
        }
        let person_type = match self.person_type.parse::<PersonType>() {
            Ok(person_type) => Some(person_type),
            Err(problem) => {
                problems.push(problem);
                None
            }
        };
        if self.age < 0 {
            problems.push(ValidationError::negative("age", i64::from(self.age)));
        }
        for (index, id) in self.courses.iter().enumerate() {
            if *id <= 0 {
                problems.push(ValidationError::invalid_format(
                    format!("courses[{}]", index),
                    "course ID must be a positive integer",
                ));
            }
        }

        match person_type {
            Some(person_type) if problems.is_empty() => Ok(PersonDetails {
                first_name: self.first_name,
                last_name: self.last_name,
                person_type,
                age: self.age,
                courses: self.courses.into_iter().map(CourseId::new).collect(),
            }),
            _ => Err(problems),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PersonOutput {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "type")]
    pub person_type: PersonType,
    pub age: i32,
    pub courses: Vec<i32>,
}

impl From<Person> for PersonOutput {
    fn from(person: Person) -> Self {
        Self {
            id: person.id.as_i32(),
            first_name: person.first_name,
            last_name: person.last_name,
            person_type: person.person_type,
            age: person.age,
            courses: person.courses.iter().map(CourseId::as_i32).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonResponse {
    pub person: PersonOutput,
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self {
            person: person.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonsResponse {
    pub persons: Vec<PersonOutput>,
}

impl From<Vec<Person>> for PersonsResponse {
    fn from(persons: Vec<Person>) -> Self {
        Self {
            persons: persons.into_iter().map(PersonOutput::from).collect(),
        }
    }
}

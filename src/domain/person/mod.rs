//! Person domain module.
//!
//! A person row plus the set of course ids the person is enrolled in. The
//! `courses` field always mirrors the `person_course` join table; it is
//! never echoed from caller input.

mod person_type;

pub use person_type::PersonType;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, PersonId};

/// A fully hydrated person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "type")]
    pub person_type: PersonType,
    pub age: i32,
    pub courses: Vec<CourseId>,
}

/// Caller-supplied fields for creating or updating a person.
///
/// On update an empty `courses` list means "leave enrollments as they are",
/// while on create it means "no enrollments".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDetails {
    pub first_name: String,
    pub last_name: String,
    pub person_type: PersonType,
    pub age: i32,
    pub courses: Vec<CourseId>,
}

impl PersonDetails {
    /// Builds the stored person from these scalars, a storage id, and the
    /// course ids read back from the join table.
    pub fn into_person(self, id: PersonId, courses: Vec<CourseId>) -> Person {
        Person {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            person_type: self.person_type,
            age: self.age,
            courses,
        }
    }
}

/// Collapses the output of `array_agg` over a left join into course ids.
///
/// A person without enrollments yields a single NULL element; those
/// placeholders are dropped so the result is empty rather than `[null]`.
pub fn collapse_course_ids<I>(raw: I) -> Vec<CourseId>
where
    I: IntoIterator<Item = Option<i32>>,
{
    raw.into_iter().flatten().map(CourseId::new).collect()
}

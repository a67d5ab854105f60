//! Course domain module.
//!
//! A course is a single named row. It has no knowledge of which persons are
//! enrolled in it; that association is owned by the person side.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CourseId;

/// A course as stored in the `course` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
}

impl Course {
    pub fn new(id: CourseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

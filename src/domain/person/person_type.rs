//! PersonType enum distinguishing students from professors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Role a person plays. Stored as lowercase text in `person.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonType {
    Student,
    Professor,
}

impl PersonType {
    /// Column value written to storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonType::Student => "student",
            PersonType::Professor => "professor",
        }
    }
}

impl fmt::Display for PersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(PersonType::Student),
            "professor" => Ok(PersonType::Professor),
            _ => Err(ValidationError::invalid_format(
                "type",
                "must be either 'student' or 'professor'",
            )),
        }
    }
}

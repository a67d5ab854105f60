//! Strongly-typed identifier value objects.
//!
//! Both identifiers wrap the `SERIAL` keys PostgreSQL generates, so they are
//! only ever minted by storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of a course row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(i32);

impl CourseId {
    /// Wraps a raw key read from storage or a request path.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw key.
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CourseId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<i32> for CourseId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Identifier of a person row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(i32);

impl PersonId {
    /// Wraps a raw key read from storage.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw key.
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for PersonId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

//! Domain layer containing the enrollment entities.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, errors)
//! - `course` - Course entity
//! - `person` - Person entity and its course enrollments

pub mod course;
pub mod foundation;
pub mod person;

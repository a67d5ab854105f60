//! Enrollment API
//!
//! Course catalog and person management backed by PostgreSQL, where each
//! person's course enrollments are kept in a join table that is rewritten
//! atomically with the person record.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;

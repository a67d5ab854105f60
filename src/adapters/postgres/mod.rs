//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresCourseRepository` - Single-table course CRUD
//! - `PostgresPersonRepository` - Person CRUD with transactional
//!   `person_course` synchronization
//!
//! Both take a `PgPool` at construction; neither opens connections itself.

mod course_repository;
mod person_repository;

pub use course_repository::PostgresCourseRepository;
pub use person_repository::PostgresPersonRepository;

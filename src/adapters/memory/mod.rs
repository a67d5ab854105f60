//! In-memory adapters for the repository ports.
//!
//! Useful for testing and local development. Semantics match the
//! PostgreSQL adapters, including rollback on partial failure and the
//! foreign-key constraints of `person_course`.

mod course_repository;
mod person_repository;
mod store;

pub use course_repository::InMemoryCourseRepository;
pub use person_repository::InMemoryPersonRepository;
pub use store::InMemoryDatabase;

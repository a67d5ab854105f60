//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Repository Ports
//!
//! - `CourseRepository` - Single-table course persistence
//! - `PersonRepository` - Person persistence with transactional course
//!   enrollment synchronization

mod course_repository;
mod person_repository;

pub use course_repository::CourseRepository;
pub use person_repository::PersonRepository;

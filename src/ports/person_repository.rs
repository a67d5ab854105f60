//! Person repository port.
//!
//! Defines the contract for persons and their course enrollments. The
//! implementation exclusively owns writes to the `person_course` join
//! table.
//!
//! # Design
//!
//! - **Atomic writes**: create, update, and delete each run in a single
//!   transaction. A failure at any stage leaves storage unchanged.
//! - **Read-back**: the `courses` of a returned person are read from the
//!   join table after the write, never echoed from the input.
//! - **Name-addressed**: lookups, updates, and deletes match `last_name`
//!   case-insensitively.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::person::{Person, PersonDetails};

/// Repository port for persons and the `person_course` association.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// All persons ordered by ascending id, each with its course ids.
    async fn list(&self) -> Result<Vec<Person>, DomainError>;

    /// Find a person by last name, ignoring case.
    ///
    /// When several persons share the last name the one with the lowest id
    /// is returned.
    ///
    /// # Errors
    ///
    /// - `PersonNotFound` if no person matches
    /// - `DatabaseError` on read failure
    async fn get_by_name(&self, last_name: &str) -> Result<Person, DomainError>;

    /// Insert a person and enroll it in `details.courses`.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` tagged with the failing stage; nothing is persisted
    /// - `TransactionError` if the transaction cannot begin or commit
    async fn create(&self, details: PersonDetails) -> Result<Person, DomainError>;

    /// Overwrite the scalar fields of the person matching `last_name`.
    ///
    /// A non-empty `details.courses` fully replaces the enrollment set. An
    /// empty list leaves existing enrollments untouched.
    ///
    /// # Errors
    ///
    /// - `PersonNotFound` if no person matches
    /// - `DatabaseError` tagged with the failing stage; nothing is persisted
    /// - `TransactionError` if the transaction cannot begin or commit
    async fn update(&self, last_name: &str, details: PersonDetails)
        -> Result<Person, DomainError>;

    /// Delete every person matching `last_name` together with their
    /// enrollments.
    ///
    /// # Errors
    ///
    /// - `PersonNotFound` if no person matches (the transaction is rolled back)
    /// - `DatabaseError` / `TransactionError` as for the other writes
    async fn delete(&self, last_name: &str) -> Result<(), DomainError>;
}

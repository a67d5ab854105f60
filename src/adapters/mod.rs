//! Adapters - Implementations of port interfaces.
//!
//! - `postgres` - sqlx-backed repositories
//! - `memory` - in-process repositories with the same transactional semantics
//! - `http` - axum REST surface over the repository ports

pub mod http;
pub mod memory;
pub mod postgres;

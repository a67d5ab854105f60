//! HTTP adapters - REST API implementations.
//!
//! Each resource has its own adapter with `dto`, `handlers` and `routes`.

pub mod course;
pub mod person;
pub mod response;
mod router;

pub use router::{api_router, cors_layer, with_middleware};

//! HTTP adapter for person endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{PersonOutput, PersonRequest, PersonResponse, PersonsResponse};
pub use handlers::PersonHandlers;
pub use routes::person_routes;

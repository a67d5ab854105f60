//! HTTP adapter for course endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CourseOutput, CourseRequest, CourseResponse, CoursesResponse};
pub use handlers::CourseHandlers;
pub use routes::course_routes;

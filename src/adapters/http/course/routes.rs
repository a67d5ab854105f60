//! HTTP routes for course endpoints.

use axum::{routing::get, Router};

use super::handlers::{
    create_course, delete_course, get_course, list_courses, update_course, CourseHandlers,
};

/// Creates the course router. Mounted under `/api/course`.
pub fn course_routes(handlers: CourseHandlers) -> Router {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route(
            "/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .with_state(handlers)
}

//! HTTP handlers for course endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::response::{
    handle_domain_error, malformed_body, validation_failed, ErrorResponse, MessageResponse,
};
use crate::domain::foundation::CourseId;
use crate::ports::CourseRepository;

use super::dto::{CourseRequest, CourseResponse, CoursesResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct CourseHandlers {
    repository: Arc<dyn CourseRepository>,
}

impl CourseHandlers {
    pub fn new(repository: Arc<dyn CourseRepository>) -> Self {
        Self { repository }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/course - List all courses
pub async fn list_courses(State(handlers): State<CourseHandlers>) -> Response {
    match handlers.repository.list().await {
        Ok(courses) => (StatusCode::OK, Json(CoursesResponse::from(courses))).into_response(),
        Err(e) => handle_domain_error(e),
    }
}

/// GET /api/course/:id - Get a single course
pub async fn get_course(
    State(handlers): State<CourseHandlers>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match parse_course_id(&raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.repository.get_by_id(id).await {
        Ok(course) => (StatusCode::OK, Json(CourseResponse::from(course))).into_response(),
        Err(e) => handle_domain_error(e),
    }
}

/// POST /api/course - Create a course
pub async fn create_course(
    State(handlers): State<CourseHandlers>,
    payload: Result<Json<CourseRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return malformed_body(rejection),
    };
    let name = match req.validate() {
        Ok(name) => name,
        Err(problems) => return validation_failed(&problems),
    };

    match handlers.repository.create(name).await {
        Ok(course) => (StatusCode::CREATED, Json(CourseResponse::from(course))).into_response(),
        Err(e) => handle_domain_error(e),
    }
}

/// PUT /api/course/:id - Rename a course
pub async fn update_course(
    State(handlers): State<CourseHandlers>,
    Path(raw_id): Path<String>,
    payload: Result<Json<CourseRequest>, JsonRejection>,
) -> Response {
    let id = match parse_course_id(&raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return malformed_body(rejection),
    };
    let name = match req.validate() {
        Ok(name) => name,
        Err(problems) => return validation_failed(&problems),
    };

    match handlers.repository.update(id, name).await {
        Ok(course) => (StatusCode::OK, Json(CourseResponse::from(course))).into_response(),
        Err(e) => handle_domain_error(e),
    }
}

/// DELETE /api/course/:id - Delete a course
pub async fn delete_course(
    State(handlers): State<CourseHandlers>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match parse_course_id(&raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.repository.delete(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse::new("Course deleted successfully")),
        )
            .into_response(),
        Err(e) => handle_domain_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Request helpers
// ════════════════════════════════════════════════════════════════════════════

fn parse_course_id(raw: &str) -> Result<CourseId, Response> {
    raw.parse::<CourseId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Not a valid ID")),
        )
            .into_response()
    })
}

//! HTTP handlers for person endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::response::{
    handle_domain_error, malformed_body, validation_failed, MessageResponse,
};
use crate::ports::PersonRepository;

use super::dto::{PersonRequest, PersonResponse, PersonsResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PersonHandlers {
    repository: Arc<dyn PersonRepository>,
}

impl PersonHandlers {
    pub fn new(repository: Arc<dyn PersonRepository>) -> Self {
        Self { repository }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/person - List all persons with their courses
pub async fn list_persons(State(handlers): State<PersonHandlers>) -> Response {
    match handlers.repository.list().await {
        Ok(persons) => (StatusCode::OK, Json(PersonsResponse::from(persons))).into_response(),
        Err(e) => handle_domain_error(e),
    }
}

/// GET /api/person/:name - Get a person by last name
pub async fn get_person(
    State(handlers): State<PersonHandlers>,
    Path(last_name): Path<String>,
) -> Response {
    match handlers.repository.get_by_name(&last_name).await {
        Ok(person) => (StatusCode::OK, Json(PersonResponse::from(person))).into_response(),
        Err(e) => handle_domain_error(e),
    }
}

/// POST /api/person - Create a person and enroll it
pub async fn create_person(
    State(handlers): State<PersonHandlers>,
    payload: Result<Json<PersonRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return malformed_body(rejection),
    };
    let details = match req.into_details() {
        Ok(details) => details,
        Err(problems) => return validation_failed(&problems),
    };

    match handlers.repository.create(details).await {
        Ok(person) => (StatusCode::CREATED, Json(PersonResponse::from(person))).into_response(),
        Err(e) => handle_domain_error(e),
    }
}

/// PUT /api/person/:name - Update a person and replace its courses
pub async fn update_person(
    State(handlers): State<PersonHandlers>,
    Path(last_name): Path<String>,
    payload: Result<Json<PersonRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return malformed_body(rejection),
    };
    let details = match req.into_details() {
        Ok(details) => details,
        Err(problems) => return validation_failed(&problems),
    };

    match handlers.repository.update(&last_name, details).await {
        Ok(person) => (StatusCode::OK, Json(PersonResponse::from(person))).into_response(),
        Err(e) => handle_domain_error(e),
    }
}

/// DELETE /api/person/:name - Delete persons with this last name
pub async fn delete_person(
    State(handlers): State<PersonHandlers>,
    Path(last_name): Path<String>,
) -> Response {
    match handlers.repository.delete(&last_name).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse::new("Person deleted successfully")),
        )
            .into_response(),
        Err(e) => handle_domain_error(e),
    }
}

//! HTTP routes for person endpoints.

use axum::{routing::get, Router};

use super::handlers::{
    create_person, delete_person, get_person, list_persons, update_person, PersonHandlers,
};

/// Creates the person router. Mounted under `/api/person`.
pub fn person_routes(handlers: PersonHandlers) -> Router {
    Router::new()
        .route("/", get(list_persons).post(create_person))
        .route(
            "/:name",
            get(get_person).put(update_person).delete(delete_person),
        )
        .with_state(handlers)
}

//! Top-level router assembly and middleware.

use std::time::Duration;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

use super::course::{course_routes, CourseHandlers};
use super::person::{person_routes, PersonHandlers};

const CORS_MAX_AGE: Duration = Duration::from_secs(300);

/// Routes for both resources plus `/health`, without middleware.
pub fn api_router(courses: CourseHandlers, persons: PersonHandlers) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/course", course_routes(courses))
        .nest("/api/person", person_routes(persons))
}

/// Wraps a router with request tracing, CORS and a request timeout.
pub fn with_middleware(router: Router, server: &ServerConfig) -> Router {
    router
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

/// Configured origins, or any origin when none are configured.
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::PUT, Method::POST, Method::DELETE])
        .allow_headers(Any)
        .max_age(CORS_MAX_AGE);

    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

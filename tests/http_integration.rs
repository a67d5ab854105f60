//! Integration tests for the HTTP surface.
//!
//! Requests go through the full router, backed by the in-memory adapters so
//! no database is needed.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use enrollment_api::adapters::http::{
    api_router, course::CourseHandlers, person::PersonHandlers, with_middleware,
};
use enrollment_api::adapters::memory::{
    InMemoryCourseRepository, InMemoryDatabase, InMemoryPersonRepository,
};
use enrollment_api::config::ServerConfig;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app_with(db: &InMemoryDatabase) -> Router {
    let courses = Arc::new(InMemoryCourseRepository::new(db.clone()));
    let persons = Arc::new(InMemoryPersonRepository::new(db.clone()));
    api_router(CourseHandlers::new(courses), PersonHandlers::new(persons))
}

fn app() -> (Router, InMemoryDatabase) {
    let db = InMemoryDatabase::new();
    (app_with(&db), db)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_course(app: &Router, name: &str) -> i64 {
    let (status, body) = send(app, Method::POST, "/api/course", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["course"]["id"].as_i64().unwrap()
}

fn john_doe(courses: Value) -> Value {
    json!({
        "first_name": "John",
        "last_name": "Doe",
        "type": "student",
        "age": 25,
        "courses": courses
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn middleware_allows_any_origin_by_default() {
    let (router, _) = app();
    let app = with_middleware(router, &ServerConfig::default());

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

// =============================================================================
// Courses
// =============================================================================

#[tokio::test]
async fn course_lifecycle() {
    let (app, _) = app();

    let id = create_course(&app, "Math").await;
    assert_eq!(id, 1);

    let (status, body) = send(&app, Method::GET, "/api/course/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "course": { "id": 1, "name": "Math" } }));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/course/1",
        Some(json!({ "name": "Advanced Math" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["course"]["name"], "Advanced Math");

    let (status, body) = send(&app, Method::DELETE, "/api/course/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Course deleted successfully");

    let (status, body) = send(&app, Method::GET, "/api/course/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "COURSE_NOT_FOUND");
}

#[tokio::test]
async fn courses_are_listed_in_id_order() {
    let (app, _) = app();
    create_course(&app, "Math").await;
    create_course(&app, "Physics").await;

    let (status, body) = send(&app, Method::GET, "/api/course", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "courses": [
            { "id": 1, "name": "Math" },
            { "id": 2, "name": "Physics" }
        ] })
    );
}

#[tokio::test]
async fn empty_course_table_lists_nothing() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/api/course", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "courses": [] }));
}

#[tokio::test]
async fn missing_course_is_404_on_update_and_delete() {
    let (app, _) = app();

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/course/99",
        Some(json!({ "name": "Nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/course/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_course_id_is_400() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/api/course/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Not a valid ID");
}

#[tokio::test]
async fn blank_course_name_is_400() {
    let (app, db) = app();
    let (status, body) = send(&app, Method::POST, "/api/course", Some(json!({ "name": "  " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["details"][0]["name"], "name");
    assert_eq!(db.course_count().await, 0);
}

#[tokio::test]
async fn malformed_course_body_is_400() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::POST, "/api/course", Some(json!({ "title": "Math" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "missing values or malformed body");
}

#[tokio::test]
async fn enrolled_course_cannot_be_deleted() {
    let (app, db) = app();
    create_course(&app, "Math").await;
    let (status, _) = send(&app, Method::POST, "/api/person", Some(john_doe(json!([1])))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::DELETE, "/api/course/1", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "An unexpected error occurred");
    assert_eq!(db.course_count().await, 1);
}

// =============================================================================
// Persons
// =============================================================================

#[tokio::test]
async fn person_created_with_courses_reads_them_back() {
    let (app, _) = app();
    create_course(&app, "Math").await;
    create_course(&app, "Physics").await;

    let (status, body) = send(&app, Method::POST, "/api/person", Some(john_doe(json!([1, 2])))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "person": {
            "id": 1,
            "first_name": "John",
            "last_name": "Doe",
            "type": "student",
            "age": 25,
            "courses": [1, 2]
        } })
    );

    let (status, body) = send(&app, Method::GET, "/api/person/doe", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["person"]["courses"], json!([1, 2]));
}

#[tokio::test]
async fn person_without_courses_has_empty_list() {
    let (app, _) = app();
    let body = json!({
        "first_name": "Jane",
        "last_name": "Smith",
        "type": "professor",
        "age": 45
    });

    let (status, body) = send(&app, Method::POST, "/api/person", Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["person"]["courses"], json!([]));
}

#[tokio::test]
async fn enrolling_in_missing_course_persists_nothing() {
    let (app, db) = app();
    create_course(&app, "Math").await;

    let (status, body) = send(&app, Method::POST, "/api/person", Some(john_doe(json!([1, 42])))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("details").is_none());
    assert_eq!(db.person_count().await, 0);
    assert_eq!(db.enrollment_count().await, 0);

    let (status, _) = send(&app, Method::GET, "/api/person/doe", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_course_set() {
    let (app, _) = app();
    for name in ["Math", "Physics", "Chemistry"] {
        create_course(&app, name).await;
    }
    send(&app, Method::POST, "/api/person", Some(john_doe(json!([1, 2])))).await;

    let mut update = john_doe(json!([3]));
    update["age"] = json!(26);
    let (status, body) = send(&app, Method::PUT, "/api/person/Doe", Some(update)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["person"]["age"], 26);
    assert_eq!(body["person"]["courses"], json!([3]));
}

#[tokio::test]
async fn update_with_empty_courses_keeps_enrollments() {
    let (app, _) = app();
    create_course(&app, "Math").await;
    send(&app, Method::POST, "/api/person", Some(john_doe(json!([1])))).await;

    let (status, body) = send(&app, Method::PUT, "/api/person/doe", Some(john_doe(json!([])))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["person"]["courses"], json!([1]));
}

#[tokio::test]
async fn update_of_unknown_person_is_404() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::PUT, "/api/person/ghost", Some(john_doe(json!([])))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PERSON_NOT_FOUND");
}

#[tokio::test]
async fn delete_person_ignores_case_and_removes_enrollments() {
    let (app, db) = app();
    create_course(&app, "Math").await;
    send(&app, Method::POST, "/api/person", Some(john_doe(json!([1])))).await;

    let (status, body) = send(&app, Method::DELETE, "/api/person/DOE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Person deleted successfully");
    assert_eq!(db.enrollment_count().await, 0);

    let (status, _) = send(&app, Method::DELETE, "/api/person/doe", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The course is free to go once nobody is enrolled.
    let (status, _) = send(&app, Method::DELETE, "/api/course/1", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn persons_are_listed_with_courses() {
    let (app, _) = app();
    create_course(&app, "Math").await;
    send(&app, Method::POST, "/api/person", Some(john_doe(json!([1])))).await;
    let jane = json!({
        "first_name": "Jane",
        "last_name": "Smith",
        "type": "professor",
        "age": 45
    });
    send(&app, Method::POST, "/api/person", Some(jane)).await;

    let (status, body) = send(&app, Method::GET, "/api/person", None).await;

    assert_eq!(status, StatusCode::OK);
    let persons = body["persons"].as_array().unwrap();
    assert_eq!(persons.len(), 2);
    assert_eq!(persons[0]["courses"], json!([1]));
    assert_eq!(persons[1]["courses"], json!([]));
}

#[tokio::test]
async fn invalid_person_is_400_with_every_field() {
    let (app, db) = app();
    let body = json!({
        "first_name": "",
        "last_name": "Doe",
        "type": "janitor",
        "age": -3,
        "courses": [0]
    });

    let (status, body) = send(&app, Method::POST, "/api/person", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["first_name", "type", "age", "courses[0]"]);
    assert_eq!(db.person_count().await, 0);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn created_course_reads_back_same_name(name in "[A-Za-z0-9][A-Za-z0-9 ]{0,40}") {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let (status, fetched) = runtime.block_on(async {
            let (app, _) = app();
            let id = create_course(&app, &name).await;
            let (status, body) = send(&app, Method::GET, &format!("/api/course/{}", id), None).await;
            (status, body["course"]["name"].as_str().map(str::to_string))
        });

        prop_assert_eq!(status, StatusCode::OK);
        prop_assert_eq!(fetched, Some(name));
    }
}

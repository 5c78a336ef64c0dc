use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use todo_api::TodoService;
use todo_api::migration::Migrator;
use todo_api::server::build_router;
use tower::ServiceExt;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

#[allow(dead_code)]
pub async fn setup_test_service(db: DatabaseConnection) -> TodoService {
    TodoService::new(db, TEST_TIMEOUT)
        .await
        .expect("Failed to build todo service")
}

#[allow(dead_code)]
pub async fn setup_test_app(db: DatabaseConnection) -> Router {
    build_router(db, TEST_TIMEOUT)
        .await
        .expect("Failed to build router")
}

/// Send one request and decode the JSON envelope
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, body) = send_raw(app, method, uri, body.map(|b| b.to_string())).await;
    let value = serde_json::from_slice(&body).expect("Response body is not JSON");
    (status, value)
}

#[allow(dead_code)]
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, axum::http::HeaderMap, axum::body::Bytes) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes)
}

/// Create a todo through the API and return its envelope
#[allow(dead_code)]
pub async fn create_todo(app: &Router, title: &str, completed: bool) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/todos",
        Some(json!({
            "title": title,
            "description": format!("Details for {title}"),
            "completed": completed
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    body
}

/// Create `count` todos titled "Todo 1".."Todo N"; every third one is completed
#[allow(dead_code)]
pub async fn seed_todos(app: &Router, count: usize) {
    for i in 1..=count {
        create_todo(app, &format!("Todo {i}"), i % 3 == 0).await;
    }
}

#[allow(dead_code)]
pub fn ids_of(body: &Value) -> Vec<i64> {
    body["todos"]
        .as_array()
        .expect("todos array")
        .iter()
        .map(|todo| todo["id"].as_i64().expect("numeric id"))
        .collect()
}

use axum::Json;
use utoipa::OpenApi;

use crate::models::{TodoCreate, TodoDetails, TodoList, TodoSummary, TodoUpdate};
use crate::pagination::PageMeta;
use crate::routes;

/// OpenAPI document for the todo endpoints.
///
/// Response schemas describe the payload only; every body is wrapped in the
/// `success`/`messages` envelope.
#[derive(OpenApi)]
#[openapi(
    paths(
        routes::get_todos,
        routes::get_pending_todos,
        routes::get_completed_todos,
        routes::get_todo,
        routes::create_todo,
        routes::update_todo,
        routes::delete_todo,
        routes::delete_all_todos,
    ),
    components(schemas(TodoCreate, TodoUpdate, TodoDetails, TodoSummary, TodoList, PageMeta)),
    tags((name = "todos", description = "Paged todo management"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

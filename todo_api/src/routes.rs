use std::sync::Arc;

use axum::{
    Router,
    extract::{OriginalUri, State},
    http::StatusCode,
    middleware::from_fn,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::core::TodoRepository;
use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{attach_request_id, panic_envelope};
use crate::models::{PageParams, TodoCreate, TodoDetails, TodoList, TodoShow, TodoUpdate};
use crate::openapi::openapi_json;
use crate::pagination::PageMeta;
use crate::response::Envelope;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(todos: impl TodoRepository + 'static) -> Self {
        Self {
            todos: Arc::new(todos),
        }
    }
}

/// Full application router: `/api/todos…`, the OpenAPI document and
/// enveloped 404/405 responses for everything else.
///
/// Error envelopes get their `requestId` from the `x-request-id` header, and a
/// panicking handler still answers with a 500 envelope.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/todos", get(get_todos).post(create_todo).delete(delete_all_todos))
        .route("/todos/pending", get(get_pending_todos))
        .route("/todos/completed", get(get_completed_todos))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .method_not_allowed_fallback(method_not_allowed_fallback)
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .route("/api-docs/openapi.json", get(openapi_json))
        .method_not_allowed_fallback(method_not_allowed_fallback)
        .fallback(not_found_fallback)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(from_fn(attach_request_id))
                .layer(CatchPanicLayer::custom(panic_envelope)),
        )
}

async fn list_todos(
    state: &AppState,
    show: TodoShow,
    params: PageParams,
    base_path: &str,
) -> Result<Envelope<TodoList>, ApiError> {
    let (total, todos) = state
        .todos
        .fetch_many(params.page, params.page_size, show)
        .await?;
    let items_in_page = u64::try_from(todos.len()).unwrap_or(u64::MAX);
    let page_meta = PageMeta::new(
        items_in_page,
        base_path,
        params.page,
        params.page_size,
        total,
    )?;
    Ok(Envelope::paged(TodoList { todos }, page_meta))
}

#[utoipa::path(
    get,
    path = "/api/todos",
    params(PageParams),
    responses(
        (status = 200, description = "One page of todos, descriptions omitted", body = TodoList),
        (status = 400, description = "Invalid page or pageSize")
    ),
    tag = "todos"
)]
pub async fn get_todos(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Envelope<TodoList>, ApiError> {
    list_todos(&state, TodoShow::All, params, uri.path()).await
}

#[utoipa::path(
    get,
    path = "/api/todos/pending",
    params(PageParams),
    responses(
        (status = 200, description = "One page of todos not yet completed", body = TodoList),
        (status = 400, description = "Invalid page or pageSize")
    ),
    tag = "todos"
)]
pub async fn get_pending_todos(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Envelope<TodoList>, ApiError> {
    list_todos(&state, TodoShow::Pending, params, uri.path()).await
}

#[utoipa::path(
    get,
    path = "/api/todos/completed",
    params(PageParams),
    responses(
        (status = 200, description = "One page of completed todos", body = TodoList),
        (status = 400, description = "Invalid page or pageSize")
    ),
    tag = "todos"
)]
pub async fn get_completed_todos(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Envelope<TodoList>, ApiError> {
    list_todos(&state, TodoShow::Completed, params, uri.path()).await
}

#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    params(("id" = i32, Path, description = "Todo id")),
    responses(
        (status = 200, description = "The todo, including its description", body = TodoDetails),
        (status = 404, description = "No todo with this id")
    ),
    tag = "todos"
)]
pub async fn get_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Envelope<TodoDetails>, ApiError> {
    let todo = state.todos.get(id).await?;
    Ok(Envelope::success(todo.into()))
}

#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = TodoCreate,
    responses(
        (status = 200, description = "Todo Created Successfully", body = TodoDetails),
        (status = 400, description = "Malformed body or validation failure")
    ),
    tag = "todos"
)]
pub async fn create_todo(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TodoCreate>,
) -> Result<Envelope<TodoDetails>, ApiError> {
    let todo = state.todos.create(input).await?;
    Ok(Envelope::success_with_message(
        todo.into(),
        "Todo Created Successfully",
    ))
}

#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    params(("id" = i32, Path, description = "Todo id")),
    request_body = TodoUpdate,
    responses(
        (status = 200, description = "Todo Updated Successfully", body = TodoDetails),
        (status = 400, description = "Malformed body or validation failure"),
        (status = 404, description = "No todo with this id")
    ),
    tag = "todos"
)]
pub async fn update_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<TodoUpdate>,
) -> Result<Envelope<TodoDetails>, ApiError> {
    let todo = state.todos.update(id, patch).await?;
    Ok(Envelope::success_with_message(
        todo.into(),
        "Todo Updated Successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(("id" = i32, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo Deleted Successfully"),
        (status = 404, description = "No todo with this id")
    ),
    tag = "todos"
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Envelope, ApiError> {
    state.todos.delete(id).await?;
    Ok(Envelope::message("Todo Deleted Successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/todos",
    responses((status = 200, description = "Todos Deleted Successfully")),
    tag = "todos"
)]
pub async fn delete_all_todos(State(state): State<AppState>) -> Result<Envelope, ApiError> {
    state.todos.delete_all().await?;
    Ok(Envelope::message("Todos Deleted Successfully"))
}

async fn not_found_fallback() -> Envelope {
    Envelope::not_found()
}

async fn method_not_allowed_fallback() -> Envelope {
    Envelope::error(
        vec!["Method Not Allowed".to_string()],
        StatusCode::METHOD_NOT_ALLOWED,
    )
}

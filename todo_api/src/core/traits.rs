use async_trait::async_trait;

use crate::entity::Todo;
use crate::errors::ApiError;
use crate::models::{TodoCreate, TodoShow, TodoSummary, TodoUpdate};

/// Resource name used in not-found messages
pub const RESOURCE_NAME: &str = "Todo";

/// Storage operations for todos.
///
/// Each call is one unit-of-work: it opens a transaction, commits it at most
/// once and never shares it with another call. Nothing detects concurrent
/// writers, so the last commit wins.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// One page of summaries plus the number of rows matching `show`.
    ///
    /// A page past the end yields an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a zero `page` or `page_size`, `Database` or `Timeout`
    /// when storage fails.
    async fn fetch_many(
        &self,
        page: u64,
        page_size: u64,
        show: TodoShow,
    ) -> Result<(u64, Vec<TodoSummary>), ApiError>;

    /// # Errors
    ///
    /// Fails with `NotFound` when no row has this id.
    async fn get(&self, id: i32) -> Result<Todo, ApiError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(RESOURCE_NAME, Some(id.to_string())))
    }

    /// Same lookup as [`get`](Self::get) but absence is a value.
    async fn get_by_id(&self, id: i32) -> Result<Option<Todo>, ApiError>;

    /// Persist a new todo; the id and both timestamps are assigned here.
    async fn create(&self, input: TodoCreate) -> Result<Todo, ApiError>;

    /// Apply `patch` to an existing todo and return the stored row.
    async fn update(&self, id: i32, patch: TodoUpdate) -> Result<Todo, ApiError>;

    async fn delete(&self, id: i32) -> Result<(), ApiError>;

    /// Remove every todo in a single transaction, returning the row count.
    async fn delete_all(&self) -> Result<u64, ApiError>;
}

use std::future::Future;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::traits::{RESOURCE_NAME, TodoRepository};
use crate::entity::{Todo, TodoActiveModel, TodoColumn, TodoEntity};
use crate::errors::ApiError;
use crate::models::{PageParams, TodoCreate, TodoShow, TodoSummary, TodoUpdate};
use crate::pagination::sql_window;
use crate::validation::Validatable;

/// Hands out todo ids before rows are inserted.
///
/// Seeded from the highest stored id, then strictly increasing for the life of
/// the process. Ids are not reused after deletes.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicI32,
}

impl IdGenerator {
    #[must_use]
    pub fn starting_after(last: i32) -> Self {
        Self {
            next: AtomicI32::new(last.saturating_add(1)),
        }
    }

    /// # Errors
    ///
    /// Returns the database error if the `MAX(id)` query fails.
    pub async fn seed<C: ConnectionTrait>(db: &C) -> Result<Self, DbErr> {
        let last: Option<i32> = TodoEntity::find()
            .select_only()
            .column_as(TodoColumn::Id.max(), "max_id")
            .into_tuple::<Option<i32>>()
            .one(db)
            .await?
            .flatten();
        Ok(Self::starting_after(last.unwrap_or(0)))
    }

    pub fn next_id(&self) -> i32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// Run one unit-of-work under a deadline.
///
/// Dropping the future on timeout drops its open transaction, which rolls back.
async fn with_deadline<T, F>(
    deadline: Duration,
    operation: &'static str,
    work: F,
) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::time::timeout(deadline, work)
        .await
        .map_err(|_| ApiError::timeout(operation))?
}

fn not_found(id: i32) -> ApiError {
    ApiError::not_found(RESOURCE_NAME, Some(id.to_string()))
}

/// [`TodoRepository`] backed by a Sea-ORM connection
pub struct TodoService {
    db: DatabaseConnection,
    ids: IdGenerator,
    deadline: Duration,
}

impl TodoService {
    /// Build the service, seeding the id generator from the stored rows.
    ///
    /// # Errors
    ///
    /// Returns the database error if seeding fails.
    pub async fn new(db: DatabaseConnection, deadline: Duration) -> Result<Self, DbErr> {
        let ids = IdGenerator::seed(&db).await?;
        Ok(Self { db, ids, deadline })
    }

    async fn load_page(
        &self,
        page: u64,
        page_size: u64,
        show: TodoShow,
    ) -> Result<(u64, Vec<TodoSummary>), ApiError> {
        let txn = self.db.begin().await?;

        let query = TodoEntity::find().filter(show.condition());
        let total = query.clone().count(&txn).await?;
        let Some((offset, limit)) = sql_window(page, page_size) else {
            txn.commit().await?;
            return Ok((total, Vec::new()));
        };
        let todos = query
            .order_by_asc(TodoColumn::Id)
            .offset(offset)
            .limit(limit)
            .select_only()
            .columns([
                TodoColumn::Id,
                TodoColumn::Title,
                TodoColumn::Completed,
                TodoColumn::CreatedAt,
                TodoColumn::UpdatedAt,
            ])
            .into_model::<TodoSummary>()
            .all(&txn)
            .await?;

        txn.commit().await?;
        Ok((total, todos))
    }

    async fn find_one(&self, id: i32) -> Result<Option<Todo>, ApiError> {
        let txn = self.db.begin().await?;
        let todo = TodoEntity::find_by_id(id).one(&txn).await?;
        txn.commit().await?;
        Ok(todo)
    }

    async fn insert(&self, input: TodoCreate) -> Result<Todo, ApiError> {
        let now = Utc::now();
        let model = TodoActiveModel {
            id: Set(self.ids.next_id()),
            title: Set(input.title),
            description: Set(input.description),
            completed: Set(input.completed),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let txn = self.db.begin().await?;
        let todo = model.insert(&txn).await?;
        txn.commit().await?;
        Ok(todo)
    }

    async fn apply_patch(&self, id: i32, patch: TodoUpdate) -> Result<Todo, ApiError> {
        let txn = self.db.begin().await?;
        let current = TodoEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?;

        let mut model: TodoActiveModel = current.into();
        model.title = Set(patch.title);
        if let Some(description) = patch.description {
            model.description = Set(description);
        }
        model.completed = Set(patch.completed);
        model.updated_at = Set(Utc::now());

        let updated = model.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    async fn remove(&self, id: i32) -> Result<(), ApiError> {
        let txn = self.db.begin().await?;
        let todo = TodoEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?;
        todo.delete(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn remove_all(&self) -> Result<u64, ApiError> {
        let txn = self.db.begin().await?;
        let result = TodoEntity::delete_many().exec(&txn).await?;
        txn.commit().await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl TodoRepository for TodoService {
    async fn fetch_many(
        &self,
        page: u64,
        page_size: u64,
        show: TodoShow,
    ) -> Result<(u64, Vec<TodoSummary>), ApiError> {
        PageParams { page, page_size }.validate()?;
        with_deadline(
            self.deadline,
            "fetch_many",
            self.load_page(page, page_size, show),
        )
        .await
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Todo>, ApiError> {
        with_deadline(self.deadline, "get_by_id", self.find_one(id)).await
    }

    async fn create(&self, input: TodoCreate) -> Result<Todo, ApiError> {
        input.validate()?;
        let todo = with_deadline(self.deadline, "create", self.insert(input)).await?;
        tracing::info!(id = todo.id, "Todo created");
        Ok(todo)
    }

    async fn update(&self, id: i32, patch: TodoUpdate) -> Result<Todo, ApiError> {
        patch.validate()?;
        let todo = with_deadline(self.deadline, "update", self.apply_patch(id, patch)).await?;
        tracing::info!(id, "Todo updated");
        Ok(todo)
    }

    async fn delete(&self, id: i32) -> Result<(), ApiError> {
        with_deadline(self.deadline, "delete", self.remove(id)).await?;
        tracing::info!(id, "Todo deleted");
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, ApiError> {
        let removed = with_deadline(self.deadline, "delete_all", self.remove_all()).await?;
        tracing::info!(removed, "All todos deleted");
        Ok(removed)
    }
}

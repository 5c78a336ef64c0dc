use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, Condition, FromQueryResult};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::todo::DESCRIPTION_MAX_CHARS;
use crate::entity::{Todo, TodoColumn};
use crate::validation::{
    Validatable, ValidationError, ValidationErrors, require_max_chars, require_non_blank,
};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 5;

const TITLE_REQUIRED: &str = "Title is required";
const DESCRIPTION_TOO_LONG: &str = "Description must be at most 1200 characters";

/// Which subset of todos a listing shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoShow {
    #[default]
    All,
    Pending,
    Completed,
}

impl TodoShow {
    /// Predicate applied before counting and paging
    #[must_use]
    pub fn condition(self) -> Condition {
        match self {
            Self::All => Condition::all(),
            Self::Pending => Condition::all().add(TodoColumn::Completed.eq(false)),
            Self::Completed => Condition::all().add(TodoColumn::Completed.eq(true)),
        }
    }
}

/// Query parameters for the paged listings.
///
/// Both values are 1-based; `page` defaults to 1 and `pageSize` to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    #[param(example = 1, minimum = 1)]
    pub page: u64,
    /// Number of items per page
    #[serde(default = "default_page_size")]
    #[param(example = 5, minimum = 1)]
    pub page_size: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Validatable for PageParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.page < 1 {
            errors.add(ValidationError::new("page", "page must be at least 1"));
        }
        if self.page_size < 1 {
            errors.add(ValidationError::new("pageSize", "pageSize must be at least 1"));
        }
        errors.result()
    }
}

/// Body of `POST /api/todos`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoCreate {
    #[serde(default)]
    #[schema(example = "Buy milk")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Validatable for TodoCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_non_blank(&mut errors, "title", &self.title, TITLE_REQUIRED);
        if let Some(description) = &self.description {
            require_max_chars(
                &mut errors,
                "description",
                description,
                DESCRIPTION_MAX_CHARS,
                DESCRIPTION_TOO_LONG,
            );
        }
        errors.result()
    }
}

/// Body of `PUT /api/todos/{id}`.
///
/// `title` and `completed` are always written. `description` distinguishes
/// three cases: absent keeps the stored value, `null` clears it, a string
/// replaces it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    #[serde(default)]
    pub title: String,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub completed: bool,
}

impl Validatable for TodoUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_non_blank(&mut errors, "title", &self.title, TITLE_REQUIRED);
        if let Some(Some(description)) = &self.description {
            require_max_chars(
                &mut errors,
                "description",
                description,
                DESCRIPTION_MAX_CHARS,
                DESCRIPTION_TOO_LONG,
            );
        }
        errors.result()
    }
}

/// Full todo, including its description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoDetails {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoDetails {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

/// List projection of a todo; `description` is never selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoSummary {
    pub id: i32,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload of the paged listings
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TodoList {
    pub todos: Vec<TodoSummary>,
}

//! # Error Handling
//!
//! Every failure a handler can produce is an [`ApiError`]. Converting one into
//! a response:
//! - picks the HTTP status code for the variant
//! - renders the same [`AppResponse`](crate::response::AppResponse) envelope
//!   used for successful responses, with `success: false`
//! - logs internal details through `tracing` without sending them to the client
//!
//! ## Usage
//!
//! ```rust,ignore
//! use todo_api::ApiError;
//!
//! async fn handler(State(state): State<AppState>, ApiPath(id): ApiPath<i32>)
//!     -> Result<Envelope<TodoDetails>, ApiError>
//! {
//!     // DbErr converts automatically, RecordNotFound becomes a 404
//!     let todo = state.todos.get(id).await?;
//!     Ok(Envelope::success(TodoDetails::from(todo)))
//! }
//! ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use std::fmt;

use crate::pagination::PageMetaError;
use crate::response::Envelope;
use crate::validation::ValidationErrors;

/// API error type with automatic logging and sanitized envelopes
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found - no row matches the requested id
    NotFound {
        /// Resource type (e.g. "Todo")
        resource: String,
        /// Optional id that wasn't found
        id: Option<String>,
    },

    /// 400 Bad Request - one message per violated field or rule
    BadRequest {
        /// User-facing messages
        messages: Vec<String>,
    },

    /// 401 Unauthorized - no endpoint raises this yet
    Unauthorized {
        /// User-facing messages, possibly empty
        messages: Vec<String>,
    },

    /// 500 Internal Server Error - database error (details logged, not exposed)
    Database {
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },

    /// 500 Internal Server Error - generic internal error
    Internal {
        /// User-facing generic message
        message: String,
        /// Internal error details (logged, not sent to user)
        internal: Option<String>,
    },

    /// 504 Gateway Timeout - a unit-of-work outlived the request deadline
    Timeout {
        /// Name of the operation that timed out
        operation: &'static str,
    },
}

impl ApiError {
    /// Create a 404 Not Found error
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    /// Create a 400 Bad Request error with a single message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            messages: vec![message.into()],
        }
    }

    /// Create a 401 Unauthorized error
    #[must_use]
    pub fn unauthorized(messages: Vec<String>) -> Self {
        Self::Unauthorized { messages }
    }

    /// Create a 500 Internal Server Error from a database error
    ///
    /// The database error details are logged but NOT sent to the user.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database { internal: err }
    }

    /// Create a 500 Internal Server Error with optional details
    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    /// Create a 504 error for an operation that exceeded its deadline
    #[must_use]
    pub fn timeout(operation: &'static str) -> Self {
        Self::Timeout { operation }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// User-facing messages (sanitized)
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::NotFound { resource, id } => vec![match id {
                Some(id) => format!("{resource} with ID '{id}' not found"),
                None => format!("{resource} not found"),
            }],
            Self::BadRequest { messages } | Self::Unauthorized { messages } => messages.clone(),
            Self::Database { .. } => vec!["A database error occurred".to_string()],
            Self::Internal { message, .. } => vec![message.clone()],
            Self::Timeout { .. } => vec!["The request timed out".to_string()],
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            Self::Timeout { operation } => {
                tracing::error!(operation, "Unit of work timed out");
            }
            _ => {
                tracing::debug!(
                    error = %self,
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        match self {
            Self::BadRequest { messages } => Envelope::bad_request_messages(messages),
            Self::Unauthorized { messages } => Envelope::unauthorized(Some(messages)),
            Self::Internal { message, .. } => Envelope::internal_error(message),
            other => Envelope::error(other.messages(), other.status_code()),
        }
        .into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join(", "))
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// Conversions from common error types
// ============================================================================

/// `DbErr::RecordNotFound` becomes a 404, every other variant a sanitized 500.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => {
                let resource = msg.split_whitespace().next().unwrap_or("Resource");
                Self::NotFound {
                    resource: resource.to_string(),
                    id: None,
                }
            }
            _ => Self::Database { internal: err },
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::BadRequest {
            messages: errors.messages(),
        }
    }
}

impl From<PageMetaError> for ApiError {
    fn from(err: PageMetaError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn test_not_found_with_id() {
        let err = ApiError::not_found("Todo", Some("999".to_string()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.messages(), vec!["Todo with ID '999' not found"]);
    }

    #[test]
    fn test_not_found_without_id() {
        let err = ApiError::not_found("Todo", None);
        assert_eq!(err.messages(), vec!["Todo not found"]);
    }

    #[test]
    fn test_bad_request_keeps_every_message() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::new("title", "Title is required"));
        errors.add(ValidationError::new(
            "description",
            "Description must be at most 1200 characters",
        ));
        let err: ApiError = errors.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.messages().len(), 2);
        assert_eq!(err.messages()[0], "Title is required");
    }

    #[test]
    fn test_unauthorized_may_be_empty() {
        let err = ApiError::unauthorized(vec![]);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert!(err.messages().is_empty());
    }

    #[test]
    fn test_database_error_is_sanitized() {
        let err = ApiError::database(DbErr::Custom("secret connection string".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.messages(), vec!["A database error occurred"]);
    }

    #[test]
    fn test_timeout_is_server_side() {
        let err = ApiError::timeout("fetch_many");
        assert!(err.status_code().is_server_error());
        assert_eq!(err.messages(), vec!["The request timed out"]);
    }

    #[test]
    fn test_dberr_record_not_found_becomes_404() {
        let api_err: ApiError = DbErr::RecordNotFound("Todo not found".to_string()).into();
        assert_eq!(api_err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(api_err.messages(), vec!["Todo not found"]);
    }

    #[test]
    fn test_all_other_dberr_become_500() {
        let test_cases = vec![
            DbErr::Custom("Any custom error".to_string()),
            DbErr::Type("Type error".to_string()),
            DbErr::Json("JSON error".to_string()),
        ];

        for db_err in test_cases {
            let api_err: ApiError = db_err.into();
            assert_eq!(api_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_page_meta_error_becomes_400() {
        let api_err: ApiError = PageMetaError::InvalidPageSize.into();
        assert_eq!(api_err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_display_joins_messages() {
        let err = ApiError::BadRequest {
            messages: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(format!("{err}"), "a, b");
    }
}

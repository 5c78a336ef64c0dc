//! # Response Envelope
//!
//! Every endpoint answers with the same JSON shape, whatever the status code:
//!
//! ```json
//! {
//!   "success": true,
//!   "messages": ["Todo Created Successfully"],
//!   "requestId": "…",          // only when set
//!   "pageMeta": { … },          // only for paged lists
//!   "id": 1, "title": "…"       // payload fields, flattened
//! }
//! ```
//!
//! [`AppResponse`] is the body, [`Envelope`] pairs it with a status code and
//! implements [`IntoResponse`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, Serializer};

use crate::pagination::PageMeta;
use crate::validation::ValidationErrors;

/// Message used by [`Envelope::success_default`].
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Success,
    Error,
}

/// Placeholder payload for envelopes that only carry messages.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoPayload {}

/// Uniform response body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppResponse<T = NoPayload> {
    #[serde(rename = "success", serialize_with = "serialize_kind")]
    kind: ResponseKind,
    messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_meta: Option<PageMeta>,
    #[serde(flatten)]
    payload: Option<T>,
}

fn serialize_kind<S: Serializer>(kind: &ResponseKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(*kind == ResponseKind::Success)
}

impl<T> AppResponse<T> {
    fn new(kind: ResponseKind, payload: Option<T>) -> Self {
        Self {
            kind,
            messages: Vec::new(),
            request_id: None,
            page_meta: None,
            payload,
        }
    }

    #[must_use]
    pub fn success(payload: T) -> Self {
        Self::new(ResponseKind::Success, Some(payload))
    }

    #[must_use]
    pub fn failure(payload: Option<T>) -> Self {
        Self::new(ResponseKind::Error, payload)
    }

    /// Append one message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// Replace the message list
    #[must_use]
    pub fn with_messages(mut self, messages: Vec<String>) -> Self {
        self.messages = messages;
        self
    }

    #[must_use]
    pub fn with_page_meta(mut self, page_meta: PageMeta) -> Self {
        self.page_meta = Some(page_meta);
        self
    }

    /// Attach a request id; empty ids are ignored.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        let request_id = request_id.into();
        if !request_id.is_empty() {
            self.request_id = Some(request_id);
        }
        self
    }

    #[must_use]
    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.kind == ResponseKind::Success
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    #[must_use]
    pub fn page_meta(&self) -> Option<&PageMeta> {
        self.page_meta.as_ref()
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

impl AppResponse<NoPayload> {
    /// Success envelope without a payload
    #[must_use]
    pub fn message_only(message: impl Into<String>) -> Self {
        Self::new(ResponseKind::Success, None).with_message(message)
    }

    /// Error envelope without a payload
    #[must_use]
    pub fn error(messages: Vec<String>) -> Self {
        Self::new(ResponseKind::Error, None).with_messages(messages)
    }
}

/// Status code plus envelope, ready to be returned from a handler
#[derive(Debug, Clone)]
pub struct Envelope<T = NoPayload> {
    status: StatusCode,
    body: AppResponse<T>,
}

impl<T> Envelope<T> {
    #[must_use]
    pub fn new(body: AppResponse<T>, status: StatusCode) -> Self {
        Self { status, body }
    }

    /// 200 with a payload and no messages
    #[must_use]
    pub fn success(payload: T) -> Self {
        Self::new(AppResponse::success(payload), StatusCode::OK)
    }

    /// 200 with a payload and one message
    #[must_use]
    pub fn success_with_message(payload: T, message: impl Into<String>) -> Self {
        Self::new(
            AppResponse::success(payload).with_message(message),
            StatusCode::OK,
        )
    }

    /// 200 with a payload and its page metadata
    #[must_use]
    pub fn paged(payload: T, page_meta: PageMeta) -> Self {
        Self::new(
            AppResponse::success(payload).with_page_meta(page_meta),
            StatusCode::OK,
        )
    }

    /// Arbitrary body and status; `messages` replaces the body's list when given.
    #[must_use]
    pub fn generic(
        body: AppResponse<T>,
        messages: Option<Vec<String>>,
        status: StatusCode,
    ) -> Self {
        let body = match messages {
            Some(messages) => body.with_messages(messages),
            None => body,
        };
        Self::new(body, status)
    }

    /// 404 carrying a caller-built payload
    #[must_use]
    pub fn not_found_with(payload: T) -> Self {
        Self::new(AppResponse::failure(Some(payload)), StatusCode::NOT_FOUND)
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn body(&self) -> &AppResponse<T> {
        &self.body
    }
}

impl Envelope<NoPayload> {
    /// 200 with a single message and no payload
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(AppResponse::message_only(message), StatusCode::OK)
    }

    /// 200 with [`DEFAULT_SUCCESS_MESSAGE`]
    #[must_use]
    pub fn success_default() -> Self {
        Self::message(DEFAULT_SUCCESS_MESSAGE)
    }

    /// Failure with any message list and status
    #[must_use]
    pub fn error(messages: Vec<String>, status: StatusCode) -> Self {
        Self::new(AppResponse::error(messages), status)
    }

    /// Generic 404
    #[must_use]
    pub fn not_found() -> Self {
        Self::error(vec!["Not Found".to_string()], StatusCode::NOT_FOUND)
    }

    /// 400 with one message per violated field rule
    #[must_use]
    pub fn bad_request(errors: &ValidationErrors) -> Self {
        Self::bad_request_messages(errors.messages())
    }

    #[must_use]
    pub fn bad_request_messages(messages: Vec<String>) -> Self {
        Self::error(messages, StatusCode::BAD_REQUEST)
    }

    #[must_use]
    pub fn unauthorized(messages: Option<Vec<String>>) -> Self {
        Self::error(messages.unwrap_or_default(), StatusCode::UNAUTHORIZED)
    }

    /// 500 with a single, already sanitized message
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::error(vec![message.into()], StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use serde_json::{Value, json};

    #[derive(Serialize)]
    struct Item {
        id: i32,
        title: String,
    }

    fn to_json<T: Serialize>(envelope: &Envelope<T>) -> Value {
        serde_json::to_value(envelope.body()).unwrap()
    }

    #[test]
    fn test_success_flattens_payload() {
        let envelope = Envelope::success_with_message(
            Item {
                id: 1,
                title: "Write docs".to_string(),
            },
            "Todo Created Successfully",
        );
        assert_eq!(envelope.status(), StatusCode::OK);
        assert_eq!(
            to_json(&envelope),
            json!({
                "success": true,
                "messages": ["Todo Created Successfully"],
                "id": 1,
                "title": "Write docs"
            })
        );
    }

    #[test]
    fn test_success_without_message_has_empty_list() {
        let value = to_json(&Envelope::success(Item {
            id: 2,
            title: "x".to_string(),
        }));
        assert_eq!(value["messages"], json!([]));
        assert!(value.get("requestId").is_none());
        assert!(value.get("pageMeta").is_none());
    }

    #[test]
    fn test_default_success_message() {
        let envelope = Envelope::success_default();
        assert_eq!(envelope.body().messages(), [DEFAULT_SUCCESS_MESSAGE]);
        assert!(envelope.body().is_success());
    }

    #[test]
    fn test_paged_includes_page_meta() {
        let meta = PageMeta::new(2, "/api/todos", 3, 5, 12).unwrap();
        let value = to_json(&Envelope::paged(json!({"todos": []}), meta));
        assert_eq!(value["pageMeta"]["totalPages"], 3);
        assert_eq!(value["todos"], json!([]));
    }

    #[test]
    fn test_generic_not_found() {
        let envelope = Envelope::not_found();
        assert_eq!(envelope.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            to_json(&envelope),
            json!({"success": false, "messages": ["Not Found"]})
        );
    }

    #[test]
    fn test_not_found_with_payload_is_a_failure() {
        let envelope = Envelope::not_found_with(Item {
            id: 9,
            title: "gone".to_string(),
        });
        assert_eq!(envelope.body().kind(), ResponseKind::Error);
        assert_eq!(to_json(&envelope)["id"], 9);
    }

    #[test]
    fn test_bad_request_lists_each_violation() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::new("title", "Title is required"));
        errors.add(ValidationError::new("page", "page must be at least 1"));
        let envelope = Envelope::bad_request(&errors);
        assert_eq!(envelope.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            envelope.body().messages(),
            ["Title is required", "page must be at least 1"]
        );
    }

    #[test]
    fn test_unauthorized_without_messages() {
        let envelope = Envelope::unauthorized(None);
        assert_eq!(envelope.status(), StatusCode::UNAUTHORIZED);
        assert!(envelope.body().messages().is_empty());
        assert!(!envelope.body().is_success());
    }

    #[test]
    fn test_internal_error_single_message() {
        let envelope = Envelope::internal_error("Something went wrong");
        assert_eq!(envelope.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.body().messages(), ["Something went wrong"]);
    }

    #[test]
    fn test_generic_replaces_messages_and_status() {
        let envelope = Envelope::generic(
            AppResponse::message_only("ignored"),
            Some(vec!["first".to_string(), "second".to_string()]),
            StatusCode::ACCEPTED,
        );
        assert_eq!(envelope.status(), StatusCode::ACCEPTED);
        assert_eq!(envelope.body().messages(), ["first", "second"]);
    }

    #[test]
    fn test_request_id_is_serialized_when_set() {
        let body = AppResponse::error(vec!["Not Found".to_string()]).with_request_id("abc-123");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["requestId"], "abc-123");
        assert_eq!(body.request_id(), Some("abc-123"));
    }

    #[test]
    fn test_empty_request_id_is_ignored() {
        let body = AppResponse::message_only("ok").with_request_id("");
        assert!(body.request_id().is_none());
    }
}

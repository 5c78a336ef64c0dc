//! Layers that keep every response, including failures raised outside a
//! handler, inside the [`AppResponse`](crate::response::AppResponse) envelope.

use std::any::Any;

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::response::Envelope;
use crate::routes::REQUEST_ID_HEADER;

/// Copy the request's `x-request-id` into the `requestId` field of error
/// envelopes that do not already carry one.
pub async fn attach_request_id(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned);

    let response = next.run(request).await;
    match request_id {
        Some(request_id) if !response.status().is_success() => {
            stamp_request_id(response, &request_id).await
        }
        _ => response,
    }
}

async fn stamp_request_id(response: Response, request_id: &str) -> Response {
    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, "Failed to buffer error response");
            return Envelope::internal_error("Internal Server Error").into_response();
        }
    };

    let mut body = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(body)) if body.get("success") == Some(&Value::Bool(false)) => body,
        _ => return Response::from_parts(parts, Body::from(bytes)),
    };
    body.entry("requestId")
        .or_insert_with(|| Value::String(request_id.to_owned()));

    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(Value::Object(body).to_string()))
}

/// Response for a handler that panicked; the panic message is logged only.
#[allow(clippy::needless_pass_by_value)]
pub fn panic_envelope(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(details, "Handler panicked");
    Envelope::internal_error("Internal Server Error").into_response()
}

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use uuid::Uuid;

use crate::utils::sanitize::sanitize_json;

const MAX_BODY_LOG_SIZE: usize = 1024; // pre-order payloads are well under 1KB
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs each request and response under a fresh request id. The state flag
/// turns on body logging; bodies are sanitized before they reach the log.
pub async fn request_logger_middleware(
    State(log_body): State<bool>,
    req: Request,
    next: Next,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let request_id_header = HeaderValue::from_str(&request_id).ok();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let (mut parts, body) = req.into_parts();
    if let Some(value) = &request_id_header {
        parts.headers.insert(REQUEST_ID_HEADER, value.clone());
    }

    let body = if log_body {
        // Buffered so it can be logged and then handed on unchanged
        let Ok(bytes) = axum::body::to_bytes(body, MAX_BODY_LOG_SIZE).await else {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                "Request body too large or failed to read"
            );
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        };

        tracing::info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            body_size = bytes.len(),
            body = %describe_body(&bytes),
            "Incoming request"
        );
        Body::from(bytes)
    } else {
        tracing::info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            "Incoming request"
        );
        body
    };

    let mut response = next.run(Request::from_parts(parts, body)).await;

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis(),
        "Outgoing response"
    );

    // Echo the id so clients can quote it when reporting a failed payment
    if let Some(value) = request_id_header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Card fields and secrets are masked; anything that is not JSON is only
/// described by its size.
fn describe_body(bytes: &Bytes) -> String {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(json) => serde_json::to_string(&sanitize_json(&json))
            .unwrap_or_else(|_| "[invalid json]".to_string()),
        Err(_) => format!("[non-json, {} bytes]", bytes.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use axum::{routing::post, Router};
    use tower::ServiceExt;

    fn app(log_body: bool) -> Router {
        Router::new()
            .route("/test", post(|body: String| async move { body }))
            .layer(axum::middleware::from_fn_with_state(
                log_body,
                request_logger_middleware,
            ))
    }

    #[tokio::test]
    async fn test_request_logger_adds_request_id() {
        let response = app(false)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_body_logging_passes_the_body_through() {
        let response = app(true)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/test")
                    .body(Body::from(r#"{"cvc":"123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], br#"{"cvc":"123"}"#);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected_when_logging() {
        let response = app(true)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/test")
                    .body(Body::from("x".repeat(MAX_BODY_LOG_SIZE + 1)))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_describe_body_masks_card_fields() {
        let described = describe_body(&Bytes::from_static(
            br#"{"cardNumber":"4242424242424242","cvc":"123","amount":"25"}"#,
        ));

        assert!(!described.contains("4242424242424242"));
        assert!(!described.contains("\"123\""));
        assert!(described.contains("\"25\""));
        assert_eq!(describe_body(&Bytes::from_static(b"plain")), "[non-json, 5 bytes]");
    }
}

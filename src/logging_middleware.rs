// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode

use axum::body::to_bytes;
use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;

const MAX_LOGGED_BODY_BYTES: usize = 16 * 1024;

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false)
}

fn log_body(label: &str, context: &str, bytes: &[u8]) {
    if bytes.is_empty() || bytes.len() > MAX_LOGGED_BODY_BYTES {
        return;
    }
    if let Ok(body_str) = std::str::from_utf8(bytes) {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(body_str) {
            debug!(
                context = %context,
                body = %serde_json::to_string_pretty(&json).unwrap_or_else(|_| body_str.to_string()),
                "{}",
                label
            );
        } else {
            debug!(context = %context, body = %body_str, "{}", label);
        }
    }
}

/// Logs JSON request and response bodies in debug mode. Multipart uploads
/// and binary downloads pass through untouched.
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    let request_is_json = is_json(
        request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
    );

    let request = if request_is_json {
        let (parts, body) = request.into_parts();
        let bytes = to_bytes(body, usize::MAX)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        log_body(
            "Request",
            &format!("{} {}", parts.method, parts.uri),
            &bytes,
        );

        Request::from_parts(parts, Body::from(bytes))
    } else {
        request
    };

    let response = next.run(request).await;

    let response_is_json = is_json(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
    );
    if !response_is_json {
        return Ok(response);
    }

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    log_body("Response", parts.status.as_str(), &bytes);

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

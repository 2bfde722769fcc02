// src/logging_middleware.rs
//! Request logging: one line when a request arrives, one when it completes,
//! and request/response bodies at debug level.

use axum::body::{to_bytes, Body, Bytes};
use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use std::time::Instant;
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tracing::{debug, error, info, warn, Level};

/// JSON keys whose values never reach the logs
const REDACTED_KEYS: [&str; 3] = ["token", "id_token", "access_token"];

fn printable_body(bytes: &Bytes) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let text = std::str::from_utf8(bytes).ok()?;
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(mut json) => {
            if let Some(map) = json.as_object_mut() {
                for key in REDACTED_KEYS {
                    if let Some(v) = map.get_mut(key) {
                        *v = serde_json::Value::String("[redacted]".to_string());
                    }
                }
            }
            Some(json.to_string())
        }
        Err(_) => Some(text.to_string()),
    }
}

pub async fn log_request(request: Request, next: Next) -> Result<Response, StatusCode> {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    info!(request_id = %request_id, method = %method, uri = %uri, "📥 Request received");

    let debug_bodies = tracing::enabled!(Level::DEBUG);

    let request = if debug_bodies {
        let (parts, body) = request.into_parts();
        let bytes = to_bytes(body, usize::MAX)
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?;
        if let Some(body) = printable_body(&bytes) {
            debug!(request_id = %request_id, request_body = %body, "Request body");
        }
        Request::from_parts(parts, Body::from(bytes))
    } else {
        request
    };

    let response = next.run(request).await;

    let response = if debug_bodies {
        let (parts, body) = response.into_parts();
        let bytes = to_bytes(body, usize::MAX)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        if let Some(body) = printable_body(&bytes) {
            debug!(request_id = %request_id, response_body = %body, "Response body");
        }
        Response::from_parts(parts, Body::from(bytes))
    } else {
        response
    };

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;
    if status.is_server_error() {
        error!(request_id = %request_id, method = %method, uri = %uri, status = %status, duration_ms, "📤 Request failed");
    } else if status.is_client_error() {
        warn!(request_id = %request_id, method = %method, uri = %uri, status = %status, duration_ms, "📤 Request rejected");
    } else {
        info!(request_id = %request_id, method = %method, uri = %uri, status = %status, duration_ms, "📤 Request completed");
    }

    Ok(response)
}

pub fn request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

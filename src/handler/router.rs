//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: CORS preflight, body limits,
//! request logging, dispatch to the notes API / health probes / static
//! frontend, and access logging.

use crate::api::{self, ApiError, NoteRoute};
use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{
    HeaderMap, HeaderName, ACCESS_CONTROL_REQUEST_HEADERS, CONTENT_LENGTH, REFERER, USER_AGENT,
};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Generic over the body so the whole pipeline can be driven without a socket.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();

    let mut response = process(&parts, body, &state).await;

    let http_config = &state.config.http;
    http::apply_common_headers(&mut response, &http_config.server_name, http_config.enable_cors);

    if state.config.logging.access_log {
        let entry = access_entry(&parts, peer_addr, &response, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn process<B>(parts: &Parts, body: B, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    // 1. CORS preflight
    if state.config.http.enable_cors && parts.method == Method::OPTIONS {
        let requested = header_string(&parts.headers, &ACCESS_CONTROL_REQUEST_HEADERS);
        return http::build_preflight_response(requested.as_deref());
    }

    // 2. Read body within the configured limit
    let body = match read_body(&parts.headers, body, state.config.http.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => return e.into_response(),
    };

    // 3. Log before dispatch
    let path = parts.uri.path();
    logger::log_request(parts.method.as_str(), path, &body);

    // 4. Dispatch
    route_request(&parts.method, path, &body, state).await
}

/// Collect the request body, rejecting anything over `max_body_size`
async fn read_body<B>(headers: &HeaderMap, body: B, max_body_size: u64) -> Result<Bytes, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if let Some(size) = header_string(headers, &CONTENT_LENGTH).and_then(|v| v.parse::<u64>().ok())
    {
        if size > max_body_size {
            return Err(ApiError::PayloadTooLarge);
        }
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(ApiError::PayloadTooLarge),
        Err(e) => Err(ApiError::InvalidBody(format!(
            "failed to read request body: {e}"
        ))),
    }
}

/// Route request based on method and path
async fn route_request(
    method: &Method,
    path: &str,
    body: &[u8],
    state: &AppState,
) -> Response<Full<Bytes>> {
    let is_read = matches!(*method, Method::GET | Method::HEAD);

    // Health check endpoints
    let health = &state.config.routes.health;
    if health.enabled && is_read {
        if path == health.liveness_path {
            return http::build_health_response(StatusCode::OK, "ok");
        }
        if path == health.readiness_path {
            return match state.store.ping().await {
                Ok(()) => http::build_health_response(StatusCode::OK, "ok"),
                Err(e) => {
                    logger::log_warning(&format!("Readiness check failed: {e}"));
                    http::build_health_response(StatusCode::SERVICE_UNAVAILABLE, "unavailable")
                }
            };
        }
    }

    // Notes API
    if let Some(route) = NoteRoute::parse(method, path) {
        return api::handle_notes(route, body, state.store.as_ref()).await;
    }

    // Built frontend for everything outside /api
    let is_api_path = path == "/api" || path.starts_with("/api/");
    if is_read && !is_api_path {
        if let Some(dir) = &state.config.routes.static_dir {
            let is_head = *method == Method::HEAD;
            if let Some(resp) =
                static_files::serve_directory(dir, path, &state.config.routes.index_files, is_head)
                    .await
            {
                return resp;
            }
        }
    }

    api::unknown_endpoint()
}

fn header_string(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// "HTTP/1.1" -> "1.1"
fn version_label(version: Version) -> String {
    let label = format!("{version:?}");
    label
        .strip_prefix("HTTP/")
        .map_or_else(|| label.clone(), ToString::to_string)
}

fn access_entry(
    parts: &Parts,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = version_label(parts.version);
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header_string(&parts.headers, &REFERER);
    entry.user_agent = header_string(&parts.headers, &USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

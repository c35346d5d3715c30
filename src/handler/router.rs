//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: CORS preflight, body limits,
//! dispatch to the health endpoint, the JSON API or static resolution, and
//! error dispatch through the fallback controller for everything unmatched.
//! Controllers win over files; a real file under `/api` or `/actuator` is
//! still served when no controller matches.

use crate::api;
use crate::config::AppState;
use crate::handler::{actuator, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::spa::{self, is_reserved_path, ResourceResolver};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_REQUEST_HEADERS, CONTENT_LENGTH,
    IF_NONE_MATCH, ORIGIN, REFERER, SERVER, USER_AGENT,
};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub access_log: bool,
}

fn header_string(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let access_log = state.cached_access_log.load(Ordering::Relaxed);
    if access_log {
        logger::log_request(&method, &uri, version);
    }

    let origin = header_string(req.headers(), ORIGIN);
    let referer = header_string(req.headers(), REFERER);
    let user_agent = header_string(req.headers(), USER_AGENT);

    // 1. CORS preflight
    let is_preflight = method == Method::OPTIONS && origin.is_some();
    let mut response = if is_preflight {
        let requested = header_string(req.headers(), ACCESS_CONTROL_REQUEST_HEADERS);
        handle_preflight(&state, origin.as_deref(), requested.as_deref())
    }
    // 2. Body size
    else if let Some(resp) = check_body_size(req.headers(), state.config.http.max_body_size) {
        resp
    }
    // 3. Dispatch
    else {
        route_request(req, &state, access_log).await
    };

    if !is_preflight {
        state
            .cors
            .apply(origin.as_deref(), None, false, response.headers_mut());
    }
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if access_log {
        let mut entry = AccessLogEntry::new(
            peer.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = format!("{version:?}").trim_start_matches("HTTP/").to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Answer a CORS preflight; unknown origins are refused with 403
fn handle_preflight(
    state: &AppState,
    origin: Option<&str>,
    requested_headers: Option<&str>,
) -> Response<Full<Bytes>> {
    let mut resp = http::build_preflight_response();
    if state
        .cors
        .apply(origin, requested_headers, true, resp.headers_mut())
    {
        resp
    } else {
        logger::log_warning(&format!(
            "CORS preflight rejected for origin {}",
            origin.unwrap_or("-")
        ));
        http::response::build_text_response(StatusCode::FORBIDDEN, "Invalid CORS request")
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route request based on path and method
async fn route_request<B>(
    req: Request<B>,
    state: &AppState,
    access_log: bool,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let ctx = RequestContext {
        path: &path,
        is_head: method == Method::HEAD,
        if_none_match: header_string(req.headers(), IF_NONE_MATCH),
        access_log,
    };
    let is_read = method == Method::GET || method == Method::HEAD;

    // 1. Health endpoint
    if is_read && path == actuator::HEALTH_PATH {
        return actuator::handle_health(state).await;
    }

    // 2. JSON API controllers
    if api::is_api_path(&path) {
        if let Some(resp) = api::handle_api(req, state).await {
            return resp;
        }
    }

    // 3. Static files on any path; reserved paths without a file pass through
    if is_read {
        return serve_static(&ctx, state).await;
    }

    // 4. Reserved paths that no controller claimed
    if is_reserved_path(&path) {
        return spa::handle_error(&ctx, &state.roots, StatusCode::NOT_FOUND).await;
    }

    // 5. Writes outside the API
    logger::log_warning(&format!("Method not allowed: {method} {path}"));
    spa::handle_error(&ctx, &state.roots, StatusCode::METHOD_NOT_ALLOWED).await
}

async fn serve_static(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let resolution = match ResourceResolver::new(&state.roots).resolve(ctx.path) {
        Ok(resolution) => resolution,
        Err(e) => {
            logger::log_error(&e.to_string());
            return spa::handle_error(ctx, &state.roots, StatusCode::INTERNAL_SERVER_ERROR).await;
        }
    };

    match static_files::serve_resolution(ctx, &resolution).await {
        Some(resp) => resp,
        None => spa::handle_error(ctx, &state.roots, StatusCode::NOT_FOUND).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_size_limit() {
        let mut headers = HeaderMap::new();
        assert!(check_body_size(&headers, 10).is_none());

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("11"));
        let resp = check_body_size(&headers, 10).expect("413");
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("10"));
        assert!(check_body_size(&headers, 10).is_none());

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("lots"));
        assert!(check_body_size(&headers, 10).is_none());
    }
}

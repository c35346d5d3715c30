//! Error/fallback controller
//!
//! Last-resort handler for error dispatches: unmatched routes and requests
//! that failed inside the pipeline. Applies the same API-vs-SPA split as the
//! resource resolver:
//!
//! - reserved path (`/api`, `/actuator`) -> plain 404 `Not found`
//! - any other path with status 404 -> SPA entry document, 200 `text/html`
//! - everything else, or entry document unreadable -> plain 500

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::roots::{is_reserved_path, StaticRoots};
use crate::handler::router::RequestContext;
use crate::handler::static_files;
use crate::http;
use crate::logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackDecision {
    NotFound,
    SpaIndex,
    GenericError,
}

/// Pick the answer for an error dispatch of `original_path` with `status`
pub fn decide(original_path: &str, status: StatusCode) -> FallbackDecision {
    if is_reserved_path(original_path) {
        FallbackDecision::NotFound
    } else if status == StatusCode::NOT_FOUND {
        FallbackDecision::SpaIndex
    } else {
        FallbackDecision::GenericError
    }
}

/// Answer an error dispatch for the request described by `ctx`
pub async fn handle_error(
    ctx: &RequestContext<'_>,
    roots: &StaticRoots,
    status: StatusCode,
) -> Response<Full<Bytes>> {
    match decide(ctx.path, status) {
        FallbackDecision::NotFound => http::build_404_response(),
        FallbackDecision::SpaIndex => {
            let Some(index) = roots.locate_index() else {
                logger::log_index_missing(roots.index_file());
                return http::build_500_response();
            };
            match static_files::serve_index(ctx, &index).await {
                Some(resp) => resp,
                None => http::build_500_response(),
            }
        }
        FallbackDecision::GenericError => {
            logger::log_warning(&format!(
                "Error dispatch for {} with status {status}",
                ctx.path
            ));
            http::build_500_response()
        }
    }
}

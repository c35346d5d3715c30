//! Static file serving module
//!
//! Loads resolved files and builds responses with `ETag` support.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, CachePolicy};
use crate::logger;
use crate::spa::Resolution;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

const INDEX_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Serve a resolution that points at a file
///
/// Returns `None` for `PassThrough` and when the file cannot be read, so the
/// caller can continue with error dispatch.
pub async fn serve_resolution(
    ctx: &RequestContext<'_>,
    resolution: &Resolution,
) -> Option<Response<Full<Bytes>>> {
    match resolution {
        Resolution::Asset(path) => serve_asset(ctx, path).await,
        Resolution::SpaIndex(path) => serve_index(ctx, path).await,
        Resolution::PassThrough => None,
    }
}

/// Serve an existing asset with its natural content type
pub async fn serve_asset(ctx: &RequestContext<'_>, path: &Path) -> Option<Response<Full<Bytes>>> {
    let content = load_file(path).await?;
    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    Some(build_static_file_response(
        ctx,
        content,
        content_type,
        CachePolicy::default(),
    ))
}

/// Serve the SPA entry document as `text/html`, status 200, never cached stale
pub async fn serve_index(ctx: &RequestContext<'_>, path: &Path) -> Option<Response<Full<Bytes>>> {
    let content = load_file(path).await?;
    Some(build_static_file_response(
        ctx,
        content,
        INDEX_CONTENT_TYPE,
        CachePolicy::NoCache,
    ))
}

/// Read a whole file, logging failures
pub async fn load_file(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path).await {
        Ok(content) => Some(content),
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            None
        }
    }
}

/// Build a 200 (or 304) file response
fn build_static_file_response(
    ctx: &RequestContext<'_>,
    data: Vec<u8>,
    content_type: &str,
    cache_policy: CachePolicy,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    // Check if client has cached version
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::response::build_304_response(&etag, cache_policy);
    }

    if ctx.access_log {
        logger::log_response(200, data.len());
    }

    http::response::build_file_response(
        Bytes::from(data),
        content_type,
        &etag,
        cache_policy,
        ctx.is_head,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn ctx(if_none_match: Option<String>) -> RequestContext<'static> {
        RequestContext {
            path: "/app.js",
            is_head: false,
            if_none_match,
            access_log: false,
        }
    }

    #[tokio::test]
    async fn test_asset_bytes_and_type() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("app.js");
        std::fs::write(&file, b"export default 1;").expect("write");

        let resp = serve_asset(&ctx(None), &file).await.expect("served");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "application/javascript");
        assert_eq!(resp.headers()["Cache-Control"], "public, max-age=3600");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"export default 1;");
    }

    #[tokio::test]
    async fn test_if_none_match_gives_304() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("index.html");
        std::fs::write(&file, b"<html>").expect("write");
        let etag = cache::generate_etag(b"<html>");

        let resp = serve_index(&ctx(Some(etag)), &file).await.expect("served");
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(resp.headers()["Cache-Control"], "no-cache");
    }

    #[tokio::test]
    async fn test_unreadable_file_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(serve_asset(&ctx(None), &dir.path().join("gone.js")).await.is_none());
        assert!(serve_resolution(&ctx(None), &Resolution::PassThrough).await.is_none());
    }
}

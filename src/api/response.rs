// API response utility functions module

use crate::error::AppError;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_string(body) {
        Ok(json) => http::build_json_response(status, json),
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            http::build_json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"error":"Internal server error"}"#.to_string(),
            )
        }
    }
}

/// 204 No Content after a successful delete
pub fn no_content() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build 204 response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}

/// Map an error to its JSON answer
///
/// Store constraint failures (duplicate names, dangling references) are
/// reported as 409. Server-side failures are logged and answered without
/// detail.
pub fn error_response(err: &AppError) -> Response<Full<Bytes>> {
    let status = if err.is_constraint_violation() {
        StatusCode::CONFLICT
    } else {
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    };

    let message = if status.is_server_error() {
        logger::log_error(&format!("API request failed: {err}"));
        "Internal server error".to_string()
    } else {
        err.to_string()
    };

    json_response(status, &serde_json::json!({ "error": message }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_mapping() {
        let resp = error_response(&AppError::ResourceNotFound("user 9".into()));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "resource not found: user 9");

        let resp = error_response(&AppError::DataAccess(rusqlite::Error::InvalidQuery));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], "Internal server error");
    }

    #[test]
    fn test_no_content() {
        assert_eq!(no_content().status(), StatusCode::NO_CONTENT);
    }
}

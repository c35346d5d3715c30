//! Health endpoint
//!
//! `GET /actuator/health` reports the store and the SPA entry document.
//! Either one failing turns the overall status to `DOWN` with a 503.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::AppState;
use crate::http;
use crate::logger;

pub const HEALTH_PATH: &str = "/actuator/health";

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Up,
    Down,
}

#[derive(Debug, Serialize)]
pub struct Component {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Components {
    pub db: Component,
    pub spa: Component,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: Status,
    pub components: Components,
}

/// Probe the database and the static roots
pub async fn check(state: &AppState) -> Health {
    let db = match state.db.ping().await {
        Ok(()) => Component {
            status: Status::Up,
            detail: None,
        },
        Err(e) => {
            logger::log_error(&format!("Health check: database unavailable: {e}"));
            Component {
                status: Status::Down,
                detail: Some(e.to_string()),
            }
        }
    };

    let spa = match state.roots.require_index() {
        Ok(index) => Component {
            status: Status::Up,
            detail: Some(index.display().to_string()),
        },
        Err(e) => Component {
            status: Status::Down,
            detail: Some(e.to_string()),
        },
    };

    let status = if db.status == Status::Up && spa.status == Status::Up {
        Status::Up
    } else {
        Status::Down
    };

    Health {
        status,
        components: Components { db, spa },
    }
}

pub async fn handle_health(state: &AppState) -> Response<Full<Bytes>> {
    let health = check(state).await;
    let status = match health.status {
        Status::Up => StatusCode::OK,
        Status::Down => StatusCode::SERVICE_UNAVAILABLE,
    };
    match serde_json::to_string(&health) {
        Ok(json) => http::build_json_response(status, json),
        Err(e) => {
            logger::log_error(&format!("Failed to serialize health: {e}"));
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::Database;
    use http_body_util::BodyExt;

    fn state_with_root(dir: &std::path::Path) -> AppState {
        let mut config = Config::load_from("does-not-exist/config").expect("defaults");
        config.static_files.external_dir = Some(dir.display().to_string());
        config.static_files.bundled_dirs = Vec::new();
        AppState::new(&config, Database::open_in_memory().expect("db")).expect("state")
    }

    #[tokio::test]
    async fn test_up_when_db_and_index_present() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("index.html"), "<html>").expect("write");
        let state = state_with_root(dir.path());

        let resp = handle_health(&state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "UP");
        assert_eq!(json["components"]["db"]["status"], "UP");
    }

    #[tokio::test]
    async fn test_down_when_index_removed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let index = dir.path().join("index.html");
        std::fs::write(&index, "<html>").expect("write");
        let state = state_with_root(dir.path());
        std::fs::remove_file(&index).expect("remove");

        let resp = handle_health(&state).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "DOWN");
        assert_eq!(json["components"]["spa"]["status"], "DOWN");
    }
}

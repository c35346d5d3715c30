// Shared setup for the end-to-end tests

#![allow(dead_code)]

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use lar::config::{AppState, Config};
use lar::db::{seed, Database};
use lar::handler;

pub const INDEX_HTML: &str = "<!doctype html><div id=\"app\"></div>";

/// A running application over temp static roots and an in-memory store
pub struct TestApp {
    pub state: Arc<AppState>,
    pub external: TempDir,
    pub bundled: TempDir,
}

pub fn write_file(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// External root holds the SPA document; the bundled root starts empty
pub fn app() -> TestApp {
    let external = tempfile::tempdir().unwrap();
    let bundled = tempfile::tempdir().unwrap();
    write_file(external.path(), "index.html", INDEX_HTML.as_bytes());

    let mut config = Config::load_from("does-not-exist/config").unwrap();
    config.logging.access_log = false;
    config.http.max_body_size = 4096;
    config.static_files.external_dir = Some(external.path().display().to_string());
    config.static_files.bundled_dirs = vec![bundled.path().display().to_string()];

    let db = Database::open_in_memory().unwrap();
    db.with_conn(seed::run).unwrap();
    let state = Arc::new(AppState::new(&config, db).unwrap());

    TestApp {
        state,
        external,
        bundled,
    }
}

pub fn get(uri: &str) -> Request<Full<Bytes>> {
    Request::get(uri).body(Full::new(Bytes::new())).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Full<Bytes>> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

impl TestApp {
    pub async fn send(&self, req: Request<Full<Bytes>>) -> Response<Full<Bytes>> {
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        handler::handle_request(req, Arc::clone(&self.state), peer)
            .await
            .unwrap()
    }
}

pub async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
    resp.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_text(resp: Response<Full<Bytes>>) -> String {
    String::from_utf8(body_bytes(resp).await.to_vec()).unwrap()
}

pub async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

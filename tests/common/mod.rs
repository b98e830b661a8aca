//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use snippetbox::config::AppConfig;
use snippetbox::lifecycle;
use tower::ServiceExt;

/// Fresh directory with a static asset and HTML templates.
pub fn ui_fixture() -> PathBuf {
    let root = std::env::temp_dir().join(format!("snippetbox-ui-{}", uuid::Uuid::new_v4()));
    let static_dir = root.join("static");
    let html_dir = root.join("html");

    std::fs::create_dir_all(static_dir.join("css")).unwrap();
    std::fs::create_dir_all(html_dir.join("partials")).unwrap();
    std::fs::create_dir_all(html_dir.join("pages")).unwrap();

    std::fs::write(static_dir.join("css/main.css"), "main { display: block; }").unwrap();
    std::fs::write(
        html_dir.join("base.html"),
        "<!doctype html><html>{{nav}}<main>{{content}}</main></html>",
    )
    .unwrap();
    std::fs::write(html_dir.join("partials/nav.html"), "<nav><a href='/'>Home</a></nav>").unwrap();
    std::fs::write(html_dir.join("pages/home.html"), "<h2>Latest Snippets</h2>").unwrap();

    root
}

/// Config pointing at a fixture, plain-text home page.
pub fn config_for(root: &PathBuf) -> AppConfig {
    let mut config = AppConfig::default();
    config.ui.static_dir = root.join("static");
    config
}

/// Send one request through the full router without a socket.
pub async fn send(config: AppConfig, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "localhost:4000")
        .body(Body::empty())
        .unwrap();
    send_request(config, request).await
}

pub async fn send_request(config: AppConfig, request: Request<Body>) -> Response<Body> {
    let server = lifecycle::assemble(config).unwrap();
    server.router().oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

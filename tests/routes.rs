//! End-to-end routing through the assembled router.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};

mod common;

use common::{body_string, config_for, send, send_request, ui_fixture};

#[tokio::test]
async fn test_root_served_by_home() {
    let root = ui_fixture();
    let response = send(config_for(&root), Method::GET, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("date"));
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_string(response).await, "Hello from SnippetBox");
}

#[tokio::test]
async fn test_unregistered_path_is_404() {
    let root = ui_fixture();
    let response = send(config_for(&root), Method::GET, "/anything-else").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "Not Found\n");
}

#[tokio::test]
async fn test_html_home_page() {
    let root = ui_fixture();
    let mut config = config_for(&root);
    config.ui.html_dir = Some(root.join("html"));

    let response = send(config, Method::GET, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/html; charset=utf-8"
    );
    let body = body_string(response).await;
    assert!(body.contains("<h2>Latest Snippets</h2>"));
    assert!(body.contains("<nav>"));
}

#[tokio::test]
async fn test_missing_templates_yield_generic_500() {
    let root = ui_fixture();
    let mut config = config_for(&root);
    config.ui.html_dir = Some(root.join("does-not-exist"));

    let response = send(config, Method::GET, "/").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert_eq!(body, "Internal Server Error\n");
}

#[tokio::test]
async fn test_snippet_view_ids() {
    let root = ui_fixture();

    let response = send(config_for(&root), Method::GET, "/snippet/view?id=5").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains('5'));

    for uri in [
        "/snippet/view?id=0",
        "/snippet/view?id=-1",
        "/snippet/view?id=abc",
        "/snippet/view",
    ] {
        let response = send(config_for(&root), Method::GET, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn test_percent_encoded_paths_match_decoded() {
    let root = ui_fixture();

    for uri in ["/snippet/vi%65w?id=5", "/snippet%2Fview?id=5"] {
        let response = send(config_for(&root), Method::GET, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(
            body_string(response).await,
            "Display a specific snippet with id 5"
        );
    }
}

#[tokio::test]
async fn test_snippet_create_get_is_405() {
    let root = ui_fixture();
    let response = send(config_for(&root), Method::GET, "/snippet/create").await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["allow"], "POST");
    assert_eq!(body_string(response).await, "Method Not Allowed\n");
}

#[tokio::test]
async fn test_snippet_create_post() {
    let root = ui_fixture();
    let response = send(config_for(&root), Method::POST, "/snippet/create").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let headers = response.headers();
    assert_eq!(headers["content-type"], "application/json");
    assert!(!headers.contains_key("date"));
    let cache: Vec<_> = headers
        .get_all("cache-control")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cache, ["public", "max-age=32645000"]);
    assert_eq!(headers["key-in-down-case"], "keeps-in-down-case");

    let body = body_string(response).await;
    assert!(body.contains("Create a new snippet..."));
}

#[tokio::test]
async fn test_dot_segments_redirect_once() {
    let root = ui_fixture();
    let response = send(config_for(&root), Method::GET, "/any/../snippet//view?id=3").await;

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    let location = response.headers()["location"].to_str().unwrap().to_string();
    assert_eq!(location, "/snippet/view?id=3");

    let followed = send(config_for(&root), Method::GET, &location).await;
    assert_eq!(followed.status(), StatusCode::OK);
    assert_eq!(
        body_string(followed).await,
        "Display a specific snippet with id 3"
    );
}

#[tokio::test]
async fn test_subtree_without_slash_redirects() {
    let root = ui_fixture();
    let response = send(config_for(&root), Method::GET, "/static").await;

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()["location"], "/static/");
}

#[tokio::test]
async fn test_static_file() {
    let root = ui_fixture();
    let response = send(config_for(&root), Method::GET, "/static/css/main.css").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/css");
    assert_eq!(body_string(response).await, "main { display: block; }");
}

#[tokio::test]
async fn test_static_range_request() {
    let root = ui_fixture();
    let request = Request::builder()
        .uri("/static/css/main.css")
        .header("host", "localhost:4000")
        .header("range", "bytes=0-3")
        .body(Body::empty())
        .unwrap();

    let response = send_request(config_for(&root), request).await;
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.headers()["content-range"], "bytes 0-3/24");
    assert_eq!(body_string(response).await, "main");
}

#[tokio::test]
async fn test_static_missing_file() {
    let root = ui_fixture();
    let response = send(config_for(&root), Method::GET, "/static/missing.js").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_closure_example() {
    let root = ui_fixture();
    let response = send(config_for(&root), Method::GET, "/closure-example").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_string(response).await,
        "Handler using closure as a example."
    );
}

//! Static file serving.
//!
//! Strips a fixed prefix and hands the rest of the path to
//! `tower_http::services::ServeDir`, which does its own traversal checks,
//! conditional requests and ranges. Its headers and status are copied into
//! the response context and the file body is streamed through untouched.

use std::path::Path;

use async_trait::async_trait;
use axum::body::Body;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::app::AppContext;
use crate::http::{Handler, HandlerError, Request, ResponseContext};
use crate::routing::escape_path;

/// Serves files under `root` for requests below `prefix`.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    prefix: String,
    dir: ServeDir,
}

impl StaticFiles {
    /// `prefix` is stripped before lookup, e.g. `/static` for `/static/`.
    pub fn new(prefix: impl Into<String>, root: impl AsRef<Path>) -> Self {
        Self {
            prefix: prefix.into(),
            dir: ServeDir::new(root.as_ref()),
        }
    }
}

#[async_trait]
impl Handler for StaticFiles {
    async fn serve(
        &self,
        w: &mut ResponseContext,
        req: &Request,
        _app: &AppContext,
    ) -> Result<(), HandlerError> {
        let Some(rest) = req.path().strip_prefix(self.prefix.as_str()) else {
            return Err(HandlerError::NotFound);
        };

        let path = if rest.starts_with('/') {
            escape_path(rest)
        } else {
            escape_path(&format!("/{rest}"))
        };
        let uri = match req.raw_query() {
            Some(query) => format!("{path}?{query}"),
            None => path,
        };

        let mut builder = axum::http::Request::builder()
            .method(req.method().clone())
            .uri(uri);
        if let Some(headers) = builder.headers_mut() {
            headers.extend(req.headers().clone());
        }
        let inner = builder
            .body(Body::empty())
            .map_err(HandlerError::internal)?;

        let response = self
            .dir
            .clone()
            .oneshot(inner)
            .await
            .unwrap_or_else(|never| match never {});
        let (parts, body) = response.into_parts();

        for (name, value) in parts.headers.iter() {
            let value = value.to_str().map_err(HandlerError::internal)?;
            w.add_header(name.as_str(), value)?;
        }

        w.set_status(parts.status)?;
        w.stream_body(Body::new(body))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("snippetbox-static-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(dir.join("css")).unwrap();
        std::fs::write(dir.join("css/main.css"), "body { color: black; }").unwrap();
        dir
    }

    async fn serve(files: &StaticFiles, target: &str) -> (ResponseContext, Result<(), HandlerError>) {
        let mut w = ResponseContext::new();
        let result = files
            .serve(&mut w, &Request::new(Method::GET, target), &AppContext::default())
            .await;
        (w, result)
    }

    async fn body_of(w: ResponseContext) -> Vec<u8> {
        let body = w.into_response().into_body();
        axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn test_serves_file_below_prefix() {
        let dir = scratch_dir();
        let files = StaticFiles::new("/static", &dir);

        let (w, result) = serve(&files, "/static/css/main.css").await;
        result.unwrap();
        assert_eq!(w.status(), Some(StatusCode::OK));
        assert_eq!(w.header("Content-Type"), Some("text/css"));
        assert!(w.is_streaming());
        assert_eq!(body_of(w).await, b"body { color: black; }");

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_large_file_is_streamed_not_buffered() {
        let dir = scratch_dir();
        let contents: Vec<u8> = (0..4 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
        std::fs::write(dir.join("big.bin"), &contents).unwrap();
        let files = StaticFiles::new("/static", &dir);

        let (w, result) = serve(&files, "/static/big.bin").await;
        result.unwrap();
        assert_eq!(w.status(), Some(StatusCode::OK));
        assert!(w.is_streaming());
        assert!(w.body().is_empty());
        assert_eq!(
            w.header("Content-Length"),
            Some(contents.len().to_string().as_str())
        );
        assert_eq!(body_of(w).await, contents);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_encoded_file_name() {
        let dir = scratch_dir();
        std::fs::write(dir.join("read me.txt"), "spaced").unwrap();
        let files = StaticFiles::new("/static", &dir);

        let (w, result) = serve(&files, "/static/read%20me.txt").await;
        result.unwrap();
        assert_eq!(w.status(), Some(StatusCode::OK));
        assert_eq!(body_of(w).await, b"spaced");

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = scratch_dir();
        let files = StaticFiles::new("/static", &dir);

        let (w, result) = serve(&files, "/static/nope.js").await;
        result.unwrap();
        assert_eq!(w.status(), Some(StatusCode::NOT_FOUND));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_path_without_prefix_is_not_found() {
        let files = StaticFiles::new("/static", "/nonexistent");
        let (_, result) = serve(&files, "/public/main.css").await;
        assert!(matches!(result, Err(HandlerError::NotFound)));
    }
}

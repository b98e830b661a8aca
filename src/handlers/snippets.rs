//! Snippet endpoints.

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::app::{AppContext, LogSink};
use crate::http::{handler_fn, Handler, HandlerError, Request, ResponseContext, SharedHandler};

/// Home page, registered on the `/` subtree.
///
/// The subtree catches every otherwise unmatched path, so anything other
/// than the root itself is answered with 404 here.
#[derive(Debug, Clone, Copy, Default)]
pub struct Home;

#[async_trait]
impl Handler for Home {
    async fn serve(
        &self,
        w: &mut ResponseContext,
        req: &Request,
        app: &AppContext,
    ) -> Result<(), HandlerError> {
        if req.path() != "/" {
            return Err(HandlerError::NotFound);
        }

        let page = app.pages.render("home").await?;
        w.write_body(page);
        Ok(())
    }
}

/// `GET /snippet/view?id=N`
pub fn snippet_view(
    w: &mut ResponseContext,
    req: &Request,
    _app: &AppContext,
) -> Result<(), HandlerError> {
    let id = req
        .query("id")
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|id| *id >= 1)
        .ok_or(HandlerError::NotFound)?;

    w.write_body(format!("Display a specific snippet with id {id}"));
    Ok(())
}

/// `POST /snippet/create`
pub fn snippet_create(
    w: &mut ResponseContext,
    req: &Request,
    _app: &AppContext,
) -> Result<(), HandlerError> {
    if *req.method() != Method::POST {
        return Err(HandlerError::method_not_allowed([Method::POST]));
    }

    w.set_header("Content-Type", "application/json")?;
    w.suppress_header("Date")?;
    w.add_header("cache-control", "public")?;
    w.add_header("Cache-Control", "max-age=32645000")?;
    w.set_header_raw("key-in-down-case", "keeps-in-down-case")?;
    w.set_status(StatusCode::CREATED)?;

    let body = serde_json::to_vec(&json!({ "message": "Create a new snippet..." }))
        .map_err(HandlerError::internal)?;
    w.write_body(body);
    Ok(())
}

/// Handler whose dependency is captured by a closure at registration.
pub fn closure_example(info_log: LogSink) -> SharedHandler {
    handler_fn(move |w, _req, _app| {
        info_log.log("Handler using closure as a example");
        w.write_body("Handler using closure as a example.");
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{HtmlFiles, RenderError};
    use std::sync::Arc;

    fn run_sync(
        handler: fn(&mut ResponseContext, &Request, &AppContext) -> Result<(), HandlerError>,
        req: Request,
    ) -> (ResponseContext, Result<(), HandlerError>) {
        let mut w = ResponseContext::new();
        let result = handler(&mut w, &req, &AppContext::default());
        (w, result)
    }

    #[tokio::test]
    async fn test_home_root() {
        let mut w = ResponseContext::new();
        Home.serve(&mut w, &Request::new(Method::GET, "/"), &AppContext::default())
            .await
            .unwrap();
        assert_eq!(w.body(), b"Hello from SnippetBox");
        assert_eq!(w.status(), Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_home_rejects_non_root() {
        let mut w = ResponseContext::new();
        let result = Home
            .serve(&mut w, &Request::new(Method::GET, "/anything"), &AppContext::default())
            .await;
        assert!(matches!(result, Err(HandlerError::NotFound)));
        assert!(w.body().is_empty());
    }

    #[tokio::test]
    async fn test_home_render_failure_is_server_error() {
        let app = AppContext::new(Arc::new(HtmlFiles::new("/nonexistent/snippetbox/html")));
        let mut w = ResponseContext::new();
        let result = Home.serve(&mut w, &Request::new(Method::GET, "/"), &app).await;
        assert!(matches!(result, Err(HandlerError::Render(RenderError::Read { .. }))));
        assert!(!w.is_committed());
    }

    #[test]
    fn test_view_valid_id() {
        let (w, result) = run_sync(snippet_view, Request::new(Method::GET, "/snippet/view?id=5"));
        result.unwrap();
        assert_eq!(w.body(), b"Display a specific snippet with id 5");
    }

    #[test]
    fn test_view_invalid_ids() {
        for target in [
            "/snippet/view?id=0",
            "/snippet/view?id=-1",
            "/snippet/view?id=abc",
            "/snippet/view?id=",
            "/snippet/view",
        ] {
            let (w, result) = run_sync(snippet_view, Request::new(Method::GET, target));
            assert!(matches!(result, Err(HandlerError::NotFound)), "{target}");
            assert!(w.body().is_empty());
        }
    }

    #[test]
    fn test_create_requires_post() {
        let (w, result) = run_sync(snippet_create, Request::new(Method::GET, "/snippet/create"));
        match result {
            Err(HandlerError::MethodNotAllowed { allowed }) => assert_eq!(allowed, [Method::POST]),
            other => panic!("expected MethodNotAllowed, got {other:?}"),
        }
        assert!(w.headers().is_empty());
        assert!(!w.is_committed());
    }

    #[test]
    fn test_create_post() {
        let (mut w, result) =
            run_sync(snippet_create, Request::new(Method::POST, "/snippet/create"));
        result.unwrap();
        w.finish();

        assert_eq!(w.status(), Some(StatusCode::CREATED));
        assert_eq!(w.header("Content-Type"), Some("application/json"));
        assert_eq!(w.header_values("Cache-Control"), ["public", "max-age=32645000"]);
        assert_eq!(w.header_raw("key-in-down-case"), Some("keeps-in-down-case"));
        assert!(w.header("Date").is_none());

        let body: serde_json::Value = serde_json::from_slice(w.body()).unwrap();
        assert_eq!(body["message"], "Create a new snippet...");
    }

    #[tokio::test]
    async fn test_closure_example() {
        let handler = closure_example(LogSink::info("test"));
        let mut w = ResponseContext::new();
        handler
            .serve(&mut w, &Request::new(Method::GET, "/closure-example"), &AppContext::default())
            .await
            .unwrap();
        assert_eq!(w.body(), b"Handler using closure as a example.");
    }
}

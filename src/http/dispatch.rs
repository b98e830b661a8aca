//! Request dispatch.
//!
//! # Responsibilities
//! - Resolve the request against the pattern table
//! - Answer redirects (301) and unmatched paths (404) without any handler
//! - Invoke exactly one handler otherwise
//! - Shape handler failures into 404/405/500 responses
//!
//! # Design Decisions
//! - Stateless across requests; shares the table and context via `Arc`
//! - Client errors are answered locally and logged at debug level only
//! - Server errors go through the context's error sink with a backtrace

use std::backtrace::Backtrace;
use std::error::Error as _;
use std::sync::Arc;

use axum::http::StatusCode;

use super::error::{allow_header, HandlerError};
use super::handler::SharedHandler;
use super::request::Request;
use super::response::{ResponseContext, ResponseError};
use crate::app::AppContext;
use crate::routing::{escape_path, PatternTable, Resolution};

/// Routes each request to at most one handler.
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<PatternTable<SharedHandler>>,
    app: Arc<AppContext>,
}

impl Dispatcher {
    pub fn new(table: Arc<PatternTable<SharedHandler>>, app: Arc<AppContext>) -> Self {
        Self { table, app }
    }

    /// Handle one request and return the finished response.
    pub async fn dispatch(&self, req: &Request) -> ResponseContext {
        let mut w = ResponseContext::new();

        match self.table.resolve(req.host(), req.path()) {
            Resolution::Redirect(target) => {
                let target = escape_path(&target);
                let location = match req.raw_query() {
                    Some(query) if !query.is_empty() => format!("{target}?{query}"),
                    _ => target,
                };
                tracing::debug!(from = %req.path(), to = %location, "Redirecting");
                let result = w.redirect(&location, StatusCode::MOVED_PERMANENTLY, req.method());
                report_unwritable(result);
            }
            Resolution::NotFound => {
                tracing::debug!(path = %req.path(), "No route matched");
                self.fail(&mut w, req, HandlerError::NotFound);
            }
            Resolution::Matched(registration) => {
                tracing::debug!(
                    method = %req.method(),
                    path = %req.path(),
                    pattern = %registration.pattern(),
                    "Dispatching"
                );
                if let Err(err) = registration.handler().serve(&mut w, req, &self.app).await {
                    self.fail(&mut w, req, err);
                }
            }
        }

        w.finish();
        w
    }

    fn fail(&self, w: &mut ResponseContext, req: &Request, err: HandlerError) {
        if !err.is_client_error() {
            self.log_server_error(req, &err);
        }

        if w.is_committed() {
            tracing::warn!(
                path = %req.path(),
                status = ?w.status(),
                error = %err,
                "Response already committed, cannot report error"
            );
            return;
        }

        let status = err.status();
        let text = status.canonical_reason().unwrap_or("Error");
        let result = match &err {
            HandlerError::MethodNotAllowed { allowed } => w
                .set_header("Allow", allow_header(allowed))
                .and_then(|()| w.error(status, text)),
            _ => w.error(status, text),
        };
        report_unwritable(result);
    }

    fn log_server_error(&self, req: &Request, err: &HandlerError) {
        let mut message = format!("{} {}: {}", req.method(), req.path(), err);
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(&format!("\n  caused by: {cause}"));
            source = cause.source();
        }
        let trace = Backtrace::force_capture();
        self.app.error_log.log(format_args!("{message}\n{trace}"));
    }
}

fn report_unwritable(result: Result<(), ResponseError>) {
    if let Err(err) = result {
        tracing::warn!(error = %err, "Failed to write built-in response");
    }
}

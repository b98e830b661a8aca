//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router whose fallback feeds every request to the
//!   dispatcher, so the pattern table is the only routing authority
//! - Wire up middleware (tracing, request ID)
//! - Buffer request bodies up to the configured limit
//! - Accept HTTP/1 connections until the shutdown signal fires, then drain
//!
//! # Design Decisions
//! - Connections are served by hyper directly with its automatic `Date`
//!   header turned off; the response context adds `Date` itself unless a
//!   handler suppressed it

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::dispatch::Dispatcher;
use crate::http::request::{Request, UuidRequestId};

/// Application state injected into the dispatch glue.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub max_body_size: usize,
}

/// HTTP server for the application.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around an assembled dispatcher.
    pub fn new(config: &AppConfig, dispatcher: Dispatcher) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            max_body_size: config.limits.max_body_size,
        };

        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut http = http1::Builder::new();
        http.timer(TokioTimer::new()).auto_date_header(false);
        let graceful = GracefulShutdown::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                            continue;
                        }
                    };

                    let service = TowerToHyperService::new(self.router.clone());
                    let conn = graceful.watch(http.serve_connection(TokioIo::new(stream), service));
                    tokio::spawn(async move {
                        if let Err(e) = conn.await {
                            tracing::debug!(peer = %peer, error = %e, "Connection closed with error");
                        }
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }

        drop(listener);
        graceful.shutdown().await;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Fallback handler: every request lands here.
async fn dispatch_handler(
    State(state): State<AppState>,
    request: axum::extract::Request,
) -> Response {
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %parts.uri.path(), error = %e, "Request body rejected");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large\n").into_response();
        }
    };

    let request = Request::from_parts(parts, body);
    state.dispatcher.dispatch(&request).await.into_response()
}

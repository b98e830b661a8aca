//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the application context from configuration
//! - Register every route before anything is served
//! - Hand the frozen pattern table to the dispatcher and server
//!
//! # Design Decisions
//! - Fail fast: a bad registration aborts startup
//! - Subsystems initialize in order, not concurrently

use std::sync::Arc;

use crate::app::AppContext;
use crate::config::AppConfig;
use crate::handlers;
use crate::http::{Dispatcher, HttpServer};
use crate::routing::RouteError;

/// Assemble a ready-to-run server from configuration.
pub fn assemble(config: AppConfig) -> Result<HttpServer, RouteError> {
    let app = Arc::new(AppContext::from_config(&config.ui));
    let table = handlers::routes(&config.ui, &app)?;

    tracing::info!(
        routes = table.len(),
        static_dir = %config.ui.static_dir.display(),
        "Routes registered"
    );

    let dispatcher = Dispatcher::new(Arc::new(table), app);
    Ok(HttpServer::new(&config, dispatcher))
}

//! Endpoint handlers and route registration.
//!
//! # Routes
//! ```text
//! /static/           StaticFiles  (subtree, prefix /static stripped)
//! /                  Home         (subtree, answers only the root)
//! /snippet/view      snippet_view
//! /snippet/create    snippet_create
//! /closure-example   closure_example
//! ```

use std::sync::Arc;

pub mod snippets;
pub mod static_files;

pub use snippets::{closure_example, snippet_create, snippet_view, Home};
pub use static_files::StaticFiles;

use crate::app::AppContext;
use crate::config::UiConfig;
use crate::http::{handler_fn, SharedHandler};
use crate::routing::{PatternTable, RouteError};

/// Assemble the pattern table for the application.
pub fn routes(ui: &UiConfig, app: &AppContext) -> Result<PatternTable<SharedHandler>, RouteError> {
    let mut table: PatternTable<SharedHandler> = PatternTable::new();

    table.register("/static/", Arc::new(StaticFiles::new("/static", &ui.static_dir)))?;
    table.register("/", Arc::new(Home))?;
    table.register("/snippet/view", handler_fn(snippet_view))?;
    table.register("/snippet/create", handler_fn(snippet_create))?;
    table.register("/closure-example", closure_example(app.info_log))?;

    Ok(table)
}

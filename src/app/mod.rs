//! Application context.
//!
//! Built once at startup, read-only afterwards, and passed explicitly to
//! every handler invocation. Holds the log sinks and the page renderer.

use std::sync::Arc;

pub mod render;
pub mod sink;

pub use render::{HtmlFiles, PageRenderer, RenderError, TextPages};
pub use sink::LogSink;

use crate::config::UiConfig;

/// Dependencies shared by all handlers.
#[derive(Clone)]
pub struct AppContext {
    pub info_log: LogSink,
    pub error_log: LogSink,
    pub pages: Arc<dyn PageRenderer>,
}

impl AppContext {
    pub fn new(pages: Arc<dyn PageRenderer>) -> Self {
        Self {
            info_log: LogSink::info("info"),
            error_log: LogSink::error("error"),
            pages,
        }
    }

    /// Pick the renderer from the UI settings.
    pub fn from_config(ui: &UiConfig) -> Self {
        let pages: Arc<dyn PageRenderer> = match &ui.html_dir {
            Some(dir) => Arc::new(HtmlFiles::new(dir)),
            None => Arc::new(TextPages),
        };
        Self::new(pages)
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(Arc::new(TextPages))
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("info_log", &self.info_log)
            .field("error_log", &self.error_log)
            .finish_non_exhaustive()
    }
}

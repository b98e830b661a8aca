//! SnippetBox: a small HTTP server built around an exact/subtree pattern router.

pub mod app;
pub mod config;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use app::AppContext;
pub use config::AppConfig;
pub use http::{Dispatcher, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::PatternTable;

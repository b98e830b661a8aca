//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (axum / hyper)
//!     → server.rs (fallback glue, request ID, trace span, body buffering)
//!     → request.rs (method, host, raw path, query)
//!     → dispatch.rs (pattern table lookup: redirect / 404 / handler)
//!     → handler.rs (one handler, injected AppContext)
//!     → response.rs (header rules, status commit, implicit headers)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod error;
pub mod handler;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::Dispatcher;
pub use error::HandlerError;
pub use handler::{handler_fn, Handler, SharedHandler};
pub use headers::{canonical_header_key, HeaderTable};
pub use request::{Request, X_REQUEST_ID};
pub use response::{ResponseContext, ResponseError, ResponseState};
pub use server::HttpServer;

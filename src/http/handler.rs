//! Handler trait and function adapters.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::HandlerError;
use super::request::Request;
use super::response::ResponseContext;
use crate::app::AppContext;

/// Endpoint behavior invoked by the dispatcher.
///
/// Handlers hold no per-request state; everything they need arrives as
/// arguments, the application context included.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn serve(
        &self,
        w: &mut ResponseContext,
        req: &Request,
        app: &AppContext,
    ) -> Result<(), HandlerError>;
}

/// Handler shared between the pattern table and in-flight requests.
pub type SharedHandler = Arc<dyn Handler>;

/// Adapter turning a synchronous function or closure into a `Handler`.
pub struct HandlerFn<F>(F);

#[async_trait]
impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut ResponseContext, &Request, &AppContext) -> Result<(), HandlerError> + Send + Sync,
{
    async fn serve(
        &self,
        w: &mut ResponseContext,
        req: &Request,
        app: &AppContext,
    ) -> Result<(), HandlerError> {
        (self.0)(w, req, app)
    }
}

/// Wrap a function or closure as a shared handler.
///
/// Closures can capture dependencies at registration time.
pub fn handler_fn<F>(f: F) -> SharedHandler
where
    F: Fn(&mut ResponseContext, &Request, &AppContext) -> Result<(), HandlerError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(HandlerFn(f))
}

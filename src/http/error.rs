//! Handler failure taxonomy.
//!
//! - `NotFound` and `MethodNotAllowed` are client conditions, answered with
//!   404/405 and never logged as errors
//! - everything else is a server error: logged with a trace through the
//!   error sink, answered with a bare 500

use axum::http::{Method, StatusCode};
use thiserror::Error;

use super::response::ResponseError;
use crate::app::RenderError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a handler could not produce its normal response.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not found")]
    NotFound,

    #[error("method not allowed, expected {}", allow_header(.allowed))]
    MethodNotAllowed { allowed: Vec<Method> },

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("internal error: {0}")]
    Internal(BoxError),
}

impl HandlerError {
    pub fn method_not_allowed(allowed: impl IntoIterator<Item = Method>) -> Self {
        Self::MethodNotAllowed {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn internal(err: impl Into<BoxError>) -> Self {
        Self::Internal(err.into())
    }

    /// Status code the client receives for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Response(_) | Self::Render(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-caused conditions; these never reach the error sink.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

/// Value for the `Allow` header.
pub fn allow_header(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, percent-decoded path)
//!     → path.rs (canonicalize: collapse ., .., //)
//!     → router.rs (redirect check, exact lookup, longest subtree match)
//!     → pattern.rs (fixed vs subtree matching)
//!     → Return: Matched registration, Redirect target, or NotFound
//!
//! Route Registration (at startup):
//!     register(pattern, handler) × N
//!     → validate pattern, reject duplicates
//!     → keep subtree patterns sorted longest-first
//!     → Freeze behind Arc, immutable while serving
//! ```
//!
//! # Design Decisions
//! - Exact-path and subtree matching only (no methods, no variables, no regex)
//! - Longer patterns win regardless of kind or registration order
//! - Explicit NotFound rather than a silent default

use thiserror::Error;

pub mod path;
pub mod pattern;
pub mod router;

pub use path::{clean_path, decode_path, escape_path};
pub use pattern::{Pattern, PatternKind};
pub use router::{PatternTable, Registration, Resolution};

/// Invalid route registration. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route pattern must not be empty")]
    EmptyPattern,

    #[error("route pattern {0:?} has no path")]
    MalformedPattern(String),

    #[error("multiple registrations for {0:?}")]
    DuplicatePattern(String),
}

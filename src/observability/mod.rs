//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (routing decisions, dispatch, server errors)
//!     → tower-http trace spans (one per request, with request ID)
//!
//! Consumers:
//!     → logging.rs installs the subscriber (stdout, env-filtered)
//! ```
//!
//! # Design Decisions
//! - Structured logging through `tracing`, never `println!`
//! - `RUST_LOG` overrides the configured level
//! - Handlers log through the sinks in `AppContext`, not directly

pub mod logging;

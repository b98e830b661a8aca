//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → --addr flag overrides the listener address
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; no runtime reconfiguration
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, UiConfig};
pub use validation::{validate_config, ValidationError};

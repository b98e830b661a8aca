//! Named log sinks injected into handlers.

use std::fmt::Display;

use tracing::Level;

/// A named destination for application log lines.
///
/// Sinks are plain values emitting through `tracing`, so any number of
/// concurrent handler invocations can share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSink {
    name: &'static str,
    level: Level,
}

impl LogSink {
    pub fn info(name: &'static str) -> Self {
        Self {
            name,
            level: Level::INFO,
        }
    }

    pub fn error(name: &'static str) -> Self {
        Self {
            name,
            level: Level::ERROR,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Emit one line.
    pub fn log(&self, message: impl Display) {
        if self.level == Level::ERROR {
            tracing::error!(sink = self.name, "{}", message);
        } else {
            tracing::info!(sink = self.name, "{}", message);
        }
    }
}

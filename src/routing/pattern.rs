//! Route patterns.
//!
//! # Pattern kinds
//! - Fixed (`/snippet/view`): matches only the identical path
//! - Subtree (`/`, `/static/`): ends with `/` and matches the path itself and
//!   everything nested under it
//!
//! A pattern that does not begin with `/` is host-qualified
//! (`example.com/create`) and only applies to requests for that host.
//!
//! # Design Decisions
//! - Kind is derived from the trailing separator, never declared separately
//! - Matching is plain string comparison on the canonical path (no regex)
//! - Path matching is case-sensitive, host matching is done on the
//!   lowercased request host

use std::fmt;

use super::RouteError;

/// How a pattern matches request paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Matches only an identical path.
    Fixed,
    /// Matches the path and all of its descendants.
    Subtree,
}

/// A validated route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    raw: String,
    /// Byte offset of the path part (0 unless host-qualified).
    path_start: usize,
}

impl Pattern {
    /// Parse and validate a pattern string.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        if raw.is_empty() {
            return Err(RouteError::EmptyPattern);
        }

        let path_start = raw
            .find('/')
            .ok_or_else(|| RouteError::MalformedPattern(raw.to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            path_start,
        })
    }

    /// The full pattern string, host included.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> PatternKind {
        if self.raw.ends_with('/') {
            PatternKind::Subtree
        } else {
            PatternKind::Fixed
        }
    }

    /// Host part for host-qualified patterns.
    pub fn host(&self) -> Option<&str> {
        (self.path_start > 0).then(|| &self.raw[..self.path_start])
    }

    /// Path part of the pattern.
    pub fn path(&self) -> &str {
        &self.raw[self.path_start..]
    }

    pub fn is_host_specific(&self) -> bool {
        self.path_start > 0
    }

    /// Returns true if this pattern matches the lookup key.
    ///
    /// The key is a canonical path, prefixed with the request host when
    /// host-qualified patterns are being tried.
    pub fn matches(&self, key: &str) -> bool {
        match self.kind() {
            PatternKind::Fixed => key == self.raw,
            PatternKind::Subtree => key.starts_with(&self.raw),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

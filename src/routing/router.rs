//! Pattern table: route registration and lookup.
//!
//! # Responsibilities
//! - Store registrations, append-only while the server is being assembled
//! - Canonicalize the request path and signal redirects for non-canonical paths
//! - Redirect `/tree` to `/tree/` when only the subtree is registered
//! - Pick the longest matching pattern, or report an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (shared via `Arc`, no locks on lookup)
//! - O(1) exact lookup via HashMap, O(n) scan over subtree patterns kept
//!   sorted longest-first
//! - Generic over the handler type so the table knows nothing about HTTP

use std::collections::HashMap;

use super::path::clean_path;
use super::pattern::{Pattern, PatternKind};
use super::RouteError;

/// A pattern together with the handler registered for it.
#[derive(Debug)]
pub struct Registration<H> {
    pattern: Pattern,
    handler: H,
}

impl<H> Registration<H> {
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// Outcome of resolving a request path.
#[derive(Debug)]
pub enum Resolution<'a, H> {
    /// A registration matched the canonical path.
    Matched(&'a Registration<H>),
    /// The client must retry at this path (301).
    Redirect(String),
    /// Nothing matched.
    NotFound,
}

/// Ordered collection of (pattern, handler) registrations.
#[derive(Debug)]
pub struct PatternTable<H> {
    registrations: Vec<Registration<H>>,
    /// Full pattern string -> index, for every kind.
    exact: HashMap<String, usize>,
    /// Indices of subtree patterns, longest pattern first.
    subtrees: Vec<usize>,
    /// Whether any host-qualified pattern was registered.
    hosts: bool,
}

impl<H> Default for PatternTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> PatternTable<H> {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            exact: HashMap::new(),
            subtrees: Vec::new(),
            hosts: false,
        }
    }

    /// Register a handler for a pattern.
    pub fn register(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        let pattern = Pattern::parse(pattern)?;
        if self.exact.contains_key(pattern.as_str()) {
            return Err(RouteError::DuplicatePattern(pattern.as_str().to_string()));
        }

        let index = self.registrations.len();
        self.exact.insert(pattern.as_str().to_string(), index);

        if pattern.kind() == PatternKind::Subtree {
            let len = pattern.as_str().len();
            let position = self
                .subtrees
                .iter()
                .position(|&i| self.registrations[i].pattern.as_str().len() < len)
                .unwrap_or(self.subtrees.len());
            self.subtrees.insert(position, index);
        }

        if pattern.is_host_specific() {
            self.hosts = true;
        }

        tracing::debug!(pattern = %pattern, kind = ?pattern.kind(), "Route registered");
        self.registrations.push(Registration { pattern, handler });
        Ok(())
    }

    /// Resolve a request to a registration, a redirect, or no match.
    ///
    /// `path` is the percent-decoded request path; `host` is the request host
    /// without port. Redirect targets are decoded too.
    pub fn resolve(&self, host: Option<&str>, path: &str) -> Resolution<'_, H> {
        let host = host.map(str::to_ascii_lowercase).unwrap_or_default();
        let cleaned = clean_path(path);

        if self.should_add_slash(&host, &cleaned) {
            return Resolution::Redirect(format!("{cleaned}/"));
        }

        if cleaned != path {
            return Resolution::Redirect(cleaned);
        }

        match self.lookup(&host, path) {
            Some(registration) => Resolution::Matched(registration),
            None => Resolution::NotFound,
        }
    }

    /// Find the best registration for a canonical path.
    fn lookup(&self, host: &str, path: &str) -> Option<&Registration<H>> {
        if self.hosts && !host.is_empty() {
            if let Some(registration) = self.longest_match(&format!("{host}{path}")) {
                return Some(registration);
            }
        }
        self.longest_match(path)
    }

    fn longest_match(&self, key: &str) -> Option<&Registration<H>> {
        if let Some(&index) = self.exact.get(key) {
            return Some(&self.registrations[index]);
        }

        self.subtrees
            .iter()
            .map(|&index| &self.registrations[index])
            .find(|registration| registration.pattern.matches(key))
    }

    /// True when `path` is not registered but `path + "/"` is.
    fn should_add_slash(&self, host: &str, path: &str) -> bool {
        if path.ends_with('/') {
            return false;
        }

        let mut candidates = vec![path.to_string()];
        if self.hosts && !host.is_empty() {
            candidates.push(format!("{host}{path}"));
        }

        if candidates.iter().any(|c| self.exact.contains_key(c.as_str())) {
            return false;
        }

        candidates
            .iter()
            .any(|c| self.exact.contains_key(format!("{c}/").as_str()))
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Registered patterns in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.registrations.iter().map(|r| &r.pattern)
    }
}

//! Inbound request view and request ids.
//!
//! # Responsibilities
//! - Capture method, host, decoded path and query of an inbound request
//! - Parse query parameters (last value wins on `query`)
//! - Generate a unique request ID (UUID v4) for tracing
//!
//! # Design Decisions
//! - Read-only once built; handlers only see `&Request`
//! - Path is percent-decoded but not cleaned, so the router can detect
//!   and redirect non-canonical paths

use axum::body::Bytes;
use axum::http::{header, request::Parts, HeaderMap, Method};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::routing::decode_path;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request as seen by the dispatcher and handlers.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    host: Option<String>,
    path: String,
    raw_query: Option<String>,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    /// Build a request from a method and a request target (`/path?query`).
    pub fn new(method: Method, target: &str) -> Self {
        let (path, raw_query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        Self {
            method,
            host: None,
            path: decode_path(path),
            raw_query: raw_query.map(str::to_string),
            query: raw_query.map(parse_query).unwrap_or_default(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Build a request from transport parts and a buffered body.
    pub fn from_parts(parts: Parts, body: Bytes) -> Self {
        let host = parts
            .uri
            .host()
            .map(str::to_string)
            .or_else(|| {
                parts
                    .headers
                    .get(header::HOST)
                    .and_then(|h| h.to_str().ok())
                    .map(|h| strip_host_port(h).to_string())
            })
            .filter(|h| !h.is_empty());

        let raw_query = parts.uri.query().map(str::to_string);

        Self {
            method: parts.method,
            host,
            path: decode_path(parts.uri.path()),
            query: raw_query.as_deref().map(parse_query).unwrap_or_default(),
            raw_query,
            headers: parts.headers,
            body,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request host without port.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Percent-decoded path, not yet cleaned.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn raw_query(&self) -> Option<&str> {
        self.raw_query.as_deref()
    }

    /// Value of a query parameter. When repeated, the last value wins.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value of a query parameter, in order.
    pub fn query_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Strip `:port` from a Host header value. IPv6 brackets are removed too.
fn strip_host_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split_once(']').map(|(addr, _)| addr).unwrap_or(host);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.bytes().all(|b| b.is_ascii_digit()) => {
            name
        }
        _ => host,
    }
}

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

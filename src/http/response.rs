//! Response context handed to handlers.
//!
//! # State machine
//! ```text
//! Open → HeadersMutable → Committed → BodyWritten
//! ```
//! - header mutation is only accepted before the status is committed
//! - `set_status` commits; a second commit is an error
//! - `write_body` is always accepted and commits 200 if nothing was committed
//! - states never move backward
//!
//! Implicit headers (`Date`, sniffed `Content-Type`) are added by `finish`,
//! unless the handler set or suppressed them.
//!
//! The body is buffered, or handed over as a stream with `stream_body` so
//! large payloads never sit in memory. Bytes written after a stream are sent
//! once the stream ends.

use std::fmt;
use std::io;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::Response;
use futures_util::{stream, StreamExt};
use thiserror::Error;

use super::headers::HeaderTable;

/// Lifecycle of a single response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResponseState {
    Open,
    HeadersMutable,
    Committed,
    BodyWritten,
}

/// Illegal operation for the current response state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("status already committed as {0}")]
    StatusCommitted(StatusCode),

    #[error("cannot change header {0:?} after the status is committed")]
    HeadersCommitted(String),

    #[error("body already started, cannot switch to a stream")]
    BodyStarted,
}

struct Streamed(Body);

impl fmt::Debug for Streamed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Streamed(..)")
    }
}

/// Outgoing response under construction.
#[derive(Debug)]
pub struct ResponseContext {
    state: ResponseState,
    status: Option<StatusCode>,
    headers: HeaderTable,
    body: Vec<u8>,
    stream: Option<Streamed>,
    tail: Vec<u8>,
    finished: bool,
}

impl Default for ResponseContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseContext {
    pub fn new() -> Self {
        Self {
            state: ResponseState::Open,
            status: None,
            headers: HeaderTable::new(),
            body: Vec::new(),
            stream: None,
            tail: Vec::new(),
            finished: false,
        }
    }

    pub fn state(&self) -> ResponseState {
        self.state
    }

    /// Committed status, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn is_committed(&self) -> bool {
        self.state >= ResponseState::Committed
    }

    pub fn headers(&self) -> &HeaderTable {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn header_raw(&self, name: &str) -> Option<&str> {
        self.headers.get_raw(name)
    }

    pub fn header_values(&self, name: &str) -> &[String] {
        self.headers.values(name)
    }

    pub fn header_line(&self, name: &str) -> Option<String> {
        self.headers.line(name)
    }

    /// Buffered body bytes. Empty when the body is streamed.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    fn begin_header_mutation(&mut self, name: &str) -> Result<(), ResponseError> {
        if self.is_committed() {
            return Err(ResponseError::HeadersCommitted(name.to_string()));
        }
        self.state = ResponseState::HeadersMutable;
        Ok(())
    }

    /// Set a header, replacing previous values. The name is canonicalized.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) -> Result<(), ResponseError> {
        self.begin_header_mutation(name)?;
        self.headers.set(name, value);
        Ok(())
    }

    /// Append a header value. The name is canonicalized.
    pub fn add_header(&mut self, name: &str, value: impl Into<String>) -> Result<(), ResponseError> {
        self.begin_header_mutation(name)?;
        self.headers.add(name, value);
        Ok(())
    }

    /// Set a header keeping the caller's casing of the name.
    pub fn set_header_raw(&mut self, name: &str, value: impl Into<String>) -> Result<(), ResponseError> {
        self.begin_header_mutation(name)?;
        self.headers.set_raw(name, value);
        Ok(())
    }

    pub fn remove_header(&mut self, name: &str) -> Result<(), ResponseError> {
        self.begin_header_mutation(name)?;
        self.headers.remove(name);
        Ok(())
    }

    /// Drop a header, including implicit ones such as `Date`.
    pub fn suppress_header(&mut self, name: &str) -> Result<(), ResponseError> {
        self.begin_header_mutation(name)?;
        self.headers.suppress(name);
        Ok(())
    }

    /// Commit the status code. Headers are frozen from here on.
    pub fn set_status(&mut self, status: StatusCode) -> Result<(), ResponseError> {
        if let Some(current) = self.status {
            return Err(ResponseError::StatusCommitted(current));
        }
        self.status = Some(status);
        self.state = ResponseState::Committed;
        Ok(())
    }

    /// Append to the body, committing 200 first if no status was set.
    pub fn write_body(&mut self, bytes: impl AsRef<[u8]>) {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.state = ResponseState::BodyWritten;
        if self.stream.is_some() {
            self.tail.extend_from_slice(bytes.as_ref());
        } else {
            self.body.extend_from_slice(bytes.as_ref());
        }
    }

    /// Send `body` as a stream, committing 200 first if no status was set.
    ///
    /// Must come before any buffered write.
    pub fn stream_body(&mut self, body: Body) -> Result<(), ResponseError> {
        if self.stream.is_some() || !self.body.is_empty() {
            return Err(ResponseError::BodyStarted);
        }
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.state = ResponseState::BodyWritten;
        self.stream = Some(Streamed(body));
        Ok(())
    }

    /// Plain-text error reply: `text` plus a newline.
    pub fn error(&mut self, status: StatusCode, text: &str) -> Result<(), ResponseError> {
        self.set_header("Content-Type", "text/plain; charset=utf-8")?;
        self.set_header("X-Content-Type-Options", "nosniff")?;
        self.set_status(status)?;
        self.write_body(text);
        self.write_body("\n");
        Ok(())
    }

    /// Redirect to `location`. GET and HEAD also get a short HTML body.
    pub fn redirect(
        &mut self,
        location: &str,
        status: StatusCode,
        method: &Method,
    ) -> Result<(), ResponseError> {
        self.set_header("Location", location)?;
        let with_body = *method == Method::GET || *method == Method::HEAD;
        if with_body {
            self.set_header("Content-Type", "text/html; charset=utf-8")?;
        }
        self.set_status(status)?;
        if with_body {
            let reason = status.canonical_reason().unwrap_or("Redirect");
            self.write_body(format!(
                "<a href=\"{}\">{}</a>.\n",
                html_escape(location),
                reason
            ));
        }
        Ok(())
    }

    /// Commit 200 if still open and add implicit headers. Idempotent.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
            self.state = ResponseState::Committed;
        }

        self.headers.insert_implicit("Date", http_date());
        if self.stream.is_none() && !self.body.is_empty() {
            self.headers
                .insert_implicit("Content-Type", sniff_content_type(&self.body));
        }
    }

    /// Convert into a transport response.
    ///
    /// `http::HeaderMap` stores names lower-cased; casing is only observable
    /// on the context itself.
    pub fn into_response(mut self) -> Response {
        self.finish();

        let mut headers = HeaderMap::new();
        for entry in self.headers.iter() {
            let name = match HeaderName::from_bytes(entry.name.as_bytes()) {
                Ok(name) => name,
                Err(_) => {
                    tracing::warn!(header = %entry.name, "Dropping header with invalid name");
                    continue;
                }
            };
            for value in &entry.values {
                match HeaderValue::from_str(value) {
                    Ok(value) => {
                        headers.append(name.clone(), value);
                    }
                    Err(_) => {
                        tracing::warn!(header = %entry.name, "Dropping header with invalid value");
                    }
                }
            }
        }

        let body = match self.stream {
            None => Body::from(self.body),
            Some(Streamed(body)) if self.tail.is_empty() => body,
            Some(Streamed(body)) => {
                let tail = Bytes::from(self.tail);
                let rest = stream::once(async move { Ok::<_, axum::Error>(tail) });
                Body::from_stream(body.into_data_stream().chain(rest))
            }
        };

        let mut response = Response::new(body);
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = headers;
        response
    }
}

impl io::Write for ResponseContext {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_body(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Current time as an IMF-fixdate.
fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

fn sniff_content_type(body: &[u8]) -> &'static str {
    let first = body.iter().find(|b| !b.is_ascii_whitespace());
    if first == Some(&b'<') {
        "text/html; charset=utf-8"
    } else if std::str::from_utf8(body).is_ok() {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

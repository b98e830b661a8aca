//! Lexical path canonicalization.
//!
//! Collapses `.` and `..` segments and duplicate separators without touching
//! the filesystem. The result is always rooted, and `..` can never climb
//! above `/`.
//!
//! Routing works on percent-decoded paths; `escape_path` turns a decoded
//! path back into something fit for a `Location` header or a request URI.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Bytes escaped when a decoded path goes back on the wire.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-decode a request path. Invalid UTF-8 is replaced lossily and
/// malformed escapes are left as they are.
pub fn decode_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Re-escape a decoded path.
pub fn escape_path(path: &str) -> String {
    utf8_percent_encode(path, PATH).to_string()
}

/// Return the canonical form of a request path.
///
/// - an empty path becomes `/`
/// - a missing leading `/` is added
/// - `.`, `..` and empty segments are collapsed
/// - a trailing `/` on the input is kept, except for the root itself
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }

    if cleaned.is_empty() {
        cleaned.push('/');
    } else if path.ends_with('/') {
        cleaned.push('/');
    }

    cleaned
}

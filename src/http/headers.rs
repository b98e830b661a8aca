//! Response header table.
//!
//! Two ways in:
//! - the mutation API (`set`, `add`, `remove`, `get`) canonicalizes names to
//!   the HTTP/1 convention, `content-type` → `Content-Type`
//! - the raw API (`set_raw`, `get_raw`) stores and finds names exactly as
//!   given, so `key-in-down-case` stays lower case
//!
//! Keys are compared as stored, so a raw lower-case key and its canonical
//! spelling are two distinct entries.

/// Canonical form of a header name: first letter and every letter after a
/// hyphen upper-cased, the rest lower-cased.
///
/// Names containing bytes that are not valid in an HTTP token are returned
/// unchanged.
pub fn canonical_header_key(name: &str) -> String {
    if !name.bytes().all(is_token_byte) {
        return name.to_string();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
                | b'`' | b'|' | b'~'
        )
}

/// One header name with all of its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    pub name: String,
    pub values: Vec<String>,
}

/// Insertion-ordered multi-value header map.
#[derive(Debug, Clone, Default)]
pub struct HeaderTable {
    entries: Vec<HeaderEntry>,
    /// Canonical names of implicit headers the handler asked to drop.
    suppressed: Vec<String>,
}

impl HeaderTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == key)
    }

    fn unsuppress(&mut self, key: &str) {
        self.suppressed.retain(|s| s != key);
    }

    /// Replace all values of a header (canonical name).
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let key = canonical_header_key(name);
        self.replace(key, value.into());
    }

    /// Append a value to a header (canonical name).
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        let key = canonical_header_key(name);
        self.unsuppress(&key);
        match self.position(&key) {
            Some(i) => self.entries[i].values.push(value.into()),
            None => self.entries.push(HeaderEntry {
                name: key,
                values: vec![value.into()],
            }),
        }
    }

    /// Replace all values of a header, keeping the name exactly as given.
    pub fn set_raw(&mut self, name: &str, value: impl Into<String>) {
        self.replace(name.to_string(), value.into());
    }

    fn replace(&mut self, key: String, value: String) {
        self.unsuppress(&key);
        match self.position(&key) {
            Some(i) => self.entries[i].values = vec![value],
            None => self.entries.push(HeaderEntry {
                name: key,
                values: vec![value],
            }),
        }
    }

    /// Delete a header (canonical name).
    pub fn remove(&mut self, name: &str) {
        let key = canonical_header_key(name);
        self.entries.retain(|e| e.name != key);
    }

    /// Delete a header and keep it from being added implicitly later.
    pub fn suppress(&mut self, name: &str) {
        let key = canonical_header_key(name);
        self.entries.retain(|e| e.name != key);
        if !self.suppressed.contains(&key) {
            self.suppressed.push(key);
        }
    }

    pub fn is_suppressed(&self, name: &str) -> bool {
        let key = canonical_header_key(name);
        self.suppressed.contains(&key)
    }

    /// Add a header only when neither set nor suppressed by the handler.
    pub(crate) fn insert_implicit(&mut self, name: &str, value: impl Into<String>) {
        let key = canonical_header_key(name);
        if self.position(&key).is_none() && !self.suppressed.contains(&key) {
            self.entries.push(HeaderEntry {
                name: key,
                values: vec![value.into()],
            });
        }
    }

    /// First value of a header (canonical name).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(String::as_str)
    }

    /// First value of a header looked up by its exact name.
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.position(name)
            .and_then(|i| self.entries[i].values.first())
            .map(String::as_str)
    }

    /// All values of a header (canonical name).
    pub fn values(&self, name: &str) -> &[String] {
        let key = canonical_header_key(name);
        self.position(&key)
            .map(|i| self.entries[i].values.as_slice())
            .unwrap_or(&[])
    }

    /// All values joined with `", "`, the single-line HTTP form.
    pub fn line(&self, name: &str) -> Option<String> {
        let values = self.values(name);
        (!values.is_empty()).then(|| values.join(", "))
    }

    pub fn contains(&self, name: &str) -> bool {
        !self.values(name).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

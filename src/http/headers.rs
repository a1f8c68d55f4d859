//! Ordered multi-value header map.
//!
//! # Design Decisions
//! - Lookup is ASCII case-insensitive on the name
//! - Repeated names keep insertion order; a single-string read joins them with `", "`
//! - The spelling of the first occurrence of a name is the one emitted
//! - Empty names are rejected at insertion

/// Common header names.
pub mod names {
    pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
    pub const CONTENT_ENCODING: &str = "Content-Encoding";
    pub const CONTENT_LENGTH: &str = "Content-Length";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const HOST: &str = "Host";
    pub const TRANSFER_ENCODING: &str = "Transfer-Encoding";
    pub const X_REQUEST_ID: &str = "x-request-id";
}

/// Common header values.
pub mod values {
    pub const CHUNKED: &str = "chunked";
    pub const FORM: &str = "application/x-www-form-urlencoded";
    pub const GZIP: &str = "gzip";
    pub const JSON: &str = "application/json";
}

/// Ordered sequence of `(name, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// All values for `name` joined with `", "`, or `None` when absent.
    pub fn get(&self, name: &str) -> Option<String> {
        let values = self.get_all(name);
        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    /// Every value for `name` in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Replace every value for `name` with a single value.
    ///
    /// The first occurrence keeps its position and spelling.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        if name.is_empty() {
            tracing::warn!("Ignoring header with empty name");
            return;
        }
        let value = value.into();
        match self.entries.iter().position(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(first) => {
                self.entries[first].1 = value;
                let mut index = 0;
                self.entries.retain(|(n, _)| {
                    let keep = index <= first || !n.eq_ignore_ascii_case(name);
                    index += 1;
                    keep
                });
            }
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Append a value without touching existing ones.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        if name.is_empty() {
            tracing::warn!("Ignoring header with empty name");
            return;
        }
        self.entries.push((name.to_string(), value.into()));
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// Append every pair of `other`, in order.
    pub fn extend(&mut self, other: &Headers) {
        for (name, value) in other.iter() {
            self.add(name, value);
        }
    }

    /// Raw pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// One `(name, joined value)` line per distinct name, in first-occurrence
    /// order, using the first occurrence's spelling.
    pub fn joined(&self) -> Vec<(String, String)> {
        let mut lines: Vec<(String, String)> = Vec::new();
        for (name, value) in &self.entries {
            match lines.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
                Some((_, joined)) => {
                    joined.push_str(", ");
                    joined.push_str(value);
                }
                None => lines.push((name.clone(), value.clone())),
            }
        }
        lines
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for Headers
where
    N: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.add(name.as_ref(), value);
        }
        headers
    }
}

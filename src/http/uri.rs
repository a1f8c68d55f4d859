//! Request URIs.
//!
//! # Design Decisions
//! - Parsing is tolerant: an unusable authority (e.g. a garbage `Host` header
//!   folded into an absolute URL) is dropped and the path is still returned
//! - Invalid percent-encoding in the query is passed through literally
//! - Query parameters are an ordered multi-map; appending never replaces
//! - A bare `?flag` is the pair (`flag`, ""), so it re-encodes as `flag=`

use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::error::MalformedUriError;

/// A parsed URI: optional authority, a path and an ordered query multi-map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uri {
    scheme: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: String,
    query: Vec<(String, String)>,
}

impl Uri {
    /// Parse an absolute URL (`http://host:port/path?query`) or an
    /// origin-form target (`/path?query`).
    pub fn parse(raw: &str) -> Result<Self, MalformedUriError> {
        let malformed = |reason| MalformedUriError {
            input: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(malformed("empty input"));
        }
        if raw.chars().any(|c| c.is_ascii_control()) {
            return Err(malformed("contains control characters"));
        }

        // Fragments never travel on the wire; drop them.
        let raw_target = raw.split('#').next().unwrap_or_default();

        let mut uri = Uri {
            scheme: None,
            host: None,
            port: None,
            path: String::new(),
            query: Vec::new(),
        };

        let remainder = match split_scheme(raw_target) {
            Some((scheme, rest)) => {
                let end = rest.find(|c: char| c == '/' || c == '?').unwrap_or(rest.len());
                let (authority, remainder) = rest.split_at(end);
                match parse_authority(authority) {
                    Some((host, port)) => {
                        uri.scheme = Some(scheme.to_ascii_lowercase());
                        uri.host = Some(host);
                        uri.port = port;
                    }
                    None => {
                        tracing::debug!(authority = %authority, "Ignoring unusable URI authority");
                    }
                }
                remainder
            }
            None => {
                if !(raw_target.starts_with('/') || raw_target.starts_with('?') || raw_target == "*") {
                    return Err(malformed("expected an absolute URL or an origin-form path"));
                }
                raw_target
            }
        };

        let (path, query) = match remainder.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (remainder, None),
        };

        uri.path = if path.is_empty() { "/".to_string() } else { path.to_string() };
        if let Some(query) = query {
            uri.query = form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
        }

        Ok(uri)
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Non-empty path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// First value declared for `name`.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value declared for `name`, in declaration order.
    pub fn queries(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Append a query value; existing values under `name` are kept.
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = if path.is_empty() { "/".to_string() } else { path };
        self
    }

    /// The encoded query string, without the leading `?`. Every pair is
    /// written as `name=value`, including empty values.
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }

    /// `path?query`, the origin form sent on a request line.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string())
        }
    }
}

impl FromStr for Uri {
    type Err = MalformedUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uri::parse(s)
    }
}

impl fmt::Display for Uri {
    /// Absolute form when an authority is known, `path?query` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(host) = &self.host {
            write!(f, "{}://{}", self.scheme.as_deref().unwrap_or("http"), host)?;
            if let Some(port) = self.port {
                write!(f, ":{}", port)?;
            }
        }
        f.write_str(&self.path_and_query())
    }
}

fn split_scheme(raw: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = raw.split_once("://")?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some((scheme, rest))
}

/// Returns `None` when the authority is unusable.
fn parse_authority(authority: &str) -> Option<(String, Option<u16>)> {
    let authority = authority.rsplit('@').next().unwrap_or(authority);

    let (host, port) = if let Some(stripped) = authority.strip_prefix('[') {
        let (inner, after) = stripped.split_once(']')?;
        if inner.is_empty() || !inner.chars().all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.') {
            return None;
        }
        (format!("[{}]", inner), after.strip_prefix(':'))
    } else {
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (authority, None),
        };
        let valid = !host.is_empty()
            && host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '%'));
        if !valid {
            return None;
        }
        (host.to_ascii_lowercase(), port)
    };

    let port = match port {
        Some("") | None => None,
        Some(port) => Some(port.parse::<u16>().ok()?),
    };

    Some((host, port))
}

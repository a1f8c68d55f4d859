//! Error taxonomy for the routing layer.
//!
//! # Design Decisions
//! - Parsing and decoding errors are recovered at the adapter boundary into a
//!   well-formed response; none of them reach the wire beyond a status code
//! - `RouteNotFound` is an expected outcome, not an operator-facing failure
//! - Handler panics are folded into `HandlerError` so the listener survives

use thiserror::Error;

use crate::http::Method;

/// A URI that cannot be decomposed into a path and query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed URI {input:?}: {reason}")]
pub struct MalformedUriError {
    pub input: String,
    pub reason: &'static str,
}

/// No declared route matched the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route for {method} {path}")]
pub struct RouteNotFound {
    pub method: Method,
    pub path: String,
}

/// Failures while reading or interpreting a message body.
#[derive(Debug, Error)]
pub enum BodyError {
    /// Gzip decompression, form parsing or text decoding failed.
    #[error("failed to decode body: {0}")]
    Decode(String),

    /// The underlying octet stream failed (connection reset, aborted upload).
    #[error("body stream failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised by user handler logic.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Body(#[from] BodyError),

    #[error("handler failed: {0}")]
    Failed(String),

    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Build a handler failure from any displayable cause.
    pub fn failed(cause: impl std::fmt::Display) -> Self {
        Self::Failed(cause.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Failed(e.to_string())
    }
}

/// Host engine lifecycle errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server failed while serving: {0}")]
    Serve(#[from] std::io::Error),

    #[error("server task did not finish cleanly: {0}")]
    Join(String),
}

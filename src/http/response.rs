//! Response model.
//!
//! # Design Decisions
//! - Same consuming-builder shape as `Request`
//! - Status is kept as a plain `u16` within 100..=599

use crate::error::BodyError;
use crate::http::body::{Body, BodyStream};
use crate::http::headers::Headers;

#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: Headers,
    body: Body,
}

impl Response {
    /// Create a response; out-of-range codes are clamped to 500.
    pub fn new(status: u16) -> Self {
        let status = if (100..=599).contains(&status) {
            status
        } else {
            tracing::warn!(status, "Invalid status code, using 500");
            500
        };
        Self {
            status,
            headers: Headers::new(),
            body: Body::Empty,
        }
    }

    /// `Response::new(status).with_body(body)`.
    pub fn of(status: u16, body: impl Into<Body>) -> Self {
        Self::new(status).with_body(body)
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn not_found() -> Self {
        Self::new(404)
    }

    pub fn bad_request() -> Self {
        Self::new(400)
    }

    pub fn internal_error() -> Self {
        Self::new(500)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.get(name)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_string(&self) -> Option<String> {
        self.body.as_string()
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Response::new(status).status;
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    pub fn replace_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn remove_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    pub fn with_headers(mut self, headers: &Headers) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    pub async fn buffered(self) -> Result<Self, BodyError> {
        let Response { status, headers, body } = self;
        Ok(Response {
            status,
            headers,
            body: body.buffered().await?,
        })
    }

    pub async fn into_text(self) -> Result<String, BodyError> {
        self.body.into_text().await
    }

    pub fn into_body_stream(self) -> BodyStream {
        self.body.into_stream()
    }

    pub fn into_parts(self) -> (u16, Headers, Body) {
        (self.status, self.headers, self.body)
    }

    pub fn from_parts(status: u16, headers: Headers, body: Body) -> Self {
        Response::new(status).with_headers(&headers).with_body(body)
    }
}

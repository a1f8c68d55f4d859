//! Request model.
//!
//! # Responsibilities
//! - Carry method, URI, headers and body as one owned value
//! - Offer `with_*` builders that consume the request and return the updated one
//! - Expose query, header and body accessors to handlers and filters
//!
//! # Design Decisions
//! - Builders take `self` by value: a request can never be mutated behind the
//!   back of another holder
//! - Reading a stream body consumes the request (`into_*`), or replaces it by
//!   its buffered text (`buffered`)

use crate::error::{BodyError, MalformedUriError};
use crate::http::body::{Body, BodyStream};
use crate::http::form::Form;
use crate::http::headers::{names, values, Headers};
use crate::http::method::Method;
use crate::http::uri::Uri;

#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: Headers,
    body: Body,
}

impl Request {
    pub fn new(method: impl Into<Method>, uri: Uri) -> Self {
        Self {
            method: method.into(),
            uri,
            headers: Headers::new(),
            body: Body::Empty,
        }
    }

    /// Build a request from a raw URI string.
    pub fn of(method: impl Into<Method>, uri: &str) -> Result<Self, MalformedUriError> {
        Ok(Self::new(method, Uri::parse(uri)?))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.get(name)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.uri.query(name)
    }

    pub fn queries(&self, name: &str) -> Vec<&str> {
        self.uri.queries(name)
    }

    /// Body text for re-readable bodies; `None` for an unread stream.
    pub fn body_string(&self) -> Option<String> {
        self.body.as_string()
    }

    pub fn body_form(&self) -> Option<&Form> {
        self.body.as_form()
    }

    pub fn with_method(mut self, method: impl Into<Method>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_uri(mut self, uri: Uri) -> Self {
        self.uri = uri;
        self
    }

    /// Append a query value to the URI.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.uri = self.uri.with_query_param(name, value);
        self
    }

    /// Append a header value.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Replace every value of a header.
    pub fn replace_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn remove_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    /// Append every header of `headers`.
    pub fn with_headers(mut self, headers: &Headers) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a form body and mark it URL-encoded.
    pub fn with_form(self, form: Form) -> Self {
        self.replace_header(names::CONTENT_TYPE, values::FORM)
            .with_body(Body::Form(form))
    }

    /// Buffer a stream body into text so it can be read repeatedly.
    pub async fn buffered(self) -> Result<Self, BodyError> {
        let Request { method, uri, headers, body } = self;
        Ok(Request {
            method,
            uri,
            headers,
            body: body.buffered().await?,
        })
    }

    pub async fn into_text(self) -> Result<String, BodyError> {
        self.body.into_text().await
    }

    pub async fn into_bytes(self) -> Result<bytes::Bytes, BodyError> {
        self.body.into_bytes().await
    }

    /// Take the body as a chunk stream, dropping the rest of the request.
    pub fn into_body_stream(self) -> BodyStream {
        self.body.into_stream()
    }

    pub fn into_body(self) -> Body {
        self.body
    }

    /// Split into head and body; the inverse of [`Request::from_parts`].
    pub fn into_parts(self) -> (Method, Uri, Headers, Body) {
        (self.method, self.uri, self.headers, self.body)
    }

    pub fn from_parts(method: Method, uri: Uri, headers: Headers, body: Body) -> Self {
        Self { method, uri, headers, body }
    }
}

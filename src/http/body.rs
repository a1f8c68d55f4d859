//! Message bodies.
//!
//! # Design Decisions
//! - A body holds exactly one representation at a time
//! - `Stream` is single-consumption; ownership moves with the message, so two
//!   components can never read it concurrently
//! - `Text` and `Form` are re-readable any number of times

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, Stream, StreamExt};

use crate::error::BodyError;
use crate::http::form::Form;

type BoxedChunks = Pin<Box<dyn Stream<Item = Result<Bytes, BodyError>> + Send + 'static>>;

/// A finite, lazily read sequence of octet chunks.
pub struct BodyStream {
    inner: BoxedChunks,
}

impl BodyStream {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, BodyError>> + Send + 'static,
    {
        Self { inner: Box::pin(stream) }
    }

    /// Wrap a stream whose errors are plain I/O errors.
    pub fn from_io<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<std::io::Error>,
    {
        Self::new(stream.map(|chunk| chunk.map_err(|e| BodyError::Io(e.into()))))
    }

    /// A stream that yields `bytes` as a single chunk.
    pub fn once(bytes: impl Into<Bytes>) -> Self {
        Self::new(stream::once(futures_util::future::ready(Ok(bytes.into()))))
    }

    pub fn empty() -> Self {
        Self::new(stream::empty())
    }

    /// Drain the stream into one buffer.
    pub async fn collect(mut self) -> Result<Bytes, BodyError> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

impl Stream for BodyStream {
    type Item = Result<Bytes, BodyError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BodyStream")
    }
}

/// The body of a request or response.
#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    Text(String),
    Stream(BodyStream),
    Form(Form),
}

impl Body {
    /// Whether reading the body leaves it readable again.
    pub fn is_restartable(&self) -> bool {
        !matches!(self, Body::Stream(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Text(text) => text.is_empty(),
            Body::Form(form) => form.is_empty(),
            Body::Stream(_) => false,
        }
    }

    /// The body as text, for re-readable representations only.
    ///
    /// A form reads as its URL-encoded serialisation.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Body::Empty => Some(String::new()),
            Body::Text(text) => Some(text.clone()),
            Body::Form(form) => Some(form.to_urlencoded()),
            Body::Stream(_) => None,
        }
    }

    pub fn as_form(&self) -> Option<&Form> {
        match self {
            Body::Form(form) => Some(form),
            _ => None,
        }
    }

    /// Octet length when known without reading.
    pub fn known_length(&self) -> Option<u64> {
        match self {
            Body::Empty => Some(0),
            Body::Text(text) => Some(text.len() as u64),
            Body::Form(form) => Some(form.to_urlencoded().len() as u64),
            Body::Stream(_) => None,
        }
    }

    /// Read the whole body, consuming a stream.
    pub async fn into_bytes(self) -> Result<Bytes, BodyError> {
        match self {
            Body::Empty => Ok(Bytes::new()),
            Body::Text(text) => Ok(Bytes::from(text)),
            Body::Form(form) => Ok(Bytes::from(form.to_urlencoded())),
            Body::Stream(stream) => stream.collect().await,
        }
    }

    /// Read the whole body as UTF-8 text, consuming a stream.
    pub async fn into_text(self) -> Result<String, BodyError> {
        match self {
            Body::Text(text) => Ok(text),
            other => {
                let bytes = other.into_bytes().await?;
                String::from_utf8(bytes.to_vec())
                    .map_err(|_| BodyError::Decode("body is not valid UTF-8".into()))
            }
        }
    }

    /// Replace a stream with its buffered text; other bodies are returned as-is.
    pub async fn buffered(self) -> Result<Body, BodyError> {
        match self {
            Body::Stream(stream) => {
                let bytes = stream.collect().await?;
                let text = String::from_utf8(bytes.to_vec())
                    .map_err(|_| BodyError::Decode("body is not valid UTF-8".into()))?;
                Ok(Body::Text(text))
            }
            other => Ok(other),
        }
    }

    /// View any body as a chunk stream.
    pub fn into_stream(self) -> BodyStream {
        match self {
            Body::Empty => BodyStream::empty(),
            Body::Text(text) => BodyStream::once(text),
            Body::Form(form) => BodyStream::once(form.to_urlencoded()),
            Body::Stream(stream) => stream,
        }
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<BodyStream> for Body {
    fn from(stream: BodyStream) -> Self {
        Body::Stream(stream)
    }
}

impl From<Form> for Body {
    fn from(form: Form) -> Self {
        Body::Form(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunked(parts: &[&'static str]) -> BodyStream {
        BodyStream::new(stream::iter(
            parts.iter().map(|p| Ok(Bytes::from_static(p.as_bytes()))).collect::<Vec<_>>(),
        ))
    }

    #[tokio::test]
    async fn test_stream_buffers_to_text() {
        let body = Body::Stream(chunked(&["some ", "body"]));
        assert!(!body.is_restartable());
        assert_eq!(body.as_string(), None);

        let body = body.buffered().await.unwrap();
        assert!(body.is_restartable());
        assert_eq!(body.as_string().as_deref(), Some("some body"));
        assert_eq!(body.as_string().as_deref(), Some("some body"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_a_decode_error() {
        let body = Body::Stream(BodyStream::once(vec![0xff, 0xfe]));
        assert!(matches!(body.into_text().await, Err(BodyError::Decode(_))));
    }

    #[tokio::test]
    async fn test_stream_error_propagates() {
        let failing = BodyStream::new(stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(BodyError::Io(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"))),
        ]));
        assert!(matches!(failing.collect().await, Err(BodyError::Io(_))));
    }

    #[tokio::test]
    async fn test_form_reads_as_urlencoded() {
        let body = Body::Form(Form::new().with("a", "1 2"));
        assert_eq!(body.known_length(), Some(5));
        assert_eq!(body.into_text().await.unwrap(), "a=1+2");
    }
}

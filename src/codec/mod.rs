//! Body codec.
//!
//! # Data Flow
//! ```text
//! Incoming (headers + buffered octets or octet stream):
//!     → Content-Encoding: gzip ? gzip.rs gunzip (lazy)
//!     → Content-Type: form ? buffer fully → Form
//!     → otherwise: Stream (or Text when the host already buffered it)
//!
//! Outgoing (Response):
//!     → framing.rs: exact length for whole bodies, chunked for unknown streams
//! ```
//!
//! # Design Decisions
//! - Shared by the server adapter and by filters; neither re-implements it
//! - After decoding, `Content-Encoding` and the stale `Content-Length` are
//!   removed so headers describe the representation actually held
//! - Decode failures are `BodyError::Decode` and are never retried

pub mod framing;
pub mod gzip;

use bytes::Bytes;
use futures_util::future;
use futures_util::stream::{self, StreamExt};

use crate::error::BodyError;
use crate::http::headers::{names, values};
use crate::http::{Body, BodyStream, Form, Headers, Request};

pub use framing::{frame_response, FramedResponse, OutgoingBody, TransferFraming};

/// Body octets as delivered by the host engine.
#[derive(Debug)]
pub enum IncomingBody {
    Buffered(Bytes),
    Streaming(BodyStream),
}

/// Whether a `Content-Type` value denotes URL-encoded form data.
pub fn is_form(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(values::FORM))
}

/// Turn incoming octets into the canonical body representation.
pub async fn decode_incoming(
    mut headers: Headers,
    incoming: IncomingBody,
) -> Result<(Headers, Body), BodyError> {
    let gzipped = headers
        .get(names::CONTENT_ENCODING)
        .is_some_and(|v| gzip::is_gzip(&v));
    let form = headers.get(names::CONTENT_TYPE).is_some_and(|v| is_form(&v));

    let incoming = if gzipped {
        let stream = match incoming {
            IncomingBody::Buffered(bytes) => BodyStream::once(bytes),
            IncomingBody::Streaming(stream) => stream,
        };
        headers.remove(names::CONTENT_ENCODING);
        headers.remove(names::CONTENT_LENGTH);
        checked_gunzip(stream).await?
    } else {
        incoming
    };

    let body = match incoming {
        IncomingBody::Buffered(bytes) if form => Body::Form(Form::parse(&bytes)),
        IncomingBody::Streaming(stream) if form => Body::Form(Form::parse(&stream.collect().await?)),
        IncomingBody::Buffered(bytes) if bytes.is_empty() => Body::Empty,
        IncomingBody::Buffered(bytes) => match String::from_utf8(bytes.to_vec()) {
            Ok(text) => Body::Text(text),
            Err(_) => Body::Stream(BodyStream::once(bytes)),
        },
        IncomingBody::Streaming(stream) => Body::Stream(stream),
    };

    Ok((headers, body))
}

/// Gunzip lazily, but only after the header and first block decoded cleanly.
///
/// A corrupt body fails here, before any handler can start a response.
async fn checked_gunzip(stream: BodyStream) -> Result<IncomingBody, BodyError> {
    let mut decoded = gzip::gunzip(stream);
    match decoded.next().await {
        Some(Ok(first)) => Ok(IncomingBody::Streaming(BodyStream::new(
            stream::once(future::ready(Ok(first))).chain(decoded),
        ))),
        Some(Err(e)) => Err(e),
        None => Ok(IncomingBody::Buffered(Bytes::new())),
    }
}

/// Run [`decode_incoming`] over a request that may still carry an encoded body.
pub async fn decode_request(request: Request) -> Result<Request, BodyError> {
    let (method, uri, headers, body) = request.into_parts();
    let incoming = match body {
        Body::Form(form) => return Ok(Request::from_parts(method, uri, headers, Body::Form(form))),
        Body::Empty => IncomingBody::Buffered(Bytes::new()),
        Body::Text(text) => IncomingBody::Buffered(Bytes::from(text)),
        Body::Stream(stream) => IncomingBody::Streaming(stream),
    };
    let (headers, body) = decode_incoming(headers, incoming).await?;
    Ok(Request::from_parts(method, uri, headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gzipped(text: &str) -> Vec<u8> {
        use flate2::write::GzEncoder;
        use std::io::Write;
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        pairs.iter().copied().collect()
    }

    #[tokio::test]
    async fn test_gzip_body_is_decompressed() {
        let raw = gzipped("ungzipped response");
        let (headers, body) = decode_incoming(
            headers(&[("Content-Encoding", "gzip"), ("Content-Length", "38")]),
            IncomingBody::Streaming(BodyStream::once(raw)),
        )
        .await
        .unwrap();

        assert!(!headers.contains("content-encoding"));
        assert!(!headers.contains("content-length"));
        assert_eq!(body.into_text().await.unwrap(), "ungzipped response");
    }

    #[tokio::test]
    async fn test_gzipped_form_is_decoded_then_parsed() {
        let raw = gzipped("name=a&name=b&name=c");
        let (_, body) = decode_incoming(
            headers(&[
                ("content-encoding", "gzip"),
                ("content-type", "application/x-www-form-urlencoded; charset=utf-8"),
            ]),
            IncomingBody::Buffered(Bytes::from(raw)),
        )
        .await
        .unwrap();

        let form = body.as_form().unwrap();
        assert_eq!(form.get("name").unwrap().values(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_corrupt_gzip_form_is_decode_error() {
        let result = decode_incoming(
            headers(&[("content-encoding", "gzip"), ("content-type", values::FORM)]),
            IncomingBody::Buffered(Bytes::from_static(b"not gzip")),
        )
        .await;
        assert!(matches!(result, Err(BodyError::Decode(_))));
    }

    #[tokio::test]
    async fn test_corrupt_gzip_stream_fails_before_handler() {
        let result = decode_incoming(
            headers(&[("content-encoding", "gzip")]),
            IncomingBody::Streaming(BodyStream::once("not gzip at all")),
        )
        .await;
        assert!(matches!(result, Err(BodyError::Decode(_))));
    }

    #[tokio::test]
    async fn test_large_gzip_stream_stays_lazy() {
        let text = "abcdefghij".repeat(50_000);
        let raw = gzipped(&text);
        let (_, body) = decode_incoming(
            headers(&[("content-encoding", "gzip")]),
            IncomingBody::Streaming(BodyStream::once(raw)),
        )
        .await
        .unwrap();

        assert!(matches!(body, Body::Stream(_)));
        assert_eq!(body.into_text().await.unwrap(), text);
    }

    #[tokio::test]
    async fn test_plain_stream_stays_lazy() {
        let (_, body) = decode_incoming(Headers::new(), IncomingBody::Streaming(BodyStream::once("raw")))
            .await
            .unwrap();
        assert!(matches!(body, Body::Stream(_)));

        let (_, body) = decode_incoming(Headers::new(), IncomingBody::Buffered(Bytes::from_static(b"raw")))
            .await
            .unwrap();
        assert_eq!(body.as_string().as_deref(), Some("raw"));
    }

    #[tokio::test]
    async fn test_decode_request_unwraps_in_memory_gzip() {
        let request = Request::of("POST", "/gzip")
            .unwrap()
            .with_header("Content-Encoding", "gzip")
            .with_body(BodyStream::once(gzipped("hello")));
        let request = decode_request(request).await.unwrap();
        assert!(request.header("content-encoding").is_none());
        assert_eq!(request.into_text().await.unwrap(), "hello");
    }
}

//! Outgoing transfer framing.
//!
//! # Design Decisions
//! - Re-readable bodies are sent whole with an exact `Content-Length`
//! - A stream keeps a `Content-Length` it already carries; otherwise it is
//!   announced as chunked and written progressively, never buffered first

use bytes::Bytes;

use crate::http::headers::{names, values};
use crate::http::{Body, BodyStream, Headers, Response};

/// Body handed back to the host engine.
#[derive(Debug)]
pub enum OutgoingBody {
    /// A complete buffer.
    Full(Bytes),
    /// A stream to write progressively; `None` length means chunked framing.
    Stream {
        stream: BodyStream,
        content_length: Option<u64>,
    },
}

/// How the body will be delimited on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferFraming {
    Length(u64),
    Chunked,
}

/// A response ready for the host engine to write.
#[derive(Debug)]
pub struct FramedResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: OutgoingBody,
}

impl FramedResponse {
    pub fn framing(&self) -> TransferFraming {
        match &self.body {
            OutgoingBody::Full(bytes) => TransferFraming::Length(bytes.len() as u64),
            OutgoingBody::Stream { content_length: Some(len), .. } => TransferFraming::Length(*len),
            OutgoingBody::Stream { content_length: None, .. } => TransferFraming::Chunked,
        }
    }

    /// An empty-bodied response with just a status.
    pub fn empty(status: u16) -> Self {
        frame_response(Response::new(status))
    }
}

/// Decide framing for a response and align its headers with the decision.
pub fn frame_response(response: Response) -> FramedResponse {
    let (status, mut headers, body) = response.into_parts();

    let body = match body {
        Body::Stream(stream) => {
            let declared = headers
                .get(names::CONTENT_LENGTH)
                .and_then(|v| v.trim().parse::<u64>().ok());
            match declared {
                Some(len) if !headers.contains(names::TRANSFER_ENCODING) => OutgoingBody::Stream {
                    stream,
                    content_length: Some(len),
                },
                _ => {
                    headers.remove(names::CONTENT_LENGTH);
                    headers.set(names::TRANSFER_ENCODING, values::CHUNKED);
                    OutgoingBody::Stream {
                        stream,
                        content_length: None,
                    }
                }
            }
        }
        Body::Empty => OutgoingBody::Full(Bytes::new()),
        Body::Text(text) => OutgoingBody::Full(Bytes::from(text)),
        Body::Form(form) => OutgoingBody::Full(Bytes::from(form.to_urlencoded())),
    };

    if let OutgoingBody::Full(bytes) = &body {
        headers.remove(names::TRANSFER_ENCODING);
        headers.set(names::CONTENT_LENGTH, bytes.len().to_string());
    }

    FramedResponse { status, headers, body }
}

//! Streaming gzip transforms over `BodyStream`.
//!
//! Both directions feed chunks through flate2's write-side codecs and emit
//! whatever output is ready, so neither side buffers a whole body.

use std::io::Write;

use bytes::Bytes;
use flate2::write::{GzDecoder, GzEncoder};
use flate2::Compression;
use futures_util::stream::{self, StreamExt};

use crate::error::BodyError;
use crate::http::BodyStream;

struct Transform<W> {
    source: BodyStream,
    codec: Option<W>,
}

/// Lazily decompress a gzip-encoded stream.
///
/// Corrupt or truncated input surfaces as `BodyError::Decode` from the
/// returned stream, after which it ends.
pub fn gunzip(source: BodyStream) -> BodyStream {
    let state = Transform {
        source,
        codec: Some(GzDecoder::new(Vec::new())),
    };
    BodyStream::new(stream::unfold(state, |mut state| async move {
        loop {
            let decoder = state.codec.as_mut()?;
            match state.source.next().await {
                Some(Ok(chunk)) => {
                    if let Err(e) = decoder.write_all(&chunk) {
                        state.codec = None;
                        return Some((Err(decode_error(e)), state));
                    }
                    let out = std::mem::take(decoder.get_mut());
                    if !out.is_empty() {
                        return Some((Ok(Bytes::from(out)), state));
                    }
                }
                Some(Err(e)) => {
                    state.codec = None;
                    return Some((Err(e), state));
                }
                None => {
                    let mut decoder = state.codec.take()?;
                    return match decoder.try_finish() {
                        Ok(()) => {
                            let out = std::mem::take(decoder.get_mut());
                            (!out.is_empty()).then(|| (Ok(Bytes::from(out)), state))
                        }
                        Err(e) => Some((Err(decode_error(e)), state)),
                    };
                }
            }
        }
    }))
}

/// Lazily gzip-compress a stream.
pub fn gzip(source: BodyStream) -> BodyStream {
    let state = Transform {
        source,
        codec: Some(GzEncoder::new(Vec::new(), Compression::default())),
    };
    BodyStream::new(stream::unfold(state, |mut state| async move {
        loop {
            let encoder = state.codec.as_mut()?;
            match state.source.next().await {
                Some(Ok(chunk)) => {
                    if let Err(e) = encoder.write_all(&chunk) {
                        state.codec = None;
                        return Some((Err(BodyError::Io(e)), state));
                    }
                    let out = std::mem::take(encoder.get_mut());
                    if !out.is_empty() {
                        return Some((Ok(Bytes::from(out)), state));
                    }
                }
                Some(Err(e)) => {
                    state.codec = None;
                    return Some((Err(e), state));
                }
                None => {
                    let encoder = state.codec.take()?;
                    return match encoder.finish() {
                        Ok(out) => (!out.is_empty()).then(|| (Ok(Bytes::from(out)), state)),
                        Err(e) => Some((Err(BodyError::Io(e)), state)),
                    };
                }
            }
        }
    }))
}

/// Whether an `Accept-Encoding` value admits gzip.
pub fn accepts_gzip(accept_encoding: &str) -> bool {
    accept_encoding.split(',').any(|item| {
        let mut parts = item.split(';').map(str::trim);
        let coding = parts.next().unwrap_or_default();
        if !(coding.eq_ignore_ascii_case("gzip") || coding.eq_ignore_ascii_case("x-gzip") || coding == "*") {
            return false;
        }
        // q=0 explicitly refuses the coding
        !parts.any(|p| {
            p.strip_prefix("q=")
                .and_then(|q| q.trim().parse::<f32>().ok())
                .is_some_and(|q| q == 0.0)
        })
    })
}

/// Whether a `Content-Encoding` value names gzip.
pub fn is_gzip(content_encoding: &str) -> bool {
    let coding = content_encoding.trim();
    coding.eq_ignore_ascii_case("gzip") || coding.eq_ignore_ascii_case("x-gzip")
}

fn decode_error(e: std::io::Error) -> BodyError {
    BodyError::Decode(format!("invalid gzip data: {}", e))
}

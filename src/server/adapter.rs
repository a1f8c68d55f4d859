//! Server adapter: the single entry point a host engine calls per request.
//!
//! # Responsibilities
//! - Build a canonical `Request` from host input (URI, headers, body codec)
//! - Invoke the composed router + filter handler
//! - Frame the `Response` for the host to write
//! - Convert every failure into a well-formed response
//!
//! # Design Decisions
//! - Never returns an error: malformed URI → 400, body decode or handler
//!   failure → 500, no route → 404 (from the router)
//! - Handler panics are caught here so the listener keeps serving
//! - Failure detail goes to the log, never to the wire
//! - Request ID taken from `x-request-id` or generated, and carried on the span

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures_util::{FutureExt, TryStreamExt};
use tracing::Instrument;
use uuid::Uuid;

use crate::codec::{self, FramedResponse, IncomingBody, OutgoingBody};
use crate::error::HandlerError;
use crate::handler::Handler;
use crate::http::headers::names;
use crate::http::{BodyStream, Headers, Method, Request, Response, Uri};

/// A parsed request as delivered by the host engine.
#[derive(Debug)]
pub struct HostRequest {
    pub method: String,
    /// Absolute URL: scheme, host, port, path and query.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: IncomingBody,
}

#[derive(Debug, Clone)]
pub struct ServerAdapter {
    handler: Handler,
}

impl ServerAdapter {
    pub fn new(handler: Handler) -> Self {
        Self { handler }
    }

    pub async fn handle(&self, request: HostRequest) -> FramedResponse {
        let request_id = request
            .headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(names::X_REQUEST_ID))
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %request.method,
            url = %request.url,
        );
        self.handle_inner(request).instrument(span).await
    }

    async fn handle_inner(&self, request: HostRequest) -> FramedResponse {
        let HostRequest { method, url, headers, body } = request;

        let uri = match Uri::parse(&url) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!(error = %e, "Rejecting request with malformed URI");
                return FramedResponse::empty(400);
            }
        };

        let headers: Headers = headers.into_iter().collect();
        let (headers, body) = match codec::decode_incoming(headers, body).await {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::error!(error = %e, "Failed to decode request body");
                return FramedResponse::empty(500);
            }
        };

        let request = Request::from_parts(Method::from(method.as_str()), uri, headers, body);
        let handler = self.handler.clone();
        let outcome = AssertUnwindSafe(async move { handler.call(request).await })
            .catch_unwind()
            .await;

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Handler failed");
                Response::internal_error()
            }
            Err(panic) => {
                let e = HandlerError::Panicked(panic_message(panic.as_ref()));
                tracing::error!(error = %e, "Handler panicked");
                Response::internal_error()
            }
        };

        tracing::debug!(status = response.status(), "Response produced");

        let mut framed = codec::frame_response(response);
        framed.body = match framed.body {
            OutgoingBody::Stream { stream, content_length } => OutgoingBody::Stream {
                stream: log_stream_failures(stream),
                content_length,
            },
            full => full,
        };
        framed
    }
}

/// Failures while the host writes a stream are logged; the response is abandoned.
fn log_stream_failures(stream: BodyStream) -> BodyStream {
    let span = tracing::Span::current();
    BodyStream::new(stream.inspect_err(move |e| {
        let _entered = span.enter();
        tracing::warn!(error = %e, "Response stream aborted");
    }))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TransferFraming;
    use crate::filter::GzipFilter;
    use crate::routing::Routing;
    use bytes::Bytes;

    fn adapter() -> ServerAdapter {
        let routing = Routing::new()
            .get("/url", |req: Request| async move { Ok(Response::of(200, req.uri().to_string())) })
            .post("/post-body", |req: Request| async move {
                Ok(Response::of(200, req.into_text().await?))
            })
            .post("/post-form-body", |req: Request| async move {
                let json = serde_json::to_string(&req.body_form().cloned().unwrap_or_default())?;
                Ok(Response::of(200, json))
            })
            .post("/big-body", |req: Request| async move {
                Ok(Response::ok().with_body(req.into_body_stream()))
            })
            .get("/panic", exploding)
            .get("/fail", |_req| async { Err(HandlerError::failed("no database")) })
            .with_filter(GzipFilter::new());
        ServerAdapter::new(routing.into_handler())
    }

    async fn exploding(_req: Request) -> crate::handler::HandlerResult {
        panic!("handler exploded")
    }

    fn host_request(method: &str, url: &str, headers: &[(&str, &str)], body: &'static [u8]) -> HostRequest {
        HostRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.iter().map(|(n, v)| (n.to_string(), v.to_string())).collect(),
            body: IncomingBody::Streaming(BodyStream::once(Bytes::from_static(body))),
        }
    }

    async fn full_body(framed: FramedResponse) -> Bytes {
        match framed.body {
            OutgoingBody::Full(bytes) => bytes,
            OutgoingBody::Stream { stream, .. } => stream.collect().await.unwrap(),
        }
    }

    #[tokio::test]
    async fn test_invalid_host_yields_path_only() {
        let framed = adapter()
            .handle(host_request("GET", "http://$£ * (/url", &[], b""))
            .await;
        assert_eq!(framed.status, 200);
        assert_eq!(full_body(framed).await.as_ref(), b"/url");
    }

    #[tokio::test]
    async fn test_malformed_uri_is_400() {
        let framed = adapter().handle(host_request("GET", "", &[], b"")).await;
        assert_eq!(framed.status, 400);
        assert!(full_body(framed).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_route_is_empty_404() {
        let framed = adapter()
            .handle(host_request("GET", "http://localhost/nothing", &[], b""))
            .await;
        assert_eq!(framed.status, 404);
        assert!(full_body(framed).await.is_empty());
    }

    #[tokio::test]
    async fn test_handler_failures_become_500() {
        let adapter = adapter();
        let framed = adapter.handle(host_request("GET", "http://localhost/panic", &[], b"")).await;
        assert_eq!(framed.status, 500);

        let framed = adapter.handle(host_request("GET", "http://localhost/fail", &[], b"")).await;
        assert_eq!(framed.status, 500);
        assert!(full_body(framed).await.is_empty());

        // still serving after a panic
        let framed = adapter
            .handle(host_request("POST", "http://localhost/post-body", &[], b"my humps"))
            .await;
        assert_eq!(full_body(framed).await.as_ref(), b"my humps");
    }

    #[tokio::test]
    async fn test_corrupt_gzip_body_is_500() {
        let framed = adapter()
            .handle(host_request(
                "POST",
                "http://localhost/post-body",
                &[("Content-Encoding", "gzip")],
                b"not gzip at all",
            ))
            .await;
        assert_eq!(framed.status, 500);
    }

    #[tokio::test]
    async fn test_corrupt_gzip_to_passthrough_is_500() {
        let framed = adapter()
            .handle(host_request(
                "POST",
                "http://localhost/big-body",
                &[("Content-Encoding", "gzip")],
                b"not gzip at all",
            ))
            .await;
        assert_eq!(framed.status, 500);
        assert_eq!(framed.framing(), TransferFraming::Length(0));
        assert!(full_body(framed).await.is_empty());
    }

    #[tokio::test]
    async fn test_form_body_accumulates_repeated_names() {
        let framed = adapter()
            .handle(host_request(
                "POST",
                "http://localhost/post-form-body",
                &[("content-type", "application/x-www-form-urlencoded")],
                b"name=tom+shacham&name=bosh&name=losh",
            ))
            .await;
        assert_eq!(
            full_body(framed).await.as_ref(),
            br#"{"name":["tom shacham","bosh","losh"]}"#
        );
    }

    #[tokio::test]
    async fn test_passthrough_stream_is_chunked() {
        let framed = adapter()
            .handle(host_request("POST", "http://localhost/big-body", &[], b"some body"))
            .await;
        assert_eq!(framed.framing(), TransferFraming::Chunked);
        assert_eq!(framed.headers.get("transfer-encoding").as_deref(), Some("chunked"));
        assert_eq!(full_body(framed).await.as_ref(), b"some body");
    }

    #[test]
    fn test_panic_message_extraction() {
        let boxed: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(boxed.as_ref()), "static message");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(boxed.as_ref()), "owned message");
    }
}

//! Gzip filter.
//!
//! # Responsibilities
//! - Gunzip a request body still marked `Content-Encoding: gzip`
//! - Gzip the response body when the client accepts it (or always, if configured)
//!
//! # Design Decisions
//! - Compression is streamed; the compressed length is unknown, so any
//!   `Content-Length` is dropped and framing falls back to chunked
//! - Responses already carrying a `Content-Encoding`, empty bodies and
//!   bodiless statuses are left untouched

use crate::codec::{self, gzip};
use crate::filter::Filter;
use crate::handler::Handler;
use crate::http::headers::{names, values};
use crate::http::{Body, Request, Response};

#[derive(Debug, Clone, Copy, Default)]
pub struct GzipFilter {
    always: bool,
}

impl GzipFilter {
    /// Compress when the request's `Accept-Encoding` admits gzip.
    pub fn new() -> Self {
        Self { always: false }
    }

    /// Compress every eligible response regardless of `Accept-Encoding`.
    pub fn always() -> Self {
        Self { always: true }
    }
}

impl Filter for GzipFilter {
    fn wrap(&self, next: Handler) -> Handler {
        let always = self.always;
        Handler::new(move |request: Request| {
            let next = next.clone();
            async move {
                let accepted = always
                    || request
                        .header(names::ACCEPT_ENCODING)
                        .is_some_and(|v| gzip::accepts_gzip(&v));

                let gzipped_request = request
                    .header(names::CONTENT_ENCODING)
                    .is_some_and(|v| gzip::is_gzip(&v));
                let request = if gzipped_request {
                    codec::decode_request(request).await?
                } else {
                    request
                };

                let response = next.call(request).await?;
                Ok(if accepted { compress(response) } else { response })
            }
        })
    }
}

fn compress(response: Response) -> Response {
    let bodiless = matches!(response.status(), 100..=199 | 204 | 304);
    if bodiless || response.headers().contains(names::CONTENT_ENCODING) || response.body().is_empty() {
        return response;
    }

    let (status, mut headers, body) = response.into_parts();
    headers.remove(names::CONTENT_LENGTH);
    headers.set(names::CONTENT_ENCODING, values::GZIP);
    headers.add("Vary", names::ACCEPT_ENCODING);

    Response::from_parts(status, headers, Body::Stream(gzip::gzip(body.into_stream())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::BodyStream;

    fn echo() -> Handler {
        Handler::new(|req: Request| async move {
            let body = req.into_text().await?;
            Ok(Response::of(200, body).with_header("Content-Length", "5"))
        })
    }

    #[tokio::test]
    async fn test_compresses_when_accepted() {
        let handler = GzipFilter::new().wrap(echo());
        let res = handler
            .call(
                Request::of("POST", "/")
                    .unwrap()
                    .with_header("Accept-Encoding", "gzip, br")
                    .with_body("hello"),
            )
            .await
            .unwrap();

        assert_eq!(res.header("content-encoding").as_deref(), Some("gzip"));
        assert!(!res.headers().contains("content-length"));

        let restored = gzip::gunzip(res.into_body_stream()).collect().await.unwrap();
        assert_eq!(restored.as_ref(), b"hello");
    }

    #[tokio::test]
    async fn test_leaves_response_alone_without_accept() {
        let handler = GzipFilter::new().wrap(echo());
        let res = handler
            .call(Request::of("POST", "/").unwrap().with_body("hello"))
            .await
            .unwrap();
        assert!(res.header("content-encoding").is_none());
        assert_eq!(res.body_string().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_gunzips_request_body() {
        let compressed = gzip::gzip(BodyStream::once("ungzipped response"))
            .collect()
            .await
            .unwrap();
        let handler = GzipFilter::new().wrap(echo());
        let res = handler
            .call(
                Request::of("POST", "/gzip")
                    .unwrap()
                    .with_header("Content-Encoding", "gzip")
                    .with_body(BodyStream::once(compressed)),
            )
            .await
            .unwrap();
        assert_eq!(res.body_string().as_deref(), Some("ungzipped response"));
    }

    #[tokio::test]
    async fn test_always_skips_empty_bodies() {
        let handler = GzipFilter::always().wrap(Handler::new(|_req| async { Ok(Response::new(204)) }));
        let res = handler.call(Request::of("GET", "/").unwrap()).await.unwrap();
        assert!(res.header("content-encoding").is_none());
    }
}

//! Axum/hyper host engine.
//!
//! # Responsibilities
//! - Bind a TCP listener and serve HTTP/1.1 (and h2c) via `axum::serve`
//! - Translate each axum request into a `HostRequest` and back
//! - Strip hop-by-hop headers before writing
//! - Graceful stop: stop accepting, let in-flight requests finish
//!
//! # Design Decisions
//! - One fallback handler; all routing happens in the adapter
//! - Request bodies are handed over as a lazy stream, never pre-buffered
//! - Request timeout is a host concern (tower-http `TimeoutLayer`); the
//!   routing layer imposes none

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use futures_util::TryStreamExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::codec::{FramedResponse, IncomingBody, OutgoingBody};
use crate::config::ListenerConfig;
use crate::error::ServerError;
use crate::http::BodyStream;
use crate::server::adapter::{HostRequest, ServerAdapter};
use crate::server::host::HttpHost;
use crate::server::shutdown::Shutdown;

const HOP_BY_HOP: [&str; 4] = ["connection", "keep-alive", "proxy-connection", "upgrade"];

/// Host engine backed by axum and hyper.
#[derive(Debug, Clone)]
pub struct AxumHost {
    bind_address: String,
    request_timeout: Option<Duration>,
}

impl AxumHost {
    pub fn new(bind_address: impl Into<String>) -> Self {
        Self {
            bind_address: bind_address.into(),
            request_timeout: None,
        }
    }

    pub fn from_config(config: &ListenerConfig) -> Self {
        Self {
            bind_address: config.bind_address.clone(),
            request_timeout: config.request_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    #[allow(deprecated)]
    fn build_router(&self, adapter: Arc<ServerAdapter>) -> Router {
        let router = Router::new().fallback(dispatch).with_state(adapter);
        let router = match self.request_timeout {
            Some(timeout) => router.layer(TimeoutLayer::new(timeout)),
            None => router,
        };
        router.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }
}

/// A live axum listener.
#[derive(Debug)]
pub struct AxumHandle {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<io::Result<()>>,
}

impl AxumHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl HttpHost for AxumHost {
    type Handle = AxumHandle;

    async fn start(&self, adapter: Arc<ServerAdapter>) -> Result<AxumHandle, ServerError> {
        let bind_error = |source| ServerError::Bind {
            addr: self.bind_address.clone(),
            source,
        };
        let listener = TcpListener::bind(&self.bind_address).await.map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        let app = self.build_router(adapter);
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(signal.wait())
                .await
        });

        tracing::info!(address = %local_addr, "HTTP host listening");
        Ok(AxumHandle {
            local_addr,
            shutdown,
            task,
        })
    }

    async fn stop(&self, handle: AxumHandle) -> Result<(), ServerError> {
        handle.shutdown.trigger();
        match handle.task.await {
            Ok(Ok(())) => {
                tracing::info!(address = %handle.local_addr, "HTTP host stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(ServerError::Serve(e)),
            Err(e) => Err(ServerError::Join(e.to_string())),
        }
    }
}

async fn dispatch(State(adapter): State<Arc<ServerAdapter>>, request: Request) -> Response {
    let host_request = into_host_request(request);
    into_axum_response(adapter.handle(host_request).await)
}

fn into_host_request(request: Request) -> HostRequest {
    let (parts, body) = request.into_parts();

    let url = if parts.uri.scheme().is_some() {
        parts.uri.to_string()
    } else {
        let target = parts.uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        match parts.headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
            Some(host) if is_authority(host) => format!("http://{}{}", host, target),
            Some(host) => {
                tracing::debug!(host = %host, "Ignoring unusable Host header");
                target.to_string()
            }
            None => target.to_string(),
        }
    };

    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let stream = body.into_data_stream().map_err(io::Error::other);

    HostRequest {
        method: parts.method.as_str().to_string(),
        url,
        headers,
        body: IncomingBody::Streaming(BodyStream::from_io(stream)),
    }
}

/// A Host value that can be spliced in front of an origin-form target
/// without changing the path or query.
fn is_authority(host: &str) -> bool {
    !host.is_empty()
        && !host
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '@' | '\\'))
}

fn into_axum_response(framed: FramedResponse) -> Response {
    let mut builder = axum::http::Response::builder().status(framed.status);
    for (name, value) in framed.headers.joined() {
        if HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h)) {
            continue;
        }
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
            (Ok(name), Ok(value)) => builder = builder.header(name, value),
            _ => tracing::warn!(header = %name, "Dropping header that cannot be written"),
        }
    }

    let body = match framed.body {
        OutgoingBody::Full(bytes) => Body::from(bytes),
        OutgoingBody::Stream { stream, .. } => Body::from_stream(stream),
    };

    builder.body(body).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build host response");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

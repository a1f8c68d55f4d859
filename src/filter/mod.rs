//! Filter chain.
//!
//! # Data Flow
//! ```text
//! filters [F1, F2] around handler H:
//!     F1.pre → F2.pre → H → F2.post → F1.post
//! ```
//!
//! # Design Decisions
//! - A filter is a pure `Handler → Handler` transformation, composed once at startup
//! - First declared filter is outermost
//! - Filters exchange owned Request/Response values, never a shared buffer
//! - No per-request mutable state inside a filter

pub mod compression;
pub mod headers;
pub mod logging;

use std::future::Future;
use std::sync::Arc;

use crate::handler::{Handler, HandlerResult};
use crate::http::Request;

pub use compression::GzipFilter;
pub use headers::{HeaderMode, SetRequestHeader, SetResponseHeader};
pub use logging::LoggingFilter;

/// Wraps a handler with pre/post behaviour.
pub trait Filter: Send + Sync + 'static {
    fn wrap(&self, next: Handler) -> Handler;
}

/// Apply `filters` around `handler`, first filter outermost.
pub fn compose(filters: &[Arc<dyn Filter>], handler: Handler) -> Handler {
    filters
        .iter()
        .rev()
        .fold(handler, |next, filter| filter.wrap(next))
}

/// A filter built from an async function receiving the request and the next handler.
pub struct FromFn<F> {
    f: Arc<F>,
}

/// Build a filter from `async fn(Request, Handler) -> HandlerResult`.
pub fn from_fn<F, Fut>(f: F) -> FromFn<F>
where
    F: Fn(Request, Handler) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    FromFn { f: Arc::new(f) }
}

impl<F, Fut> Filter for FromFn<F>
where
    F: Fn(Request, Handler) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn wrap(&self, next: Handler) -> Handler {
        let f = self.f.clone();
        Handler::new(move |request| f(request, next.clone()))
    }
}

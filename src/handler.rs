//! The handler signature shared by routes and filters.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::HandlerError;
use crate::http::{Request, Response};

pub type HandlerResult = Result<Response, HandlerError>;
pub type HandlerFuture = BoxFuture<'static, HandlerResult>;

/// An asynchronous function from `Request` to `Response`.
///
/// Cheap to clone; clones share the same function.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<dyn Fn(Request) -> HandlerFuture + Send + Sync>,
}

impl Handler {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |req| Box::pin(f(req))),
        }
    }

    pub fn call(&self, request: Request) -> HandlerFuture {
        (self.inner)(request)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler")
    }
}

//! Route declaration surface.

use std::future::Future;
use std::sync::Arc;

use crate::filter::{compose, Filter};
use crate::handler::{Handler, HandlerResult};
use crate::http::{Method, Request};
use crate::routing::router::{Route, Router};
use crate::server::{HttpHost, Server};

/// Start a routing table with a `GET` route.
pub fn get<F, Fut>(path: &str, handler: F) -> Routing
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Routing::new().get(path, handler)
}

/// Ordered routes, an optional catch-all and the filters wrapping them all.
#[derive(Clone, Default)]
pub struct Routing {
    routes: Vec<Route>,
    catch_all: Option<Route>,
    filters: Vec<Arc<dyn Filter>>,
}

macro_rules! verb {
    ($name:ident, $method:expr) => {
        pub fn $name<F, Fut>(self, path: &str, handler: F) -> Self
        where
            F: Fn(Request) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = HandlerResult> + Send + 'static,
        {
            self.route($method, path, handler)
        }
    };
}

impl Routing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a method and path pattern.
    pub fn route<F, Fut>(self, method: impl Into<Method>, path: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.with_route(Route::new(method.into(), path, Handler::new(handler)))
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    verb!(get, Method::Get);
    verb!(post, Method::Post);
    verb!(put, Method::Put);
    verb!(patch, Method::Patch);
    verb!(delete, Method::Delete);
    verb!(head, Method::Head);
    verb!(options, Method::Options);
    verb!(trace, Method::Trace);

    /// Handler for anything no route matches. A later call replaces an earlier one.
    pub fn catch_all<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.catch_all = Some(Route::catch_all(Handler::new(handler)));
        self
    }

    /// Append a filter; earlier filters wrap later ones.
    pub fn with_filter(mut self, filter: impl Filter) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn into_router(self) -> Router {
        Router::new(self.routes, self.catch_all)
    }

    /// Freeze the table and wrap it in the declared filters.
    pub fn into_handler(self) -> Handler {
        let filters = self.filters;
        let router = Arc::new(Router::new(self.routes, self.catch_all));
        let endpoint = Handler::new(move |request| {
            let router = router.clone();
            async move { router.serve(request).await }
        });
        compose(&filters, endpoint)
    }

    /// Serve one request in memory, without a host engine.
    pub async fn serve(&self, request: Request) -> HandlerResult {
        self.clone().into_handler().call(request).await
    }

    /// Bind the table to a host engine.
    pub fn as_server<H: HttpHost>(self, host: H) -> Server<H> {
        Server::new(self.into_handler(), host)
    }
}

//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes in declaration order
//! - Look up the route for a (method, path) pair
//! - Dispatch to the matched handler, or answer 404 with an empty body
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - O(n) scan; first declared match wins, no specificity reordering
//! - The router-wide catch-all is consulted only after every route
//! - Explicit `RouteNotFound` rather than a silent default

use std::fmt;

use crate::error::RouteNotFound;
use crate::handler::{Handler, HandlerResult};
use crate::http::{Method, Request, Response};
use crate::routing::matcher::{split_segments, PathPattern};

/// A declared (method, path pattern) → handler association.
#[derive(Clone)]
pub struct Route {
    method: Option<Method>,
    pattern: PathPattern,
    handler: Handler,
}

impl Route {
    pub fn new(method: Method, pattern: &str, handler: Handler) -> Self {
        Self {
            method: Some(method),
            pattern: PathPattern::parse(pattern),
            handler,
        }
    }

    /// A route for any method and any path.
    pub fn catch_all(handler: Handler) -> Self {
        Self {
            method: None,
            pattern: PathPattern::any(),
            handler,
        }
    }

    /// `None` means every method.
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    fn matches(&self, method: &Method, segments: &[&str]) -> bool {
        self.method.as_ref().map_or(true, |m| m == method) && self.pattern.matches(segments)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            Some(method) => write!(f, "Route({} {})", method, self.pattern),
            None => write!(f, "Route(* {})", self.pattern),
        }
    }
}

/// Ordered routing table.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
    catch_all: Option<Route>,
}

impl Router {
    pub fn new(routes: Vec<Route>, catch_all: Option<Route>) -> Self {
        tracing::debug!(
            routes = routes.len(),
            catch_all = catch_all.is_some(),
            "Routing table finalized"
        );
        Self { routes, catch_all }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// First declared route matching the method and path.
    pub fn resolve(&self, method: &Method, path: &str) -> Result<&Route, RouteNotFound> {
        let segments: Vec<&str> = split_segments(path).collect();
        self.routes
            .iter()
            .find(|route| route.matches(method, &segments))
            .or(self.catch_all.as_ref())
            .ok_or_else(|| RouteNotFound {
                method: method.clone(),
                path: path.to_string(),
            })
    }

    /// Resolve and invoke the matching handler.
    pub async fn serve(&self, request: Request) -> HandlerResult {
        match self.resolve(request.method(), request.uri().path()) {
            Ok(route) => {
                tracing::debug!(route = ?route, "Route matched");
                route.handler().call(request).await
            }
            Err(not_found) => {
                tracing::debug!(%not_found, "No route matched");
                Ok(Response::not_found())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answering(body: &'static str) -> Handler {
        Handler::new(move |_req| async move { Ok(Response::of(200, body)) })
    }

    fn table() -> Router {
        Router::new(
            vec![
                Route::new(Method::Get, "/", answering("root")),
                Route::new(Method::Get, "/files/*", answering("files")),
                Route::new(Method::Get, "/files/special", answering("special")),
                Route::new(Method::Post, "/files/special", answering("post special")),
            ],
            None,
        )
    }

    #[tokio::test]
    async fn test_first_declared_match_wins() {
        let router = table();
        let route = router.resolve(&Method::Get, "/files/special").unwrap();
        assert_eq!(route.pattern(), &PathPattern::parse("/files/*"));

        let route = router.resolve(&Method::Post, "/files/special").unwrap();
        assert_eq!(route.method(), Some(&Method::Post));
    }

    #[test]
    fn test_method_must_match() {
        let router = table();
        assert!(router.resolve(&Method::Delete, "/").is_err());
        assert!(router.resolve(&Method::Extension("get".into()), "/").is_err());
    }

    #[tokio::test]
    async fn test_not_found_is_empty_404() {
        let router = table();
        let err = router.resolve(&Method::Get, "/nope").unwrap_err();
        assert_eq!(err.path, "/nope");

        let response = router
            .serve(Request::of("GET", "/nope").unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
        assert_eq!(response.body_string().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_catch_all_consulted_last() {
        let router = Router::new(
            vec![Route::new(Method::Get, "/known", answering("known"))],
            Some(Route::catch_all(answering("fallback"))),
        );

        let known = router.serve(Request::of("GET", "/known").unwrap()).await.unwrap();
        assert_eq!(known.body_string().as_deref(), Some("known"));

        let other = router.serve(Request::of("PUT", "/x/y").unwrap()).await.unwrap();
        assert_eq!(other.body_string().as_deref(), Some("fallback"));
    }
}

//! Header rewriting filters.
//!
//! Modes follow tower-http's set-header layers: override every existing
//! value, append another value, or set only when the header is missing.

use crate::filter::Filter;
use crate::handler::Handler;
use crate::http::{Headers, Request};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    Override,
    Append,
    IfMissing,
}

impl HeaderMode {
    fn apply(self, headers: &mut Headers, name: &str, value: &str) {
        match self {
            HeaderMode::Override => headers.set(name, value),
            HeaderMode::Append => headers.add(name, value),
            HeaderMode::IfMissing => {
                if !headers.contains(name) {
                    headers.add(name, value);
                }
            }
        }
    }
}

/// Rewrites a header on every response.
#[derive(Debug, Clone)]
pub struct SetResponseHeader {
    name: String,
    value: String,
    mode: HeaderMode,
}

impl SetResponseHeader {
    pub fn overriding(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, HeaderMode::Override)
    }

    pub fn appending(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, HeaderMode::Append)
    }

    pub fn if_missing(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, HeaderMode::IfMissing)
    }

    fn new(name: impl Into<String>, value: impl Into<String>, mode: HeaderMode) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            mode,
        }
    }
}

impl Filter for SetResponseHeader {
    fn wrap(&self, next: Handler) -> Handler {
        let rule = self.clone();
        Handler::new(move |request| {
            let next = next.clone();
            let rule = rule.clone();
            async move {
                let (status, mut headers, body) = next.call(request).await?.into_parts();
                rule.mode.apply(&mut headers, &rule.name, &rule.value);
                Ok(crate::http::Response::from_parts(status, headers, body))
            }
        })
    }
}

/// Rewrites a header on every request before the handler sees it.
#[derive(Debug, Clone)]
pub struct SetRequestHeader {
    name: String,
    value: String,
    mode: HeaderMode,
}

impl SetRequestHeader {
    pub fn overriding(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, HeaderMode::Override)
    }

    pub fn appending(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, HeaderMode::Append)
    }

    pub fn if_missing(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, HeaderMode::IfMissing)
    }

    fn new(name: impl Into<String>, value: impl Into<String>, mode: HeaderMode) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            mode,
        }
    }
}

impl Filter for SetRequestHeader {
    fn wrap(&self, next: Handler) -> Handler {
        let rule = self.clone();
        Handler::new(move |request: Request| {
            let (method, uri, mut headers, body) = request.into_parts();
            rule.mode.apply(&mut headers, &rule.name, &rule.value);
            next.call(Request::from_parts(method, uri, headers, body))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;

    fn echo_header(name: &'static str) -> Handler {
        Handler::new(move |req: Request| async move {
            Ok(Response::ok()
                .with_header("x-server", "app")
                .with_header("echo", req.header(name).unwrap_or_default()))
        })
    }

    #[tokio::test]
    async fn test_response_header_modes() {
        let handler = SetResponseHeader::overriding("X-Server", "routekit").wrap(echo_header("a"));
        let res = handler.call(Request::of("GET", "/").unwrap()).await.unwrap();
        assert_eq!(res.header("x-server").as_deref(), Some("routekit"));

        let handler = SetResponseHeader::if_missing("x-server", "routekit").wrap(echo_header("a"));
        let res = handler.call(Request::of("GET", "/").unwrap()).await.unwrap();
        assert_eq!(res.header("x-server").as_deref(), Some("app"));

        let handler = SetResponseHeader::appending("x-server", "edge").wrap(echo_header("a"));
        let res = handler.call(Request::of("GET", "/").unwrap()).await.unwrap();
        assert_eq!(res.header("x-server").as_deref(), Some("app, edge"));
    }

    #[tokio::test]
    async fn test_request_header_rewrite() {
        let handler = SetRequestHeader::overriding("x-tenant", "blue").wrap(echo_header("x-tenant"));
        let res = handler
            .call(Request::of("GET", "/").unwrap().with_header("X-Tenant", "red"))
            .await
            .unwrap();
        assert_eq!(res.header("echo").as_deref(), Some("blue"));
    }
}

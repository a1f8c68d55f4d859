//! routekit: HTTP routing and message composition.
//!
//! # Architecture Overview
//!
//! ```text
//! host engine (axum)
//!     → ServerAdapter (HostRequest: method, absolute URL, headers, octets)
//!     → codec (gzip / form / text / stream)
//!     → filters (first declared is outermost)
//!     → Router (first matching route, else catch-all, else 404)
//!     ← Response → codec framing (Content-Length or chunked) → host engine
//! ```
//!
//! - `http`: Uri, Headers, Body, Form, Request, Response
//! - `codec`: incoming body interpretation, gzip, transfer framing
//! - `routing`: route table, matching, declaration surface
//! - `filter`: the Filter chain and built-in filters
//! - `server`: adapter contract, host engine trait, axum host, lifecycle
//! - `config` / `observability`: ambient setup for the binary and hosts

pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod handler;
pub mod http;
pub mod observability;
pub mod routing;
pub mod server;

pub use error::{BodyError, HandlerError, MalformedUriError, RouteNotFound, ServerError};
pub use filter::{from_fn, Filter};
pub use handler::{Handler, HandlerResult};
pub use http::{Body, BodyStream, Form, Headers, Method, Request, Response, Uri};
pub use routing::{get, Routing};
pub use server::{AxumHost, HttpHost, Server};

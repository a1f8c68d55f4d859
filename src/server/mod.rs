//! Server subsystem: the boundary between the routing core and a host engine.
//!
//! # Data Flow
//! ```text
//! host engine (axum_host.rs or any HttpHost)
//!     → adapter.rs HostRequest (method, absolute URL, headers, octets)
//!     → codec decode → composed filters + router → Response
//!     → codec framing → FramedResponse → host engine writes it
//!
//! Lifecycle (host.rs):
//!     Server::start → HttpHost::start → Running(handle)
//!     Server::stop  → HttpHost::stop(handle) → Stopped
//! ```
//!
//! # Design Decisions
//! - The core depends only on the adapter contract, never on host types
//! - Listener state is an explicit value owned by `Server`
//! - Shutdown is graceful: stop accepting, drain in-flight requests

pub mod adapter;
pub mod axum_host;
pub mod host;
pub mod shutdown;

pub use adapter::{HostRequest, ServerAdapter};
pub use axum_host::{AxumHandle, AxumHost};
pub use host::{HttpHost, Server};
pub use shutdown::{Shutdown, ShutdownSignal};

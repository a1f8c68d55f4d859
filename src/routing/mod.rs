//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Declaration (at startup):
//!     routing.rs builder: get/post/route/catch_all/with_filter
//!     → matcher.rs compiles path patterns
//!     → router.rs freezes an immutable Router
//!     → filters composed around the Router into one Handler
//!
//! Per request:
//!     (method, path) → router.rs lookup → Route or RouteNotFound (404)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (literal segments and prefix only)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order is priority)

pub mod matcher;
pub mod router;
pub mod routing;

pub use matcher::PathPattern;
pub use router::{Route, Router};
pub use routing::{get, Routing};

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! adapter.rs   → per-request span (request_id, method, path)
//! filter/      → LoggingFilter access events
//! axum_host.rs → tower_http TraceLayer events
//!     → logging.rs subscriber (stdout, plain or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through the request span
//! - `RUST_LOG` always wins over the configured filter

pub mod logging;

pub use logging::init_logging;

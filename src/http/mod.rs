//! HTTP message model.
//!
//! # Data Flow
//! ```text
//! host engine (method, URL, header multi-map, octets)
//!     → uri.rs / headers.rs (parse into owned values)
//!     → codec (decide body representation)
//!     → request.rs (immutable Request handed to filters and handlers)
//!     → response.rs (Response produced by the handler)
//!     → codec framing → host engine
//! ```
//!
//! # Design Decisions
//! - Messages are values; every `with_*` call consumes and returns
//! - Body is a tagged union {Empty, Text, Stream, Form}; exactly one at a time
//! - Method is a closed enum with an extension variant

pub mod body;
pub mod form;
pub mod headers;
pub mod method;
pub mod request;
pub mod response;
pub mod uri;

pub use body::{Body, BodyStream};
pub use form::{Form, FormValue};
pub use headers::Headers;
pub use method::Method;
pub use request::Request;
pub use response::Response;
pub use uri::Uri;

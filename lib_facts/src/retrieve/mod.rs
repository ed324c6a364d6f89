//! # Data Retrieval Module
//!
//! Everything between a typed request and the wire: the request value, the
//! executor that sends it, and the error taxonomy it classifies failures into.
//!
//! ## Contained Modules:
//!
//! - **`request`**: The immutable `Request` (endpoint plus ordered query parameters).
//! - **`executor`**: The `RequestExecutor` trait and its `reqwest` implementation.
//! - **`errors`**: `NetworkError` kinds and the `ErrorRecord` carried to callers.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

/// Classified network failures and the cross-layer error record.
pub mod errors;
/// Typed request execution on top of `reqwest`.
pub mod executor;
/// The immutable request value.
pub mod request;

pub use errors::{ErrorKind, ErrorRecord, NetworkError};
pub use executor::{shared_client, NetworkRequestExecutor, RequestExecutor};
pub use request::Request;

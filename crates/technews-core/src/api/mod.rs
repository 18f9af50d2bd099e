//! REST API layer for the TechNews backend.
//!
//! Requests are immutable `ApiRequest` values sent through a stack of
//! `Transport`s: `HttpTransport` at the bottom, `TracedTransport` for
//! logging, and `AuthPipeline` on top, which attaches the bearer token and
//! renews it once when the server answers 401.
//!
//! `ApiClient` provides typed methods for every endpoint on top of the
//! pipeline.

pub mod client;
pub mod error;
pub mod pipeline;
pub mod request;
pub mod transport;

pub use client::ApiClient;
pub use error::ApiError;
pub use pipeline::{AuthPipeline, SessionEvent, REFRESH_PATH};
pub use request::{ApiRequest, Body, FormPart, PartValue};
pub use transport::{ApiResponse, HttpTransport, TracedTransport, Transport};

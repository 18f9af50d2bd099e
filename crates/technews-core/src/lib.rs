//! Core library for the TechNews client.
//!
//! - `api`: request pipeline with bearer attachment and token renewal, plus
//!   typed service wrappers for every backend endpoint
//! - `auth`: token storage backends and the signed-in user session
//! - `models`: serde models for API resources
//! - `state`: list and selection state for posts, comments, subscriptions
//!   and payments
//! - `routes`: route table and navigation guard
//! - `config`: persisted settings with environment overrides

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

pub use api::{
    ApiClient, ApiError, ApiRequest, ApiResponse, AuthPipeline, HttpTransport, SessionEvent,
    TracedTransport, Transport,
};
pub use auth::{
    AuthSession, FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenKind, TokenStore,
};
pub use config::{Config, TokenBackend};
pub use state::{CommentsState, PaymentsState, PostsState, SubscriptionsState};

//! Authentication state and credential persistence.
//!
//! - `TokenStore`: the access/refresh token pair with per-token expiry,
//!   backed by memory, a session file, or the OS keyring
//! - `AuthSession`: the signed-in user and the login/logout flows

pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::KeyringTokenStore;
pub use session::AuthSession;
pub use store::{FileTokenStore, MemoryTokenStore, StoredToken, TokenKind, TokenStore};

//! Authenticated request pipeline.
//!
//! Wraps a `Transport` with bearer-token attachment and a single
//! renew-and-retry on HTTP 401. Renewal talks to the transport directly,
//! never back through the pipeline, so it cannot be intercepted itself.
//!
//! Concurrent 401s share one renewal: callers queue on the renewal gate and
//! whoever enters after a successful renewal picks up the token it stored
//! instead of issuing another refresh call.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::auth::{TokenKind, TokenStore};

use super::request::ApiRequest;
use super::transport::{ApiResponse, Transport};
use super::ApiError;

/// Token renewal endpoint
pub const REFRESH_PATH: &str = "/api/v1/auth/token/refresh/";

/// Each request may be re-sent at most once after a renewal.
const MAX_RETRIES: u32 = 1;

/// Default lifetime of a stored access token.
pub const DEFAULT_ACCESS_TTL_DAYS: i64 = 1;

/// Default lifetime of a stored refresh token.
pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Session changes the hosting application may react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new access token was obtained and stored.
    Renewed,
    /// The credential pair was rejected and has been cleared; the user
    /// must log in again.
    Invalidated,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    /// Present when the server rotates refresh tokens.
    #[serde(default)]
    refresh: Option<String>,
}

pub struct AuthPipeline<T> {
    transport: T,
    store: Arc<dyn TokenStore>,
    access_ttl: Duration,
    refresh_ttl: Duration,
    renewal_gate: Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
}

impl<T: Transport> AuthPipeline<T> {
    pub fn new(transport: T, store: Arc<dyn TokenStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            transport,
            store,
            access_ttl: Duration::days(DEFAULT_ACCESS_TTL_DAYS),
            refresh_ttl: Duration::days(DEFAULT_REFRESH_TTL_DAYS),
            renewal_gate: Mutex::new(()),
            events,
        }
    }

    pub fn with_token_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Receive session events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Send a request, attaching the stored access token and transparently
    /// renewing it once if the server answers 401.
    ///
    /// Non-success statuses are returned as the matching `ApiError`.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut token = self.stored(TokenKind::Access)?;
        let mut retries = 0;

        loop {
            let outgoing = request.authorized(token.as_deref())?;
            debug!(
                method = %request.method(),
                path = request.path(),
                authenticated = token.is_some(),
                retries,
                "Dispatching request"
            );

            let response = self.transport.execute(&outgoing).await?;

            if response.status() != StatusCode::UNAUTHORIZED || retries >= MAX_RETRIES {
                return response.error_for_status();
            }

            retries += 1;
            let rejection = ApiError::from_status(response.status(), &response.text());

            match self.renew(token.as_deref()).await {
                Some(renewed) => token = Some(renewed),
                None => return Err(rejection),
            }
        }
    }

    /// Obtain a fresh access token, or `None` if the session is gone.
    ///
    /// `stale` is the token the failed request was sent with.
    async fn renew(&self, stale: Option<&str>) -> Option<String> {
        let _gate = self.renewal_gate.lock().await;

        match self.store.get(TokenKind::Access) {
            Ok(Some(current)) if Some(current.as_str()) != stale => {
                debug!("Reusing access token renewed by a concurrent request");
                return Some(current);
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Failed to read access token before renewal"),
        }

        let refresh = match self.store.get(TokenKind::Refresh) {
            Ok(Some(refresh)) => refresh,
            Ok(None) => {
                info!("Access token rejected and no refresh token stored");
                self.invalidate();
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read refresh token");
                self.invalidate();
                return None;
            }
        };

        match self.exchange(&refresh).await {
            Ok(renewed) => {
                if let Err(e) = self.store.set(TokenKind::Access, &renewed.access, self.access_ttl) {
                    warn!(error = %e, "Failed to persist renewed access token");
                }
                if let Some(ref rotated) = renewed.refresh {
                    if let Err(e) = self.store.set(TokenKind::Refresh, rotated, self.refresh_ttl) {
                        warn!(error = %e, "Failed to persist rotated refresh token");
                    }
                }
                info!(rotated = renewed.refresh.is_some(), "Access token renewed");
                let _ = self.events.send(SessionEvent::Renewed);
                Some(renewed.access)
            }
            Err(e) => {
                warn!(error = %e, "Access token renewal failed");
                self.invalidate();
                None
            }
        }
    }

    async fn exchange(&self, refresh: &str) -> Result<RefreshResponse, ApiError> {
        let request = ApiRequest::post(REFRESH_PATH).json(&RefreshRequest { refresh })?;
        let response = self.transport.execute(&request).await?.error_for_status()?;
        response.json()
    }

    fn invalidate(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored tokens");
        }
        let _ = self.events.send(SessionEvent::Invalidated);
    }

    fn stored(&self, kind: TokenKind) -> Result<Option<String>, ApiError> {
        self.store.get(kind).map_err(ApiError::storage)
    }
}

#[async_trait]
impl<T: Transport> Transport for AuthPipeline<T> {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.send(request).await
    }
}

//! Signed-in user state.
//!
//! `AuthSession` owns the current user profile and the in-flight/error
//! flags a UI binds to, and drives the login, registration and logout
//! flows against the API. Tokens themselves live in the pipeline's
//! `TokenStore`; the session only writes them after login or registration
//! and clears them on logout.

use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, ProfileUpdate,
    RegisterRequest, UserProfile,
};

use super::TokenKind;

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const PROFILE_UPDATE_FAILED: &str = "Profile update failed";
const PASSWORD_CHANGE_FAILED: &str = "Password change failed";
const LOGGED_OUT: &str = "Logged out";

pub struct AuthSession {
    api: ApiClient,
    pub user: Option<UserProfile>,
    pub initialized: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthSession {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            user: None,
            initialized: false,
            loading: false,
            error: None,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Full name of the signed-in user, falling back to the username, or
    /// empty when signed out.
    pub fn full_name(&self) -> &str {
        self.user
            .as_ref()
            .map(UserProfile::display_name)
            .unwrap_or_default()
    }

    /// Restore the session from stored tokens.
    ///
    /// When an access token is present the profile is fetched; any failure
    /// there clears the session.
    pub async fn initialize(&mut self) {
        let has_token = match self.api.store().get(TokenKind::Access) {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored access token");
                false
            }
        };

        if has_token {
            if let Err(e) = self.fetch_profile().await {
                warn!(error = %e, "Failed to restore session");
                self.clear();
            }
        }
        self.initialized = true;
    }

    pub async fn login(&mut self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.begin();
        let result = self.try_login(credentials).await;
        self.loading = false;

        if let Err(ref e) = result {
            self.error = Some(e.user_message(LOGIN_FAILED));
        }
        result
    }

    async fn try_login(&mut self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let response = self.api.login(credentials).await?;
        let (access, refresh) = response.token_pair().ok_or_else(|| {
            ApiError::InvalidResponse("Login response did not include tokens".to_string())
        })?;
        self.store_tokens(access, refresh)?;
        info!(user = credentials.identifier(), "Logged in");

        self.fetch_profile().await?;
        Ok(response)
    }

    /// Register a new account. If the server issues tokens right away the
    /// user is signed in as well.
    pub async fn register(&mut self, user: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.begin();
        let result = self.try_register(user).await;
        self.loading = false;

        if let Err(ref e) = result {
            self.error = Some(e.user_message(REGISTRATION_FAILED));
        }
        result
    }

    async fn try_register(&mut self, user: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let response = self.api.register(user).await?;
        if let Some((access, refresh)) = response.token_pair() {
            self.store_tokens(access, refresh)?;
            self.fetch_profile().await?;
        } else {
            debug!("Registration returned no tokens");
        }
        Ok(response)
    }

    /// Log out on the server if possible. Local state is cleared whatever
    /// the server says.
    pub async fn logout(&mut self) -> MessageResponse {
        self.loading = true;
        let mut response = MessageResponse {
            msg: Some(LOGGED_OUT.to_string()),
        };

        match self.api.store().get(TokenKind::Refresh) {
            Ok(Some(refresh)) => match self.api.logout(&refresh).await {
                Ok(r) => response = r,
                Err(e) => warn!(error = %e, "Server logout failed"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read refresh token"),
        }

        self.clear();
        self.loading = false;
        info!("Logged out");
        response
    }

    pub async fn fetch_profile(&mut self) -> Result<UserProfile, ApiError> {
        let profile = self.api.profile().await?;
        self.user = Some(profile.clone());
        Ok(profile)
    }

    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.begin();
        let result = self.api.update_profile(update).await;
        self.loading = false;

        match result {
            Ok(profile) => {
                self.user = Some(profile.clone());
                Ok(profile)
            }
            Err(e) => {
                self.error = Some(e.user_message(PROFILE_UPDATE_FAILED));
                Err(e)
            }
        }
    }

    pub async fn change_password(
        &mut self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.begin();
        let result = self.api.change_password(request).await;
        self.loading = false;

        if let Err(ref e) = result {
            self.error = Some(e.user_message(PASSWORD_CHANGE_FAILED));
        }
        result
    }

    /// Forget the user and delete both stored tokens.
    pub fn clear(&mut self) {
        self.user = None;
        if let Err(e) = self.api.store().clear() {
            warn!(error = %e, "Failed to clear stored tokens");
        }
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn store_tokens(&self, access: &str, refresh: &str) -> Result<(), ApiError> {
        let pipeline = self.api.pipeline();
        let store = self.api.store();
        store
            .set(TokenKind::Access, access, pipeline.access_ttl())
            .map_err(ApiError::storage)?;
        store
            .set(TokenKind::Refresh, refresh, pipeline.refresh_ttl())
            .map_err(ApiError::storage)?;
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

/// Login credentials.
///
/// The account backend authenticates by email, but also accepts a username
/// in the same slot; whichever identifier is set is sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

impl LoginRequest {
    pub fn with_username(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            email: None,
            password: password.into(),
        }
    }

    pub fn with_email(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: None,
            email: Some(email.into()),
            password: password.into(),
        }
    }

    /// Sign in with whatever the user typed: anything containing `@` is
    /// sent as an email address, everything else as a username.
    pub fn from_identifier(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        let identifier = identifier.into();
        if identifier.contains('@') {
            Self::with_email(identifier, password)
        } else {
            Self::with_username(identifier, password)
        }
    }

    /// The identifier being used, for logging and remembering the last user.
    pub fn identifier(&self) -> &str {
        self.email
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Response of both login and registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl AuthResponse {
    /// Both tokens, when the server issued a full pair.
    pub fn token_pair(&self) -> Option<(&str, &str)> {
        match (self.access.as_deref(), self.refresh.as_deref()) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                Some((access, refresh))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub posts_count: i64,
    #[serde(default)]
    pub comments_count: i64,
    pub created: Option<String>,
    pub modified: Option<String>,
}

impl UserProfile {
    /// Full name when set, otherwise the username.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Profile fields a user may change. `None` fields are left untouched on
/// PATCH and omitted on PUT.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

/// Generic `{ "msg": ... }` acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub msg: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_serializes_only_set_identifier() {
        let body = serde_json::to_value(LoginRequest::with_username("alice", "p@ss")).unwrap();
        assert_eq!(body, serde_json::json!({"username": "alice", "password": "p@ss"}));

        let body = serde_json::to_value(LoginRequest::with_email("a@example.com", "p@ss")).unwrap();
        assert_eq!(body, serde_json::json!({"email": "a@example.com", "password": "p@ss"}));
    }

    #[test]
    fn test_identifier_with_at_sign_is_an_email() {
        let request = LoginRequest::from_identifier("alice@example.com", "p@ss");
        assert_eq!(request.email.as_deref(), Some("alice@example.com"));
        assert!(request.username.is_none());

        let request = LoginRequest::from_identifier("alice", "p@ss");
        assert_eq!(request.username.as_deref(), Some("alice"));
        assert!(request.email.is_none());
    }

    #[test]
    fn test_auth_response_token_pair() {
        let response: AuthResponse = serde_json::from_value(serde_json::json!({
            "user": {"id": 1, "username": "alice", "email": "a@example.com"},
            "access": "a",
            "refresh": "r",
            "msg": "Logged in successfully."
        }))
        .unwrap();
        assert_eq!(response.token_pair(), Some(("a", "r")));

        let partial: AuthResponse =
            serde_json::from_value(serde_json::json!({"msg": "User registered successfully"})).unwrap();
        assert_eq!(partial.token_pair(), None);
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut profile = UserProfile {
            username: "alice".to_string(),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), "alice");

        profile.full_name = Some("Alice Liddell".to_string());
        assert_eq!(profile.display_name(), "Alice Liddell");

        profile.full_name = Some(" ".to_string());
        assert_eq!(profile.display_name(), "alice");
    }
}

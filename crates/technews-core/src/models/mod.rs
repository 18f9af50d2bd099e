//! Data models for TechNews API resources.
//!
//! - `UserProfile`, `LoginRequest`, `AuthResponse`: accounts and tokens
//! - `PostList`, `PostDetail`, `Category`: content listings
//! - `Comment` and threaded replies
//! - Subscription plans, pinned posts and payments
//!
//! Timestamps are kept as the server's ISO-8601 strings and formatted at
//! display time by `utils::format`.

pub mod auth;
pub mod comment;
pub mod payment;
pub mod post;
pub mod subscription;

use serde::{Deserialize, Deserializer};

pub use auth::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, ProfileUpdate,
    RefreshTokenRequest, RegisterRequest, TokenRefreshResponse, UserProfile, VerifyTokenRequest,
};
pub use comment::{
    Comment, CommentCreate, CommentDetail, CommentReplies, CommentUpdate, CommentsQuery,
    PostComments, PostData,
};
pub use payment::{
    CheckoutSession, Payment, PaymentAnalytics, PaymentCreate, PaymentHistory, PaymentMessage,
    PaymentMethod, PaymentStatus, PaymentStatusKind, PaymentsQuery, Refund, RefundCreate,
};
pub use post::{
    AuthorInfo, Category, CategoryInfo, CategoryInput, FeaturedPosts, ImageUpload, ListParams,
    Paginated, PinnedPostsOnly, PostCreateUpdate, PostDetail, PostList, PostsByCategory,
    PostsQuery, PublicationStatus, TogglePinStatus,
};
pub use subscription::{
    CanPinPost, HistoryQuery, PinnedPost, PinnedPostEntry, PinnedPostInfo, PinnedPostsList,
    PlansQuery, Subscription, SubscriptionHistory, SubscriptionPlan, SubscriptionStatus,
    UserSubscriptionStatus,
};

/// Accepts an identifier sent either as a JSON string (UUID) or a number.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

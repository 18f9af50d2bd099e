//! Typed service wrappers for the TechNews REST API.
//!
//! Every call goes through the shared `AuthPipeline`, so bearer attachment
//! and token renewal apply uniformly. Methods return the deserialized
//! response model or the status-mapped `ApiError`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as TokenTtl;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::broadcast;

use crate::auth::TokenStore;
use crate::config::Config;
use crate::models::{
    AuthResponse, CanPinPost, Category, CategoryInput, ChangePasswordRequest, CheckoutSession,
    Comment, CommentCreate, CommentDetail, CommentReplies, CommentUpdate, CommentsQuery,
    FeaturedPosts, HistoryQuery, ImageUpload, ListParams, LoginRequest, MessageResponse,
    Paginated, Payment, PaymentAnalytics, PaymentCreate, PaymentHistory, PaymentMessage,
    PaymentStatus, PaymentsQuery, PinnedPost, PinnedPostsList, PinnedPostsOnly, PlansQuery,
    PostComments, PostCreateUpdate, PostDetail, PostList, PostsByCategory, PostsQuery,
    ProfileUpdate, RefreshTokenRequest, Refund, RefundCreate, RegisterRequest, Subscription,
    SubscriptionHistory, SubscriptionPlan, TogglePinStatus, TokenRefreshResponse, UserProfile,
    UserSubscriptionStatus, VerifyTokenRequest,
};

use super::pipeline::{AuthPipeline, SessionEvent, REFRESH_PATH};
use super::request::{ApiRequest, FormPart};
use super::transport::{HttpTransport, TracedTransport, Transport};
use super::ApiError;

// ============================================================================
// Endpoint prefixes
// ============================================================================

const AUTH: &str = "/api/v1/auth";
const POSTS: &str = "/api/v1/posts";
const COMMENTS: &str = "/api/v1/comments";
const SUBSCRIBE: &str = "/api/v1/subscribe";
const PAYMENTS: &str = "/api/v1/payments";

pub type SharedPipeline = Arc<AuthPipeline<Arc<dyn Transport>>>;

/// API client for the TechNews backend.
/// Clone is cheap; clones share the pipeline, its token store and its
/// renewal gate.
#[derive(Clone)]
pub struct ApiClient {
    pipeline: SharedPipeline,
}

impl ApiClient {
    /// Create a client over any transport, with default token lifetimes.
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            pipeline: Arc::new(AuthPipeline::new(transport, store)),
        }
    }

    pub fn from_pipeline(pipeline: SharedPipeline) -> Self {
        Self { pipeline }
    }

    /// Build the production stack from configuration:
    /// `HttpTransport` wrapped in `TracedTransport`, under the auth pipeline.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let http = HttpTransport::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let transport: Arc<dyn Transport> = Arc::new(TracedTransport::new(http));
        let store = config.token_store().map_err(ApiError::storage)?;

        let pipeline = AuthPipeline::new(transport, store).with_token_ttls(
            TokenTtl::days(config.access_token_ttl_days),
            TokenTtl::days(config.refresh_token_ttl_days),
        );
        Ok(Self::from_pipeline(Arc::new(pipeline)))
    }

    pub fn pipeline(&self) -> &SharedPipeline {
        &self.pipeline
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        self.pipeline.store()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.pipeline.subscribe()
    }

    /// Send an arbitrary request through the pipeline.
    pub async fn send(&self, request: &ApiRequest) -> Result<super::ApiResponse, ApiError> {
        self.pipeline.send(request).await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.pipeline.send(&request).await?.json()
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch(ApiRequest::get(path)).await
    }

    async fn get_with<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        params: &Q,
    ) -> Result<T, ApiError> {
        self.fetch(ApiRequest::get(path).query(params)?).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.fetch(ApiRequest::post(path).json(body)?).await
    }

    /// POST with no body, for action endpoints.
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch(ApiRequest::post(path)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.fetch(ApiRequest::put(path).json(body)?).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.fetch(ApiRequest::patch(path).json(body)?).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.pipeline.send(&ApiRequest::delete(path)).await?;
        Ok(())
    }

    // ===== Auth =====

    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post(&format!("{}/login/", AUTH), credentials).await
    }

    pub async fn register(&self, user: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post(&format!("{}/register/", AUTH), user).await
    }

    pub async fn logout(&self, refresh_token: &str) -> Result<MessageResponse, ApiError> {
        let body = RefreshTokenRequest {
            refresh: refresh_token.to_string(),
        };
        self.post(&format!("{}/logout/", AUTH), &body).await
    }

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.get(&format!("{}/profile/", AUTH)).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.put(&format!("{}/profile/", AUTH), update).await
    }

    pub async fn patch_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.patch(&format!("{}/profile/", AUTH), update).await
    }

    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.put(&format!("{}/change-password/", AUTH), request).await
    }

    /// Explicit refresh call. The pipeline renews on its own; this is for
    /// hosts that want to refresh ahead of expiry.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRefreshResponse, ApiError> {
        let body = RefreshTokenRequest {
            refresh: refresh_token.to_string(),
        };
        self.post(REFRESH_PATH, &body).await
    }

    pub async fn verify_token(&self, token: &str) -> Result<serde_json::Value, ApiError> {
        let body = VerifyTokenRequest {
            token: token.to_string(),
        };
        self.post(&format!("{}/token/verify/", AUTH), &body).await
    }

    // ===== Posts =====

    pub async fn posts(&self, query: &PostsQuery) -> Result<Paginated<PostList>, ApiError> {
        self.get_with(&format!("{}/", POSTS), query).await
    }

    pub async fn post_detail(&self, slug: &str) -> Result<PostDetail, ApiError> {
        self.get(&format!("{}/{}/", POSTS, slug)).await
    }

    pub async fn create_post(&self, post: &PostCreateUpdate) -> Result<PostDetail, ApiError> {
        self.post(&format!("{}/", POSTS), post).await
    }

    /// Create a post as multipart form data, attaching a cover image.
    pub async fn create_post_with_image(
        &self,
        post: &PostCreateUpdate,
        image: &ImageUpload,
    ) -> Result<PostDetail, ApiError> {
        let mut parts = post_form_parts(post)?;
        parts.push(FormPart::file(
            "image",
            image.file_name.clone(),
            image.mime.clone(),
            image.bytes.clone(),
        ));
        self.fetch(ApiRequest::post(format!("{}/", POSTS)).multipart(parts))
            .await
    }

    pub async fn update_post(
        &self,
        slug: &str,
        post: &PostCreateUpdate,
    ) -> Result<PostDetail, ApiError> {
        self.put(&format!("{}/{}/", POSTS, slug), post).await
    }

    pub async fn patch_post(
        &self,
        slug: &str,
        post: &PostCreateUpdate,
    ) -> Result<PostDetail, ApiError> {
        self.patch(&format!("{}/{}/", POSTS, slug), post).await
    }

    pub async fn delete_post(&self, slug: &str) -> Result<(), ApiError> {
        self.delete(&format!("{}/{}/", POSTS, slug)).await
    }

    pub async fn my_posts(&self, query: &PostsQuery) -> Result<Paginated<PostList>, ApiError> {
        self.get_with(&format!("{}/my-posts/", POSTS), query).await
    }

    pub async fn featured_posts(&self) -> Result<FeaturedPosts, ApiError> {
        self.get(&format!("{}/featured/", POSTS)).await
    }

    pub async fn popular_posts(&self) -> Result<Vec<PostList>, ApiError> {
        self.get(&format!("{}/popular/", POSTS)).await
    }

    pub async fn recent_posts(&self) -> Result<Vec<PostList>, ApiError> {
        self.get(&format!("{}/recent/", POSTS)).await
    }

    pub async fn pinned_posts(&self) -> Result<PinnedPostsOnly, ApiError> {
        self.get(&format!("{}/pinned/", POSTS)).await
    }

    pub async fn toggle_pin_status(&self, slug: &str) -> Result<TogglePinStatus, ApiError> {
        self.post_empty(&format!("{}/toggle-pin-status/{}", POSTS, slug))
            .await
    }

    // ===== Categories =====

    pub async fn categories(&self, params: &ListParams) -> Result<Paginated<Category>, ApiError> {
        self.get_with(&format!("{}/categories/", POSTS), params)
            .await
    }

    pub async fn category(&self, slug: &str) -> Result<Category, ApiError> {
        self.get(&format!("{}/categories/{}", POSTS, slug)).await
    }

    pub async fn create_category(&self, category: &CategoryInput) -> Result<Category, ApiError> {
        self.post(&format!("{}/categories/", POSTS), category).await
    }

    pub async fn update_category(
        &self,
        slug: &str,
        category: &CategoryInput,
    ) -> Result<Category, ApiError> {
        self.put(&format!("{}/categories/{}", POSTS, slug), category)
            .await
    }

    pub async fn delete_category(&self, slug: &str) -> Result<(), ApiError> {
        self.delete(&format!("{}/categories/{}", POSTS, slug)).await
    }

    pub async fn category_posts(&self, slug: &str) -> Result<PostsByCategory, ApiError> {
        self.get(&format!("{}/categories/{}/posts/", POSTS, slug))
            .await
    }

    // ===== Comments =====

    pub async fn comments(&self, query: &CommentsQuery) -> Result<Paginated<Comment>, ApiError> {
        self.get_with(&format!("{}/", COMMENTS), query).await
    }

    pub async fn comment(&self, id: i64) -> Result<CommentDetail, ApiError> {
        self.get(&format!("{}/{}/", COMMENTS, id)).await
    }

    pub async fn create_comment(&self, comment: &CommentCreate) -> Result<CommentCreate, ApiError> {
        self.post(&format!("{}/", COMMENTS), comment).await
    }

    pub async fn update_comment(
        &self,
        id: i64,
        comment: &CommentUpdate,
    ) -> Result<CommentUpdate, ApiError> {
        self.put(&format!("{}/{}/", COMMENTS, id), comment).await
    }

    pub async fn patch_comment(
        &self,
        id: i64,
        comment: &CommentUpdate,
    ) -> Result<CommentUpdate, ApiError> {
        self.patch(&format!("{}/{}/", COMMENTS, id), comment).await
    }

    pub async fn delete_comment(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("{}/{}/", COMMENTS, id)).await
    }

    pub async fn my_comments(&self, params: &ListParams) -> Result<Paginated<Comment>, ApiError> {
        self.get_with(&format!("{}/my-comments/", COMMENTS), params)
            .await
    }

    pub async fn post_comments(&self, post_id: i64) -> Result<PostComments, ApiError> {
        self.get(&format!("{}/post/{}/", COMMENTS, post_id)).await
    }

    pub async fn comment_replies(&self, id: i64) -> Result<CommentReplies, ApiError> {
        self.get(&format!("{}/{}/replies/", COMMENTS, id)).await
    }

    // ===== Subscriptions =====

    pub async fn plans(&self, query: &PlansQuery) -> Result<Paginated<SubscriptionPlan>, ApiError> {
        self.get_with(&format!("{}/plans/", SUBSCRIBE), query).await
    }

    pub async fn plan(&self, id: i64) -> Result<SubscriptionPlan, ApiError> {
        self.get(&format!("{}/plans/{}/", SUBSCRIBE, id)).await
    }

    pub async fn my_subscription(&self) -> Result<Subscription, ApiError> {
        self.get(&format!("{}/my-subscription/", SUBSCRIBE)).await
    }

    pub async fn subscription_status(&self) -> Result<UserSubscriptionStatus, ApiError> {
        self.get(&format!("{}/status/", SUBSCRIBE)).await
    }

    pub async fn subscription_history(
        &self,
        query: &HistoryQuery,
    ) -> Result<Paginated<SubscriptionHistory>, ApiError> {
        self.get_with(&format!("{}/history/", SUBSCRIBE), query)
            .await
    }

    pub async fn cancel_subscription(&self) -> Result<MessageResponse, ApiError> {
        self.post_empty(&format!("{}/cancel/", SUBSCRIBE)).await
    }

    pub async fn can_pin_post(&self, post_id: i64) -> Result<CanPinPost, ApiError> {
        self.get(&format!("{}/can-pin/{}/", SUBSCRIBE, post_id)).await
    }

    pub async fn pinned_posts_list(&self) -> Result<PinnedPostsList, ApiError> {
        self.get(&format!("{}/pinned-posts/", SUBSCRIBE)).await
    }

    pub async fn my_pinned_post(&self) -> Result<PinnedPost, ApiError> {
        self.get(&format!("{}/my-pinned-post/", SUBSCRIBE)).await
    }

    pub async fn delete_my_pinned_post(&self) -> Result<(), ApiError> {
        self.delete(&format!("{}/my-pinned-post/", SUBSCRIBE)).await
    }

    // ===== Payments =====

    pub async fn payments(&self, query: &PaymentsQuery) -> Result<Paginated<Payment>, ApiError> {
        self.get_with(&format!("{}/", PAYMENTS), query).await
    }

    pub async fn payment(&self, id: &str) -> Result<Payment, ApiError> {
        self.get(&format!("{}/{}/", PAYMENTS, id)).await
    }

    pub async fn create_checkout_session(
        &self,
        request: &PaymentCreate,
    ) -> Result<CheckoutSession, ApiError> {
        self.post(&format!("{}/create-checkout-session/", PAYMENTS), request)
            .await
    }

    pub async fn payment_history(&self) -> Result<PaymentHistory, ApiError> {
        self.get(&format!("{}/history/", PAYMENTS)).await
    }

    pub async fn payment_status(&self, id: &str) -> Result<PaymentStatus, ApiError> {
        self.get(&format!("{}/{}/status/", PAYMENTS, id)).await
    }

    pub async fn retry_payment(&self, id: &str) -> Result<CheckoutSession, ApiError> {
        self.post_empty(&format!("{}/{}/retry/", PAYMENTS, id)).await
    }

    pub async fn cancel_payment(&self, id: &str) -> Result<PaymentMessage, ApiError> {
        self.post_empty(&format!("{}/{}/cancel/", PAYMENTS, id)).await
    }

    pub async fn refund_payment(
        &self,
        id: &str,
        refund: &RefundCreate,
    ) -> Result<PaymentStatus, ApiError> {
        self.post(&format!("{}/{}/refund/", PAYMENTS, id), refund)
            .await
    }

    pub async fn refunds(&self, params: &ListParams) -> Result<Paginated<Refund>, ApiError> {
        self.get_with(&format!("{}/refunds/", PAYMENTS), params).await
    }

    pub async fn refund(&self, id: &str) -> Result<Refund, ApiError> {
        self.get(&format!("{}/refunds/{}/", PAYMENTS, id)).await
    }

    pub async fn payment_analytics(&self) -> Result<PaymentAnalytics, ApiError> {
        self.get(&format!("{}/analytics/", PAYMENTS)).await
    }
}

/// Text fields of a post as form parts; unset fields are left out.
fn post_form_parts(post: &PostCreateUpdate) -> Result<Vec<FormPart>, ApiError> {
    let value = serde_json::to_value(post)?;
    let mut parts = Vec::new();
    if let serde_json::Value::Object(fields) = value {
        for (name, field) in fields {
            let text = match field {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            parts.push(FormPart::text(name, text));
        }
    }
    Ok(parts)
}

use serde::{Deserialize, Serialize};

use super::post::{AuthorInfo, ListParams};
use super::string_or_number;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: i64,
    pub name: String,
    /// Decimal amount as sent by the server, e.g. `"9.99"`.
    pub price: String,
    #[serde(default)]
    pub duration_days: i64,
    #[serde(default)]
    pub features: serde_json::Value,
    #[serde(default)]
    pub is_active: bool,
    pub created: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionUserInfo {
    pub id: serde_json::Value,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub user_info: Option<SubscriptionUserInfo>,
    #[serde(default)]
    pub plan: Option<i64>,
    #[serde(default)]
    pub plan_info: Option<SubscriptionPlan>,
    pub status: SubscriptionStatus,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub days_remaining: Option<i64>,
    pub created: Option<String>,
    pub modified: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinnedPostInfo {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub views_count: i64,
    pub created: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinnedPost {
    pub id: i64,
    pub post: i64,
    #[serde(default)]
    pub post_info: Option<PinnedPostInfo>,
    pub pinned_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSubscriptionStatus {
    pub has_subscription: bool,
    pub is_active: bool,
    pub can_pin_posts: bool,
    pub subscription: Option<Subscription>,
    pub pinned_post: Option<PinnedPost>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionHistory {
    pub id: i64,
    pub action: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanPinPost {
    pub can_pin: bool,
    #[serde(default)]
    pub checks: serde_json::Value,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Entry of the public pinned-posts listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinnedPostEntry {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub author: AuthorInfo,
    #[serde(default)]
    pub views_count: i64,
    #[serde(default)]
    pub comments_count: i64,
    pub created: Option<String>,
    pub pinned_at: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinnedPostsList {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<PinnedPostEntry>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlansQuery {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoryQuery {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

use serde::{Deserialize, Serialize};

use super::post::ListParams;
use super::string_or_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatusKind {
    Pending,
    Processing,
    Succeeded,
    Failed,
    Cancelled,
    Refunded,
}

impl std::fmt::Display for PaymentStatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatusKind::Pending => write!(f, "Pending"),
            PaymentStatusKind::Processing => write!(f, "Processing"),
            PaymentStatusKind::Succeeded => write!(f, "Succeeded"),
            PaymentStatusKind::Failed => write!(f, "Failed"),
            PaymentStatusKind::Cancelled => write!(f, "Cancelled"),
            PaymentStatusKind::Refunded => write!(f, "Refunded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Stripe,
    Paypal,
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentUserInfo {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSubscriptionInfo {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub plan_name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub user_info: Option<PaymentUserInfo>,
    #[serde(default)]
    pub subscription_info: Option<PaymentSubscriptionInfo>,
    #[serde(default)]
    pub description: Option<String>,
    /// Decimal amount as sent by the server, e.g. `"9.99"`.
    pub amount: String,
    #[serde(default)]
    pub currency: String,
    pub status: PaymentStatusKind,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub is_pending: bool,
    #[serde(default)]
    pub is_successful: bool,
    #[serde(default)]
    pub can_be_refunded: bool,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub processed_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub subscription_plan_id: i64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub checkout_url: String,
    #[serde(deserialize_with = "string_or_number")]
    pub session_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub payment_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatus {
    #[serde(deserialize_with = "string_or_number")]
    pub payment_id: String,
    pub status: PaymentStatusKind,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub subscription_activated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentHistory {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<Payment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMessage {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundCreate {
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub payment: Option<serde_json::Value>,
    #[serde(default)]
    pub payment_info: Option<serde_json::Value>,
    pub amount: String,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: String,
    #[serde(default)]
    pub is_partial: bool,
    pub created: Option<String>,
    pub processed_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAnalytics {
    #[serde(default)]
    pub total_payments: i64,
    #[serde(default)]
    pub successful_payments: i64,
    #[serde(default)]
    pub success_rate: serde_json::Value,
    #[serde(default)]
    pub total_revenue: serde_json::Value,
    #[serde(default)]
    pub monthly_revenue: serde_json::Value,
    #[serde(default)]
    pub monthly_payments: i64,
    #[serde(default)]
    pub avg_payment: serde_json::Value,
    #[serde(default)]
    pub active_subscriptions: i64,
    #[serde(default)]
    pub period: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PaymentsQuery {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatusKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

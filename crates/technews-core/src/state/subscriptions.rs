use tracing::warn;

use crate::api::{ApiClient, ApiError};
use crate::models::{
    HistoryQuery, MessageResponse, Paginated, PinnedPostEntry, PinnedPostsList, PlansQuery,
    Subscription, SubscriptionHistory, SubscriptionPlan, UserSubscriptionStatus,
};

const FETCH_PLANS_FAILED: &str = "Failed to fetch subscription plans";
const FETCH_SUBSCRIPTION_FAILED: &str = "Failed to fetch subscription";
const FETCH_HISTORY_FAILED: &str = "Failed to fetch subscription history";
const CANCEL_FAILED: &str = "Failed to cancel subscription";
const FETCH_PINNED_FAILED: &str = "Failed to fetch pinned posts";

pub struct SubscriptionsState {
    api: ApiClient,
    pub plans: Vec<SubscriptionPlan>,
    pub current_subscription: Option<Subscription>,
    pub status: Option<UserSubscriptionStatus>,
    pub history: Vec<SubscriptionHistory>,
    pub pinned_posts: Vec<PinnedPostEntry>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SubscriptionsState {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            plans: Vec::new(),
            current_subscription: None,
            status: None,
            history: Vec::new(),
            pinned_posts: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub async fn fetch_plans(
        &mut self,
        query: &PlansQuery,
    ) -> Result<Paginated<SubscriptionPlan>, ApiError> {
        self.begin();
        let result = self.api.plans(query).await;
        let page = self.finish(result, FETCH_PLANS_FAILED)?;

        self.plans = page.results.clone();
        Ok(page)
    }

    pub async fn fetch_my_subscription(&mut self) -> Result<Subscription, ApiError> {
        self.begin();
        let result = self.api.my_subscription().await;
        let subscription = self.finish(result, FETCH_SUBSCRIPTION_FAILED)?;

        self.current_subscription = Some(subscription.clone());
        Ok(subscription)
    }

    /// Refresh the status summary. Failures are logged and leave `error`
    /// untouched.
    pub async fn fetch_status(&mut self) -> Result<UserSubscriptionStatus, ApiError> {
        let status = self
            .api
            .subscription_status()
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to fetch subscription status"))?;
        self.status = Some(status.clone());
        Ok(status)
    }

    pub async fn fetch_history(
        &mut self,
        query: &HistoryQuery,
    ) -> Result<Paginated<SubscriptionHistory>, ApiError> {
        self.begin();
        let result = self.api.subscription_history(query).await;
        let page = self.finish(result, FETCH_HISTORY_FAILED)?;

        self.history = page.results.clone();
        Ok(page)
    }

    pub async fn cancel_subscription(&mut self) -> Result<MessageResponse, ApiError> {
        self.begin();
        let result = self.api.cancel_subscription().await;
        let response = self.finish(result, CANCEL_FAILED)?;

        self.current_subscription = None;
        Ok(response)
    }

    pub async fn fetch_pinned_posts(&mut self) -> Result<PinnedPostsList, ApiError> {
        self.begin();
        let result = self.api.pinned_posts_list().await;
        let list = self.finish(result, FETCH_PINNED_FAILED)?;

        self.pinned_posts = list.results.clone();
        Ok(list)
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish<T>(&mut self, result: Result<T, ApiError>, fallback: &str) -> Result<T, ApiError> {
        self.loading = false;
        if let Err(ref e) = result {
            self.error = Some(e.user_message(fallback));
        }
        result
    }
}

use crate::api::{ApiClient, ApiError};
use crate::models::{
    CheckoutSession, ListParams, Paginated, Payment, PaymentCreate, PaymentMessage, PaymentStatus,
    PaymentsQuery, Refund, RefundCreate,
};

use super::Pagination;

const FETCH_PAYMENTS_FAILED: &str = "Failed to fetch payments";
const FETCH_PAYMENT_FAILED: &str = "Failed to fetch payment";
const CHECKOUT_FAILED: &str = "Failed to create checkout session";
const RETRY_FAILED: &str = "Failed to retry payment";
const CANCEL_FAILED: &str = "Failed to cancel payment";
const FETCH_REFUNDS_FAILED: &str = "Failed to fetch refunds";
const REFUND_FAILED: &str = "Failed to create refund";

pub struct PaymentsState {
    api: ApiClient,
    pub payments: Vec<Payment>,
    pub refunds: Vec<Refund>,
    pub current_payment: Option<Payment>,
    pub pagination: Pagination,
    pub loading: bool,
    pub error: Option<String>,
}

impl PaymentsState {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            payments: Vec::new(),
            refunds: Vec::new(),
            current_payment: None,
            pagination: Pagination::default(),
            loading: false,
            error: None,
        }
    }

    pub async fn fetch_payments(
        &mut self,
        query: &PaymentsQuery,
    ) -> Result<Paginated<Payment>, ApiError> {
        self.begin();
        let result = self.api.payments(query).await;
        let page = self.finish(result, FETCH_PAYMENTS_FAILED)?;

        self.payments = page.results.clone();
        self.pagination = Pagination::from(&page);
        Ok(page)
    }

    pub async fn fetch_payment(&mut self, id: &str) -> Result<Payment, ApiError> {
        self.begin();
        let result = self.api.payment(id).await;
        let payment = self.finish(result, FETCH_PAYMENT_FAILED)?;

        self.current_payment = Some(payment.clone());
        Ok(payment)
    }

    pub async fn create_checkout_session(
        &mut self,
        request: &PaymentCreate,
    ) -> Result<CheckoutSession, ApiError> {
        self.begin();
        let result = self.api.create_checkout_session(request).await;
        self.finish(result, CHECKOUT_FAILED)
    }

    pub async fn retry_payment(&mut self, id: &str) -> Result<CheckoutSession, ApiError> {
        self.begin();
        let result = self.api.retry_payment(id).await;
        self.finish(result, RETRY_FAILED)
    }

    pub async fn cancel_payment(&mut self, id: &str) -> Result<PaymentMessage, ApiError> {
        self.begin();
        let result = self.api.cancel_payment(id).await;
        self.finish(result, CANCEL_FAILED)
    }

    pub async fn fetch_refunds(&mut self, params: &ListParams) -> Result<Paginated<Refund>, ApiError> {
        self.begin();
        let result = self.api.refunds(params).await;
        let page = self.finish(result, FETCH_REFUNDS_FAILED)?;

        self.refunds = page.results.clone();
        Ok(page)
    }

    pub async fn refund_payment(
        &mut self,
        id: &str,
        refund: &RefundCreate,
    ) -> Result<PaymentStatus, ApiError> {
        self.begin();
        let result = self.api.refund_payment(id, refund).await;
        self.finish(result, REFUND_FAILED)
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::models::{PaymentMethod, PaymentStatusKind};
    use crate::state::testing::{client, ok, status};

    fn payment(id: &str, status: &str) -> serde_json::Value {
        json!({"id": id, "amount": "9.99", "currency": "USD", "status": status})
    }

    #[tokio::test]
    async fn test_fetch_payments_and_select_one() {
        let (api, _) = client(vec![
            ok(json!({
                "count": 3,
                "next": null,
                "previous": "http://localhost:8000/api/v1/payments/?page=1",
                "results": [payment("a1", "succeeded"), payment("b2", "failed")]
            })),
            ok(payment("b2", "failed")),
        ]);
        let mut state = PaymentsState::new(api);

        state.fetch_payments(&PaymentsQuery::default()).await.unwrap();
        assert_eq!(state.payments.len(), 2);
        assert_eq!(state.pagination.count, 3);
        assert!(state.pagination.previous.is_some());

        state.fetch_payment("b2").await.unwrap();
        let current = state.current_payment.as_ref().unwrap();
        assert_eq!(current.id, "b2");
        assert_eq!(current.status, PaymentStatusKind::Failed);
    }

    #[tokio::test]
    async fn test_checkout_session_is_returned_not_stored() {
        let (api, replay) = client(vec![ok(json!({
            "checkout_url": "https://checkout.stripe.com/c/pay/cs_test",
            "session_id": "cs_test",
            "payment_id": "c3"
        }))]);
        let mut state = PaymentsState::new(api);

        let session = state
            .create_checkout_session(&PaymentCreate {
                subscription_plan_id: 1,
                payment_method: PaymentMethod::Stripe,
                success_url: None,
                cancel_url: None,
            })
            .await
            .unwrap();

        assert_eq!(session.payment_id, "c3");
        assert!(state.payments.is_empty());
        assert_eq!(
            replay.paths.lock().unwrap()[0],
            "/api/v1/payments/create-checkout-session/"
        );
    }

    #[tokio::test]
    async fn test_failures_use_operation_fallbacks() {
        let (api, _) = client(vec![
            status(500, json!({})),
            status(400, json!({"error": "Payment cannot be refunded"})),
            status(502, json!({})),
        ]);
        let mut state = PaymentsState::new(api);

        assert!(state.retry_payment("a1").await.is_err());
        assert_eq!(state.error.as_deref(), Some("Failed to retry payment"));

        let refund = RefundCreate {
            amount: "9.99".to_string(),
            reason: None,
        };
        assert!(state.refund_payment("a1", &refund).await.is_err());
        assert_eq!(state.error.as_deref(), Some("Payment cannot be refunded"));

        assert!(state.fetch_refunds(&ListParams::default()).await.is_err());
        assert_eq!(state.error.as_deref(), Some("Failed to fetch refunds"));
        assert!(!state.loading);
    }
}

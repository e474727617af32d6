//! Transport abstraction for the payments services

use crate::error::ApiError;
use crate::model::CreateSubscriptionParams;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by every [`PaymentsApi`] call
pub type ApiFuture<'a> = Pin<Box<dyn Future<Output = Result<serde_json::Value, ApiError>> + Send + 'a>>;

/// Calls against the payments services
///
/// Each call resolves to the parsed JSON body or a structured [`ApiError`].
/// Methods return boxed futures so the trait stays usable as `dyn PaymentsApi`.
pub trait PaymentsApi: Send + Sync {
    /// Signed-in user's profile
    fn fetch_profile(&self) -> ApiFuture<'_>;

    /// All purchasable plans
    fn fetch_plans(&self) -> ApiFuture<'_>;

    /// The user's active subscriptions
    fn fetch_subscriptions(&self) -> ApiFuture<'_>;

    /// Introspection of the access token
    fn fetch_token(&self) -> ApiFuture<'_>;

    /// Billing customer document
    fn fetch_customer(&self) -> ApiFuture<'_>;

    /// Subscribe to a plan
    fn create_subscription(&self, params: CreateSubscriptionParams) -> ApiFuture<'_>;

    /// Cancel at period end
    fn cancel_subscription(&self, subscription_id: String) -> ApiFuture<'_>;

    /// Undo a pending cancellation
    fn reactivate_subscription(&self, subscription_id: String) -> ApiFuture<'_>;

    /// Replace the payment method on file
    fn update_payment(&self, payment_token: String) -> ApiFuture<'_>;
}

/// Dependencies injected into the billing reducers
#[derive(Clone)]
pub struct BillingEnvironment {
    /// Transport used by operations started from the reducer
    pub api: Arc<dyn PaymentsApi>,
}

impl BillingEnvironment {
    /// Create an environment around a transport
    #[must_use]
    pub fn new(api: Arc<dyn PaymentsApi>) -> Self {
        Self { api }
    }
}

impl std::fmt::Debug for BillingEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingEnvironment").finish_non_exhaustive()
    }
}

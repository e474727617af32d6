//! Operations: one request bound to one resource key
//!
//! An operation passes through *started* and then *succeeded* or *failed*.
//! [`Operation::started`] yields the first action, [`Operation::run`] awaits
//! the transport and yields the settling one.

use crate::action::ApiAction;
use crate::api::{ApiFuture, PaymentsApi};
use crate::model::CreateSubscriptionParams;
use crate::resource::ResourceKey;
use billing_store_core::async_effect;
use billing_store_core::effect::Effect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OPERATION_ID: AtomicU64 = AtomicU64::new(1);

/// Correlates a settlement with the caller waiting for it
///
/// Table entries never store it: two operations on the same key are not
/// distinguished there and the last one to settle wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationId(pub u64);

impl OperationId {
    /// Allocate a process-unique id
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_OPERATION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op-{}", self.0)
    }
}

/// A call against the payments services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ApiRequest {
    /// Signed-in user's profile
    FetchProfile,
    /// All purchasable plans
    FetchPlans,
    /// Active subscriptions
    FetchSubscriptions,
    /// Access token introspection
    FetchToken,
    /// Billing customer document
    FetchCustomer,
    /// Subscribe to a plan
    CreateSubscription(CreateSubscriptionParams),
    /// Cancel at period end
    CancelSubscription {
        /// Subscription to cancel
        subscription_id: String,
    },
    /// Undo a pending cancellation
    ReactivateSubscription {
        /// Subscription to reactivate
        subscription_id: String,
    },
    /// Replace the payment method
    UpdatePayment {
        /// Token from the payment provider's card form
        payment_token: String,
    },
}

impl ApiRequest {
    /// Table entry this request reports into
    #[must_use]
    pub const fn key(&self) -> ResourceKey {
        match self {
            Self::FetchProfile => ResourceKey::Profile,
            Self::FetchPlans => ResourceKey::Plans,
            Self::FetchSubscriptions => ResourceKey::Subscriptions,
            Self::FetchToken => ResourceKey::Token,
            Self::FetchCustomer => ResourceKey::Customer,
            Self::CreateSubscription(_) => ResourceKey::CreateSubscription,
            Self::CancelSubscription { .. } => ResourceKey::CancelSubscription,
            Self::ReactivateSubscription { .. } => ResourceKey::ReactivateSubscription,
            Self::UpdatePayment { .. } => ResourceKey::UpdatePayment,
        }
    }

    /// Issue the request
    pub fn call(self, api: &dyn PaymentsApi) -> ApiFuture<'_> {
        match self {
            Self::FetchProfile => api.fetch_profile(),
            Self::FetchPlans => api.fetch_plans(),
            Self::FetchSubscriptions => api.fetch_subscriptions(),
            Self::FetchToken => api.fetch_token(),
            Self::FetchCustomer => api.fetch_customer(),
            Self::CreateSubscription(params) => api.create_subscription(params),
            Self::CancelSubscription { subscription_id } => api.cancel_subscription(subscription_id),
            Self::ReactivateSubscription { subscription_id } => api.reactivate_subscription(subscription_id),
            Self::UpdatePayment { payment_token } => api.update_payment(payment_token),
        }
    }
}

/// One request with its correlation id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Correlation id
    pub id: OperationId,
    /// The call
    pub request: ApiRequest,
}

impl Operation {
    /// Operation with an explicit id
    #[must_use]
    pub const fn new(id: OperationId, request: ApiRequest) -> Self {
        Self { id, request }
    }

    /// Operation with a freshly allocated id
    #[must_use]
    pub fn issue(request: ApiRequest) -> Self {
        Self::new(OperationId::next(), request)
    }

    /// Entry the operation reports into
    #[must_use]
    pub const fn key(&self) -> ResourceKey {
        self.request.key()
    }

    /// The *started* action, to be reduced before the call is issued
    #[must_use]
    pub fn started(&self) -> ApiAction {
        ApiAction::Start {
            id: self.id,
            request: self.request.clone(),
        }
    }

    /// Await the call and produce the *settled* action
    pub async fn run(self, api: &dyn PaymentsApi) -> ApiAction {
        let key = self.key();
        let outcome = self
            .request
            .call(api)
            .await
            .and_then(|value| key.validate(&value).map(|()| value));
        if let Err(error) = &outcome {
            tracing::debug!(%key, id = %self.id, %error, "Operation failed");
        }
        ApiAction::Settle {
            id: self.id,
            key,
            outcome,
        }
    }

    /// Package [`Operation::run`] as an effect for the store to execute
    #[must_use]
    pub fn into_effect(self, api: Arc<dyn PaymentsApi>) -> Effect<ApiAction> {
        async_effect! {
            Some(self.run(api.as_ref()).await)
        }
    }
}

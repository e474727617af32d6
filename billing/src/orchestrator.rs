//! Composite workflows over the billing store
//!
//! Workflows never fail. Every operation's outcome is recorded in its table
//! entry; errors seen here are logged and dropped, so callers await a
//! workflow unconditionally and then read the entries they care about.

use crate::action::ApiAction;
use crate::error::WorkflowError;
use crate::model::CreateSubscriptionParams;
use crate::operation::{ApiRequest, Operation};
use crate::resource::ResourceKey;
use crate::store::BillingStore;
use futures::future::join_all;
use std::time::Duration;

/// Timing used by the workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Delay before a mutation's entry returns to idle
    pub reset_delay: Duration,
    /// Upper bound on waiting for one operation to settle
    pub settle_timeout: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            reset_delay: Duration::from_millis(2000),
            settle_timeout: Duration::from_secs(30),
        }
    }
}

/// Runs named workflows against a [`BillingStore`]
#[derive(Clone)]
pub struct Orchestrator {
    store: BillingStore,
    config: WorkflowConfig,
}

impl Orchestrator {
    /// Orchestrator over `store`
    #[must_use]
    pub const fn new(store: BillingStore, config: WorkflowConfig) -> Self {
        Self { store, config }
    }

    /// The store this orchestrator drives
    #[must_use]
    pub const fn store(&self) -> &BillingStore {
        &self.store
    }

    /// Timing in use
    #[must_use]
    pub const fn config(&self) -> WorkflowConfig {
        self.config
    }

    /// Plans, profile, customer and subscriptions, in parallel
    #[tracing::instrument(skip(self))]
    pub async fn fetch_product_route_resources(&self) {
        self.fan_out(Self::route_requests()).await;
    }

    /// Plans, profile, customer and subscriptions, in parallel
    #[tracing::instrument(skip(self))]
    pub async fn fetch_subscriptions_route_resources(&self) {
        self.fan_out(Self::route_requests()).await;
    }

    /// Customer and subscriptions, in parallel
    #[tracing::instrument(skip(self))]
    pub async fn fetch_customer_and_subscriptions(&self) {
        self.fan_out(vec![ApiRequest::FetchCustomer, ApiRequest::FetchSubscriptions]).await;
    }

    /// Introspect the access token
    #[tracing::instrument(skip(self))]
    pub async fn fetch_token(&self) {
        if let Err(error) = self.perform(ApiRequest::FetchToken).await {
            tracing::warn!(%error, "Token fetch failed");
        }
    }

    /// Create a subscription, then refresh customer and subscriptions
    #[tracing::instrument(skip(self, params), fields(plan_id = %params.plan_id))]
    pub async fn create_subscription_and_refresh(&self, params: CreateSubscriptionParams) {
        self.mutate_and_refresh(ApiRequest::CreateSubscription(params)).await;
    }

    /// Cancel a subscription, then refresh customer and subscriptions
    #[tracing::instrument(skip(self))]
    pub async fn cancel_subscription_and_refresh(&self, subscription_id: &str) {
        self.mutate_and_refresh(ApiRequest::CancelSubscription {
            subscription_id: subscription_id.to_string(),
        })
        .await;
    }

    /// Reactivate a subscription, then refresh customer and subscriptions
    #[tracing::instrument(skip(self))]
    pub async fn reactivate_subscription_and_refresh(&self, subscription_id: &str) {
        self.mutate_and_refresh(ApiRequest::ReactivateSubscription {
            subscription_id: subscription_id.to_string(),
        })
        .await;
    }

    /// Update the payment method, then refresh customer and subscriptions
    #[tracing::instrument(skip(self, payment_token))]
    pub async fn update_payment_and_refresh(&self, payment_token: &str) {
        self.mutate_and_refresh(ApiRequest::UpdatePayment {
            payment_token: payment_token.to_string(),
        })
        .await;
    }

    fn route_requests() -> Vec<ApiRequest> {
        vec![
            ApiRequest::FetchPlans,
            ApiRequest::FetchProfile,
            ApiRequest::FetchCustomer,
            ApiRequest::FetchSubscriptions,
        ]
    }

    /// Run requests concurrently and wait for all of them
    async fn fan_out(&self, requests: Vec<ApiRequest>) {
        let keys: Vec<ResourceKey> = requests.iter().map(ApiRequest::key).collect();
        let outcomes = join_all(requests.into_iter().map(|request| self.perform(request))).await;

        for (key, outcome) in keys.into_iter().zip(outcomes) {
            if let Err(error) = outcome {
                tracing::warn!(%key, %error, "Fetch failed");
            }
        }
    }

    /// Primary mutation, then refresh on success; always schedules the reset
    async fn mutate_and_refresh(&self, request: ApiRequest) {
        let key = request.key();

        match self.perform(request).await {
            Ok(()) => self.fetch_customer_and_subscriptions().await,
            Err(error) => tracing::warn!(%key, %error, "Mutation failed, skipping refresh"),
        }

        let schedule = ApiAction::ScheduleReset {
            key,
            after: self.config.reset_delay,
        };
        if let Err(error) = self.store.send(schedule).await {
            tracing::warn!(%key, %error, "Could not schedule reset");
        }
    }

    /// Start one operation and wait for its settlement
    ///
    /// Returns the same outcome the entry records, including
    /// `invalid_response` for a document of the wrong shape.
    async fn perform(&self, request: ApiRequest) -> Result<(), WorkflowError> {
        let operation = Operation::issue(request);
        let id = operation.id;

        let settled = self
            .store
            .send_and_wait_for(
                operation.started(),
                |action| action.is_settlement_of(id),
                self.config.settle_timeout,
            )
            .await?;

        match settled {
            ApiAction::Settle { outcome: Err(error), .. } => Err(WorkflowError::Api(error)),
            _ => Ok(()),
        }
    }
}

//! Scripted [`PaymentsApi`] for tests and local runs.
//!
//! **WARNING**: Do NOT use in production. Responses are canned.

use crate::api::{ApiFuture, PaymentsApi};
use crate::error::ApiError;
use crate::model::CreateSubscriptionParams;
use crate::operation::ApiRequest;
use crate::resource::ResourceKey;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Clone)]
struct Scripted {
    outcome: Result<Value, ApiError>,
    latency: Duration,
}

#[derive(Default)]
struct Script {
    queued: HashMap<ResourceKey, VecDeque<Scripted>>,
    standing: HashMap<ResourceKey, Scripted>,
    calls: Vec<ApiRequest>,
}

/// Mock payments transport.
///
/// Each endpoint answers with the next queued response for its key, falling
/// back to the standing response. Unscripted endpoints fail with
/// `not_mocked`. Every request is recorded.
#[derive(Clone, Default)]
pub struct MockPaymentsApi {
    script: Arc<Mutex<Script>>,
}

impl MockPaymentsApi {
    /// Create a mock with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call for `key` with `value`.
    pub fn succeed(&self, key: ResourceKey, value: Value) -> &Self {
        self.stand(key, Ok(value), Duration::ZERO)
    }

    /// Fail every call for `key` with `error`.
    pub fn fail(&self, key: ResourceKey, error: ApiError) -> &Self {
        self.stand(key, Err(error), Duration::ZERO)
    }

    /// Standing response delivered after `latency`.
    pub fn stand(&self, key: ResourceKey, outcome: Result<Value, ApiError>, latency: Duration) -> &Self {
        self.lock().standing.insert(key, Scripted { outcome, latency });
        self
    }

    /// One-shot response for the next call on `key`, delivered after `latency`.
    pub fn enqueue(&self, key: ResourceKey, outcome: Result<Value, ApiError>, latency: Duration) -> &Self {
        self.lock()
            .queued
            .entry(key)
            .or_default()
            .push_back(Scripted { outcome, latency });
        self
    }

    /// Every request issued so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.lock().calls.clone()
    }

    /// Number of requests issued for `key`.
    #[must_use]
    pub fn call_count(&self, key: ResourceKey) -> usize {
        self.lock().calls.iter().filter(|request| request.key() == key).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn answer(&self, request: ApiRequest) -> ApiFuture<'_> {
        let key = request.key();
        let scripted = {
            let mut script = self.lock();
            script.calls.push(request);
            script
                .queued
                .get_mut(&key)
                .and_then(VecDeque::pop_front)
                .or_else(|| script.standing.get(&key).cloned())
        };

        Box::pin(async move {
            let Some(Scripted { outcome, latency }) = scripted else {
                return Err(ApiError::new("not_mocked").with_message(format!("no response scripted for {key}")));
            };
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            outcome
        })
    }
}

impl PaymentsApi for MockPaymentsApi {
    fn fetch_profile(&self) -> ApiFuture<'_> {
        self.answer(ApiRequest::FetchProfile)
    }

    fn fetch_plans(&self) -> ApiFuture<'_> {
        self.answer(ApiRequest::FetchPlans)
    }

    fn fetch_subscriptions(&self) -> ApiFuture<'_> {
        self.answer(ApiRequest::FetchSubscriptions)
    }

    fn fetch_token(&self) -> ApiFuture<'_> {
        self.answer(ApiRequest::FetchToken)
    }

    fn fetch_customer(&self) -> ApiFuture<'_> {
        self.answer(ApiRequest::FetchCustomer)
    }

    fn create_subscription(&self, params: CreateSubscriptionParams) -> ApiFuture<'_> {
        self.answer(ApiRequest::CreateSubscription(params))
    }

    fn cancel_subscription(&self, subscription_id: String) -> ApiFuture<'_> {
        self.answer(ApiRequest::CancelSubscription { subscription_id })
    }

    fn reactivate_subscription(&self, subscription_id: String) -> ApiFuture<'_> {
        self.answer(ApiRequest::ReactivateSubscription { subscription_id })
    }

    fn update_payment(&self, payment_token: String) -> ApiFuture<'_> {
        self.answer(ApiRequest::UpdatePayment { payment_token })
    }
}

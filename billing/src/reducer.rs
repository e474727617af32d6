//! Billing reducers
//!
//! [`FetchReducer`] owns the lifecycle of a single entry; [`BillingReducer`]
//! scopes one of them to every field of the [`ResourceTable`] and adds the
//! table-wide actions.

use crate::action::ApiAction;
use crate::api::BillingEnvironment;
use crate::fetch::{FetchEvent, FetchState};
use crate::operation::Operation;
use crate::resource::{ResourceKey, ResourceTable};
use billing_store_core::composition::{CombinedReducer, SharedReducer, combine_reducers, scope_reducer};
use billing_store_core::{SmallVec, cancellable, delay, effect::Effect, reducer::Reducer, smallvec};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

/// Reducer for the entry of one resource key
///
/// Ignores every action aimed at another key.
pub struct FetchReducer<T> {
    key: ResourceKey,
    _result: PhantomData<fn() -> T>,
}

impl<T> FetchReducer<T> {
    /// Reducer for `key`
    #[must_use]
    pub const fn new(key: ResourceKey) -> Self {
        Self {
            key,
            _result: PhantomData,
        }
    }

    /// The key this reducer owns
    #[must_use]
    pub const fn key(&self) -> ResourceKey {
        self.key
    }
}

impl<T> Clone for FetchReducer<T> {
    fn clone(&self) -> Self {
        Self::new(self.key)
    }
}

impl<T: DeserializeOwned> Reducer for FetchReducer<T> {
    type State = FetchState<T>;
    type Action = ApiAction;
    type Environment = BillingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ApiAction::Start { id, request } if request.key() == self.key => {
                tracing::debug!(key = %self.key, %id, "Operation started");
                state.apply(FetchEvent::Started);

                let mut effects = SmallVec::new();
                if self.key.is_mutation() {
                    // A new mutation supersedes the reset scheduled by the last one
                    effects.push(Effect::Cancel(self.key.reset_effect_id()));
                }
                effects.push(Operation::new(id, request).into_effect(Arc::clone(&env.api)));
                effects
            },
            ApiAction::Settle { id, key, outcome } if key == self.key => {
                tracing::debug!(key = %self.key, %id, ok = outcome.is_ok(), "Operation settled");
                state.settle(outcome);
                SmallVec::new()
            },
            ApiAction::Reset { key } if key == self.key => {
                state.apply(FetchEvent::Reset);
                SmallVec::new()
            },
            ApiAction::ScheduleReset { key, after } if key == self.key => {
                if state.loading {
                    // The outstanding operation's workflow schedules its own reset
                    tracing::debug!(key = %self.key, "Skipped reset of pending entry");
                    return SmallVec::new();
                }
                smallvec![cancellable! {
                    id: key.reset_effect_id(),
                    effect: delay! {
                        duration: after,
                        action: ApiAction::Reset { key }
                    }
                }]
            },
            _ => SmallVec::new(),
        }
    }
}

/// Table-wide actions: reset everything, seed results
#[derive(Clone, Copy, Debug, Default)]
pub struct TableReducer;

impl Reducer for TableReducer {
    type State = ResourceTable;
    type Action = ApiAction;
    type Environment = BillingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ApiAction::ResetAll => *state = ResourceTable::default(),
            ApiAction::Merge(values) => {
                for (key, value) in values {
                    match state.merge(key, value) {
                        Ok(true) => tracing::debug!(%key, "Merged result"),
                        Ok(false) => tracing::debug!(%key, "Skipped merge into pending entry"),
                        Err(error) => tracing::warn!(%key, %error, "Skipped undecodable merge value"),
                    }
                }
            },
            _ => {},
        }
        SmallVec::new()
    }
}

type BillingShared = SharedReducer<ResourceTable, ApiAction, BillingEnvironment>;

fn entry<T>(key: ResourceKey, focus: fn(&mut ResourceTable) -> &mut FetchState<T>) -> BillingShared
where
    T: DeserializeOwned + 'static,
{
    Arc::new(scope_reducer(FetchReducer::<T>::new(key), focus))
}

/// Root reducer over the whole [`ResourceTable`]
#[derive(Clone)]
pub struct BillingReducer {
    inner: CombinedReducer<ResourceTable, ApiAction, BillingEnvironment>,
}

impl BillingReducer {
    /// One scoped [`FetchReducer`] per key plus the [`TableReducer`]
    #[must_use]
    pub fn new() -> Self {
        let inner = combine_reducers(vec![
            entry(ResourceKey::Plans, |t| &mut t.plans),
            entry(ResourceKey::Profile, |t| &mut t.profile),
            entry(ResourceKey::Customer, |t| &mut t.customer),
            entry(ResourceKey::Subscriptions, |t| &mut t.subscriptions),
            entry(ResourceKey::Token, |t| &mut t.token),
            entry(ResourceKey::CreateSubscription, |t| &mut t.create_subscription),
            entry(ResourceKey::CancelSubscription, |t| &mut t.cancel_subscription),
            entry(ResourceKey::ReactivateSubscription, |t| &mut t.reactivate_subscription),
            entry(ResourceKey::UpdatePayment, |t| &mut t.update_payment),
            Arc::new(TableReducer),
        ]);
        Self { inner }
    }
}

impl Default for BillingReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for BillingReducer {
    type State = ResourceTable;
    type Action = ApiAction;
    type Environment = BillingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        self.inner.reduce(state, action, env)
    }
}

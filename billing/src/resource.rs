//! Tracked resources and the table holding their states

use crate::error::ApiError;
use crate::fetch::{FetchState, FetchStatus, decode};
use crate::model::{ActiveSubscription, Customer, Plan, Profile, TokenInfo};
use billing_store_core::effect::EffectId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a tracked resource
///
/// Declaration order is significant: selectors that report a single entry
/// scan keys in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKey {
    /// Purchasable plans
    Plans,
    /// Signed-in user's profile
    Profile,
    /// Billing customer
    Customer,
    /// Active subscriptions
    Subscriptions,
    /// Access token introspection
    Token,
    /// Subscription creation
    CreateSubscription,
    /// Subscription cancellation
    CancelSubscription,
    /// Subscription reactivation
    ReactivateSubscription,
    /// Payment method update
    UpdatePayment,
}

impl ResourceKey {
    /// Every key, in declaration order
    pub const ALL: [Self; 9] = [
        Self::Plans,
        Self::Profile,
        Self::Customer,
        Self::Subscriptions,
        Self::Token,
        Self::CreateSubscription,
        Self::CancelSubscription,
        Self::ReactivateSubscription,
        Self::UpdatePayment,
    ];

    /// Keys whose entries describe a mutation rather than a fetched document
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::CreateSubscription | Self::CancelSubscription | Self::ReactivateSubscription | Self::UpdatePayment
        )
    }

    /// Wire name of the key
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plans => "plans",
            Self::Profile => "profile",
            Self::Customer => "customer",
            Self::Subscriptions => "subscriptions",
            Self::Token => "token",
            Self::CreateSubscription => "createSubscription",
            Self::CancelSubscription => "cancelSubscription",
            Self::ReactivateSubscription => "reactivateSubscription",
            Self::UpdatePayment => "updatePayment",
        }
    }

    /// Check that a successful payload decodes into this key's result type
    ///
    /// Mutation acknowledgements are kept as raw JSON and always pass.
    ///
    /// # Errors
    ///
    /// Returns an `invalid_response` error naming the decode failure.
    pub fn validate(self, value: &serde_json::Value) -> Result<(), ApiError> {
        match self {
            Self::Plans => decode::<Vec<Plan>>(value.clone()).map(drop),
            Self::Profile => decode::<Profile>(value.clone()).map(drop),
            Self::Customer => decode::<Customer>(value.clone()).map(drop),
            Self::Subscriptions => decode::<Vec<ActiveSubscription>>(value.clone()).map(drop),
            Self::Token => decode::<TokenInfo>(value.clone()).map(drop),
            Self::CreateSubscription
            | Self::CancelSubscription
            | Self::ReactivateSubscription
            | Self::UpdatePayment => Ok(()),
        }
    }

    /// Id under which the timed reset of this key is registered
    #[must_use]
    pub fn reset_effect_id(self) -> EffectId {
        EffectId::new(format!("reset:{}", self.as_str()))
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One [`FetchState`] per [`ResourceKey`]
///
/// Every key is a field, so no entry can ever be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTable {
    /// Purchasable plans
    pub plans: FetchState<Vec<Plan>>,
    /// Signed-in user's profile
    pub profile: FetchState<Profile>,
    /// Billing customer
    pub customer: FetchState<Customer>,
    /// Active subscriptions
    pub subscriptions: FetchState<Vec<ActiveSubscription>>,
    /// Access token introspection
    pub token: FetchState<TokenInfo>,
    /// Acknowledgement of the last subscription creation
    pub create_subscription: FetchState<serde_json::Value>,
    /// Acknowledgement of the last cancellation
    pub cancel_subscription: FetchState<serde_json::Value>,
    /// Acknowledgement of the last reactivation
    pub reactivate_subscription: FetchState<serde_json::Value>,
    /// Acknowledgement of the last payment update
    pub update_payment: FetchState<serde_json::Value>,
}

impl ResourceTable {
    /// Payload-free view of one entry
    #[must_use]
    pub fn status(&self, key: ResourceKey) -> FetchStatus<'_> {
        match key {
            ResourceKey::Plans => self.plans.status(),
            ResourceKey::Profile => self.profile.status(),
            ResourceKey::Customer => self.customer.status(),
            ResourceKey::Subscriptions => self.subscriptions.status(),
            ResourceKey::Token => self.token.status(),
            ResourceKey::CreateSubscription => self.create_subscription.status(),
            ResourceKey::CancelSubscription => self.cancel_subscription.status(),
            ResourceKey::ReactivateSubscription => self.reactivate_subscription.status(),
            ResourceKey::UpdatePayment => self.update_payment.status(),
        }
    }

    /// Every entry's status, in key declaration order
    pub fn statuses(&self) -> impl Iterator<Item = (ResourceKey, FetchStatus<'_>)> + '_ {
        ResourceKey::ALL.into_iter().map(move |key| (key, self.status(key)))
    }

    /// Seed one entry's result with a raw JSON value
    ///
    /// See [`FetchState::merge`].
    ///
    /// # Errors
    ///
    /// Returns the decode error when `value` does not match the entry's type.
    pub fn merge(&mut self, key: ResourceKey, value: serde_json::Value) -> Result<bool, ApiError> {
        match key {
            ResourceKey::Plans => self.plans.merge(value),
            ResourceKey::Profile => self.profile.merge(value),
            ResourceKey::Customer => self.customer.merge(value),
            ResourceKey::Subscriptions => self.subscriptions.merge(value),
            ResourceKey::Token => self.token.merge(value),
            ResourceKey::CreateSubscription => self.create_subscription.merge(value),
            ResourceKey::CancelSubscription => self.cancel_subscription.merge(value),
            ResourceKey::ReactivateSubscription => self.reactivate_subscription.merge(value),
            ResourceKey::UpdatePayment => self.update_payment.merge(value),
        }
    }
}

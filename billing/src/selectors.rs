//! Read-only views over a [`ResourceTable`]

use crate::error::ApiError;
use crate::fetch::FetchState;
use crate::model::{ActiveSubscription, Customer, CustomerSubscription, Plan, Profile, TokenInfo};
use crate::resource::{ResourceKey, ResourceTable};
use serde_json::Value;

/// True iff at least one entry has a request outstanding
#[must_use]
pub fn is_loading(table: &ResourceTable) -> bool {
    table.statuses().any(|(_, status)| status.loading)
}

/// First failing entry in key declaration order
///
/// Only one error is ever reported, even when several entries are failing.
#[must_use]
pub fn last_error(table: &ResourceTable) -> Option<(ResourceKey, &ApiError)> {
    table
        .statuses()
        .find_map(|(key, status)| status.error.map(|error| (key, error)))
}

/// Plans belonging to `product_id`
///
/// `None` or an empty id selects every plan. Empty when plans have not
/// been fetched.
#[must_use]
pub fn plans_by_product_id<'a>(table: &'a ResourceTable, product_id: Option<&str>) -> Vec<&'a Plan> {
    let plans = table.plans.result.as_deref().unwrap_or_default();
    match product_id.filter(|id| !id.is_empty()) {
        Some(id) => plans.iter().filter(|plan| plan.product_id == id).collect(),
        None => plans.iter().collect(),
    }
}

/// Subscriptions nested in the customer document, or empty
#[must_use]
pub fn customer_subscriptions(table: &ResourceTable) -> &[CustomerSubscription] {
    table
        .customer
        .result
        .as_ref()
        .and_then(|customer| customer.subscriptions.as_deref())
        .unwrap_or_default()
}

/// Profile entry
#[must_use]
pub const fn profile(table: &ResourceTable) -> &FetchState<Profile> {
    &table.profile
}

/// Token entry
#[must_use]
pub const fn token(table: &ResourceTable) -> &FetchState<TokenInfo> {
    &table.token
}

/// Plans entry
#[must_use]
pub const fn plans(table: &ResourceTable) -> &FetchState<Vec<Plan>> {
    &table.plans
}

/// Customer entry
#[must_use]
pub const fn customer(table: &ResourceTable) -> &FetchState<Customer> {
    &table.customer
}

/// Active subscriptions entry
#[must_use]
pub const fn subscriptions(table: &ResourceTable) -> &FetchState<Vec<ActiveSubscription>> {
    &table.subscriptions
}

/// Subscription creation entry
#[must_use]
pub const fn create_subscription_status(table: &ResourceTable) -> &FetchState<Value> {
    &table.create_subscription
}

/// Cancellation entry
#[must_use]
pub const fn cancel_subscription_status(table: &ResourceTable) -> &FetchState<Value> {
    &table.cancel_subscription
}

/// Reactivation entry
#[must_use]
pub const fn reactivate_subscription_status(table: &ResourceTable) -> &FetchState<Value> {
    &table.reactivate_subscription
}

/// Payment update entry
#[must_use]
pub const fn update_payment_status(table: &ResourceTable) -> &FetchState<Value> {
    &table.update_payment
}

//! Payloads returned by the payments services
//!
//! Field names follow the wire format: plan and customer documents use
//! `snake_case`, profile and subscription references use `camelCase`.

use serde::{Deserialize, Serialize};

/// A purchasable plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan identifier
    pub plan_id: String,
    /// Display name of the plan
    pub plan_name: String,
    /// Product the plan belongs to
    pub product_id: String,
    /// Display name of the product
    pub product_name: String,
    /// ISO currency code
    pub currency: String,
    /// Price in the currency's minor unit
    pub amount: i64,
    /// Billing interval (`month`, `year`, ...)
    pub interval: String,
}

/// Signed-in user's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Account id
    pub uid: String,
    /// Primary email
    pub email: String,
    /// Name chosen by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Preferred locale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Billing customer with its payment method and subscriptions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    /// Payment method kind (`card`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    /// Last four digits of the card on file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last4: Option<String>,
    /// Card expiry month
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_month: Option<u8>,
    /// Card expiry year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_year: Option<u16>,
    /// Absent when the customer has never subscribed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriptions: Option<Vec<CustomerSubscription>>,
}

/// A subscription as listed on the customer document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSubscription {
    /// Subscription identifier
    pub subscription_id: String,
    /// Plan subscribed to
    pub plan_id: String,
    /// Plan nickname
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Provider status (`active`, `past_due`, ...)
    pub status: String,
    /// Unix seconds
    pub current_period_start: i64,
    /// Unix seconds
    pub current_period_end: i64,
    /// True once cancelled and running out the period
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

/// A subscription as listed by the active-subscriptions endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSubscription {
    /// Account id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Subscription identifier
    pub subscription_id: String,
    /// Product subscribed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Unix milliseconds
    pub created_at: i64,
    /// Unix milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
}

/// Result of introspecting the access token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// False for expired or revoked tokens
    pub active: bool,
    /// Space-separated granted scopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// OAuth client the token was issued to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Subject (account id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiry, Unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Parameters for creating a subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionParams {
    /// Token from the payment provider's card form
    pub payment_token: String,
    /// Plan to subscribe to
    pub plan_id: String,
    /// Name shown on the receipt
    pub display_name: String,
}

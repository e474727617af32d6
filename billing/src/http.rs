//! HTTP transport for the payments services

use crate::api::{ApiFuture, PaymentsApi};
use crate::config::{BillingConfig, ServerUrls};
use crate::error::ApiError;
use crate::model::CreateSubscriptionParams;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde_json::{Value, json};

/// [`PaymentsApi`] over HTTP
///
/// Every request carries the access token as a bearer token. Responses with
/// status >= 400 become an [`ApiError`] built from the JSON body when there
/// is one.
#[derive(Clone)]
pub struct HttpPaymentsApi {
    client: Client,
    servers: ServerUrls,
    access_token: String,
}

impl HttpPaymentsApi {
    /// Create a client with explicit server URLs and token
    #[must_use]
    pub fn new(servers: ServerUrls, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            servers,
            access_token: access_token.into(),
        }
    }

    /// Create a client from loaded configuration
    #[must_use]
    pub fn from_config(config: &BillingConfig) -> Self {
        Self::new(config.servers.clone(), config.access_token.clone())
    }

    fn auth(&self, path: &str) -> String {
        format!("{}/v1/oauth/subscriptions/{path}", self.servers.auth_url)
    }

    async fn fetch(&self, method: Method, url: String, body: Option<Value>) -> Result<Value, ApiError> {
        tracing::trace!(%method, %url, "Sending request");

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.access_token)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            // Bodies of failed responses are not guaranteed to be JSON
            let body = response.json::<ApiError>().await.ok();
            tracing::debug!(%url, status = status.as_u16(), "Request failed");
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::invalid_response(e.to_string()))
    }
}

impl PaymentsApi for HttpPaymentsApi {
    fn fetch_profile(&self) -> ApiFuture<'_> {
        let url = format!("{}/v1/profile", self.servers.profile_url);
        Box::pin(self.fetch(Method::GET, url, None))
    }

    fn fetch_plans(&self) -> ApiFuture<'_> {
        Box::pin(self.fetch(Method::GET, self.auth("plans"), None))
    }

    fn fetch_subscriptions(&self) -> ApiFuture<'_> {
        Box::pin(self.fetch(Method::GET, self.auth("active"), None))
    }

    fn fetch_token(&self) -> ApiFuture<'_> {
        let url = format!("{}/v1/introspect", self.servers.oauth_url);
        let body = json!({ "token": self.access_token });
        Box::pin(self.fetch(Method::POST, url, Some(body)))
    }

    fn fetch_customer(&self) -> ApiFuture<'_> {
        Box::pin(self.fetch(Method::GET, self.auth("customer"), None))
    }

    fn create_subscription(&self, params: CreateSubscriptionParams) -> ApiFuture<'_> {
        Box::pin(async move {
            let body = serde_json::to_value(&params).map_err(|e| ApiError::invalid_response(e.to_string()))?;
            self.fetch(Method::POST, self.auth("active"), Some(body)).await
        })
    }

    fn cancel_subscription(&self, subscription_id: String) -> ApiFuture<'_> {
        Box::pin(self.fetch(Method::DELETE, self.auth(&format!("active/{subscription_id}")), None))
    }

    fn reactivate_subscription(&self, subscription_id: String) -> ApiFuture<'_> {
        let body = json!({ "subscriptionId": subscription_id });
        Box::pin(self.fetch(Method::POST, self.auth("reactivate"), Some(body)))
    }

    fn update_payment(&self, payment_token: String) -> ApiFuture<'_> {
        let body = json!({ "paymentToken": payment_token });
        Box::pin(self.fetch(Method::POST, self.auth("updatePayment"), Some(body)))
    }
}

//! Billing store binary
//!
//! Loads the product page resources against the configured services and
//! prints the resulting table.

use anyhow::Context;
use billing_store::{BillingConfig, BillingEnvironment, HttpPaymentsApi, Orchestrator, build_store, selectors};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "billing_store=debug,billing_store_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BillingConfig::load().context("loading configuration")?;
    tracing::info!(auth_url = %config.servers.auth_url, "Starting billing store");

    let env = BillingEnvironment::new(Arc::new(HttpPaymentsApi::from_config(&config)));
    let store = build_store(env, config.store_config());
    let orchestrator = Orchestrator::new(store.clone(), config.workflow_config());

    orchestrator.fetch_product_route_resources().await;

    let (table, loading, failed) = store
        .state(|t| {
            (
                t.clone(),
                selectors::is_loading(t),
                selectors::last_error(t).map(|(key, error)| (key, error.clone())),
            )
        })
        .await;

    println!("{}", serde_json::to_string_pretty(&table).context("serializing table")?);
    println!("loading: {loading}");
    if let Some((key, error)) = failed {
        println!("first error: {key}: {error}");
    }

    store
        .shutdown(store.default_shutdown_timeout())
        .await
        .context("shutting down store")?;

    Ok(())
}

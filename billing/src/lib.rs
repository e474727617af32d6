//! # Billing Store
//!
//! Tracks the lifecycle of requests made by a subscription billing client
//! (profile, plans, subscriptions, token, customer and the mutations that
//! change them) and runs the multi-step workflows that combine them.
//!
//! - [`resource::ResourceTable`] holds one [`fetch::FetchState`] per [`resource::ResourceKey`]
//! - [`reducer::BillingReducer`] applies lifecycle, reset and merge actions
//! - [`orchestrator::Orchestrator`] runs workflows; they never fail
//! - [`selectors`] derive aggregate views
//!
//! ## Example
//!
//! ```ignore
//! use billing_store::{build_store, BillingEnvironment, HttpPaymentsApi, Orchestrator, selectors};
//!
//! let config = BillingConfig::from_env()?;
//! let env = BillingEnvironment::new(Arc::new(HttpPaymentsApi::from_config(&config)));
//! let store = build_store(env, config.store_config());
//! let orchestrator = Orchestrator::new(store.clone(), config.workflow_config());
//!
//! orchestrator.fetch_product_route_resources().await;
//! let failed = store.state(|t| selectors::last_error(t).map(|(key, _)| key)).await;
//! ```

pub mod action;
pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod mocks;
pub mod model;
pub mod operation;
pub mod orchestrator;
pub mod reducer;
pub mod resource;
pub mod selectors;
pub mod store;

pub use action::ApiAction;
pub use api::{BillingEnvironment, PaymentsApi};
pub use config::BillingConfig;
pub use error::{ApiError, ConfigError, WorkflowError};
pub use fetch::{FetchEvent, FetchPhase, FetchState};
pub use http::HttpPaymentsApi;
pub use operation::{ApiRequest, Operation, OperationId};
pub use orchestrator::{Orchestrator, WorkflowConfig};
pub use reducer::BillingReducer;
pub use resource::{ResourceKey, ResourceTable};
pub use store::{BillingStore, build_store, build_store_with_state};

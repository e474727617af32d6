//! Store construction

use crate::action::ApiAction;
use crate::api::BillingEnvironment;
use crate::reducer::BillingReducer;
use crate::resource::ResourceTable;
use billing_store_runtime::{Store, StoreConfig};

/// The billing store: a [`ResourceTable`] driven by the [`BillingReducer`]
pub type BillingStore = Store<ResourceTable, ApiAction, BillingEnvironment, BillingReducer>;

/// Store with every entry idle
#[must_use]
pub fn build_store(environment: BillingEnvironment, config: StoreConfig) -> BillingStore {
    build_store_with_state(ResourceTable::default(), environment, config)
}

/// Store seeded with an existing table
#[must_use]
pub fn build_store_with_state(
    table: ResourceTable,
    environment: BillingEnvironment,
    config: StoreConfig,
) -> BillingStore {
    Store::with_config(table, BillingReducer::new(), environment, config)
}

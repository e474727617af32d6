//! Actions accepted by the billing reducer

use crate::error::ApiError;
use crate::operation::{ApiRequest, OperationId};
use crate::resource::ResourceKey;
use std::collections::BTreeMap;
use std::time::Duration;

/// Every input the billing reducer understands
///
/// Lifecycle events carry their [`ResourceKey`] (directly or through the
/// request), so dispatch is a plain `match`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiAction {
    /// Mark the request's entry pending and issue the request
    Start {
        /// Correlation id of the operation
        id: OperationId,
        /// The call to issue
        request: ApiRequest,
    },

    /// Record how a request ended
    Settle {
        /// Correlation id of the operation
        id: OperationId,
        /// Entry the outcome is recorded in
        key: ResourceKey,
        /// Raw JSON body or the failure
        outcome: Result<serde_json::Value, ApiError>,
    },

    /// Return one entry to idle
    Reset {
        /// Entry to reset
        key: ResourceKey,
    },

    /// Reset one entry after a delay
    ///
    /// Superseded by the next `Start` on the same key.
    ScheduleReset {
        /// Entry to reset
        key: ResourceKey,
        /// Delay before the reset
        after: Duration,
    },

    /// Return every entry to idle
    ResetAll,

    /// Seed results fetched elsewhere
    Merge(BTreeMap<ResourceKey, serde_json::Value>),
}

impl ApiAction {
    /// Key this action targets, if it targets exactly one
    #[must_use]
    pub const fn key(&self) -> Option<ResourceKey> {
        match self {
            Self::Start { request, .. } => Some(request.key()),
            Self::Settle { key, .. } | Self::Reset { key } | Self::ScheduleReset { key, .. } => Some(*key),
            Self::ResetAll | Self::Merge(_) => None,
        }
    }

    /// True if this is the settlement of operation `id`
    #[must_use]
    pub fn is_settlement_of(&self, id: OperationId) -> bool {
        matches!(self, Self::Settle { id: settled, .. } if *settled == id)
    }
}

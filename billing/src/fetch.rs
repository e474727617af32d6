//! Lifecycle state of one tracked request

use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// State of one outstanding or completed request
///
/// At most one of `loading`, `result` and `error` is set. The all-empty
/// value is the idle state every entry starts in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchState<T> {
    /// True only while a request for this entry is outstanding
    pub loading: bool,
    /// Last successfully produced value
    pub result: Option<T>,
    /// Last failure
    pub error: Option<ApiError>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            result: None,
            error: None,
        }
    }
}

/// Lifecycle events applied to a [`FetchState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent<T> {
    /// A request was issued
    Started,
    /// The request produced a value
    Succeeded(T),
    /// The request failed
    Failed(ApiError),
    /// Return to idle
    Reset,
}

/// Coarse phase of an entry, derived from its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchPhase {
    /// Never started, or reset
    Idle,
    /// Request outstanding
    Pending,
    /// Holds a result
    Fulfilled,
    /// Holds an error
    Rejected,
}

impl<T> FetchState<T> {
    /// Entry with a request outstanding
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            loading: true,
            result: None,
            error: None,
        }
    }

    /// Entry holding a result
    #[must_use]
    pub const fn fulfilled(value: T) -> Self {
        Self {
            loading: false,
            result: Some(value),
            error: None,
        }
    }

    /// Entry holding an error
    #[must_use]
    pub const fn rejected(error: ApiError) -> Self {
        Self {
            loading: false,
            result: None,
            error: Some(error),
        }
    }

    /// Apply a lifecycle event, replacing the whole entry
    pub fn apply(&mut self, event: FetchEvent<T>) {
        *self = match event {
            FetchEvent::Started => Self::pending(),
            FetchEvent::Succeeded(value) => Self::fulfilled(value),
            FetchEvent::Failed(error) => Self::rejected(error),
            FetchEvent::Reset => Self::default(),
        };
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> FetchPhase {
        match (self.loading, &self.result, &self.error) {
            (true, _, _) => FetchPhase::Pending,
            (false, Some(_), _) => FetchPhase::Fulfilled,
            (false, None, Some(_)) => FetchPhase::Rejected,
            (false, None, None) => FetchPhase::Idle,
        }
    }

    /// Type-erased view used by selectors that span every entry
    #[must_use]
    pub fn status(&self) -> FetchStatus<'_> {
        FetchStatus {
            loading: self.loading,
            has_result: self.result.is_some(),
            error: self.error.as_ref(),
        }
    }
}

impl<T: DeserializeOwned> FetchState<T> {
    /// Record a settled request whose payload is raw JSON
    ///
    /// A payload that does not decode into `T` is recorded as a failure.
    /// Operations validate payloads before settling, so this only happens
    /// for settlements built by hand.
    pub fn settle(&mut self, outcome: Result<serde_json::Value, ApiError>) {
        let event = match outcome.and_then(decode::<T>) {
            Ok(value) => FetchEvent::Succeeded(value),
            Err(error) => FetchEvent::Failed(error),
        };
        self.apply(event);
    }

    /// Seed the result from data fetched elsewhere
    ///
    /// Leaves `loading` untouched. Entries with a request outstanding are
    /// skipped since the request will overwrite them anyway.
    ///
    /// # Errors
    ///
    /// Returns the decode error when `value` does not match `T`; the entry is
    /// left unchanged.
    pub fn merge(&mut self, value: serde_json::Value) -> Result<bool, ApiError> {
        if self.loading {
            return Ok(false);
        }
        self.result = Some(decode(value)?);
        self.error = None;
        Ok(true)
    }
}

/// Borrowed, payload-free view of a [`FetchState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchStatus<'a> {
    /// A request is outstanding
    pub loading: bool,
    /// A result is held
    pub has_result: bool,
    /// Failure held by the entry
    pub error: Option<&'a ApiError>,
}

/// Decode a JSON payload into a result type
///
/// # Errors
///
/// Returns an `invalid_response` error naming the decode failure.
pub fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::invalid_response(e.to_string()))
}

//! Error types for the billing store

use billing_store_runtime::StoreError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Structured failure reported by the payments services
///
/// Mirrors the JSON error body the services return; every field is optional
/// because bodies of failed responses are not guaranteed to be JSON at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiError {
    /// Machine-readable error code
    ///
    /// Some services send it as a number; it is kept in its decimal form.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "code_from_text_or_number")]
    pub code: Option<String>,
    /// HTTP status code of the failed response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Service-specific error number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errno: Option<i64>,
    /// Short error name (e.g. `Bad Request`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Link or extra detail supplied by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl ApiError {
    /// Error carrying only a code
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    /// Error for a response with status >= 400
    ///
    /// Fields come from the parsed body when there is one. The status code
    /// is always set, falling back to the HTTP status when the body omits it.
    #[must_use]
    pub fn from_status(status: u16, body: Option<Self>) -> Self {
        let mut error = body.unwrap_or_default();
        error.status_code = error.status_code.or(Some(status));
        error
    }

    /// Error for a request that never produced a response
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new("network_error")
        }
    }

    /// Error for a successful response whose body has the wrong shape
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new("invalid_response")
        }
    }

    /// Attach a message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CodeRepr {
    Text(String),
    Number(serde_json::Number),
}

fn code_from_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<CodeRepr>::deserialize(deserializer)?.map(|code| match code {
        CodeRepr::Text(text) => text,
        CodeRepr::Number(number) => number.to_string(),
    }))
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error {}", self.code.as_deref().unwrap_or("unknown"))?;
        if let Some(status) = self.status_code {
            write!(f, " (status {status})")?;
        }
        if let Some(message) = self.message.as_deref().or(self.error.as_deref()) {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Failure of a single step inside a workflow
///
/// Never escapes a public workflow; it is logged and dropped at the boundary.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// The operation settled with an error (already recorded in the table)
    #[error("operation failed: {0}")]
    Api(#[from] ApiError),

    /// The store rejected the action or the settlement never arrived
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Invalid configuration value
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed
    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
        /// Parser message
        reason: String,
    },

    /// A dotenv file could not be read or parsed
    #[error("cannot load {path}: {reason}")]
    EnvFile {
        /// File path
        path: String,
        /// Loader message
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_prefers_body_fields() {
        let body: ApiError = serde_json::from_str(
            r#"{"code":"card_declined","errno":181,"error":"Bad Request","message":"Card declined"}"#,
        )
        .unwrap_or_default();

        let error = ApiError::from_status(400, Some(body));

        assert_eq!(error.code.as_deref(), Some("card_declined"));
        assert_eq!(error.errno, Some(181));
        assert_eq!(error.status_code, Some(400));
    }

    #[test]
    fn test_numeric_code_keeps_the_rest_of_the_body() {
        let body: Result<ApiError, _> = serde_json::from_str(
            r#"{"code":400,"errno":107,"error":"Bad Request","message":"Invalid parameter"}"#,
        );

        let error = body.unwrap_or_default();
        assert_eq!(error.code.as_deref(), Some("400"));
        assert_eq!(error.errno, Some(107));
        assert_eq!(error.error.as_deref(), Some("Bad Request"));
        assert_eq!(error.message.as_deref(), Some("Invalid parameter"));
    }

    #[test]
    fn test_null_code_is_absent() {
        let error: ApiError = serde_json::from_str(r#"{"code":null,"errno":1}"#).unwrap_or_default();
        assert_eq!(error.code, None);
        assert_eq!(error.errno, Some(1));
    }

    #[test]
    fn test_from_status_without_body_keeps_status() {
        let error = ApiError::from_status(502, None);
        assert_eq!(error.status_code, Some(502));
        assert_eq!(error.code, None);
    }

    #[test]
    fn test_display_includes_available_parts() {
        let error = ApiError::from_status(404, Some(ApiError::new("not_found").with_message("no such customer")));
        assert_eq!(error.to_string(), "API error not_found (status 404): no such customer");
        assert_eq!(ApiError::default().to_string(), "API error unknown");
    }

    #[test]
    fn test_serializes_camel_case_and_skips_missing() {
        let error = ApiError::from_status(500, Some(ApiError::new("boom")));
        let json = serde_json::to_value(&error).unwrap_or_default();
        assert_eq!(json, serde_json::json!({ "code": "boom", "statusCode": 500 }));
    }
}

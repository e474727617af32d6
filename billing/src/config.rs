//! Configuration management for the billing store.
//!
//! Loads configuration from environment variables with sensible defaults.
//! A `.env` file fills in variables the environment does not set.

use crate::error::ConfigError;
use crate::orchestrator::WorkflowConfig;
use billing_store_runtime::StoreConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Base URLs of the payments services
    pub servers: ServerUrls,
    /// Bearer token sent with every request
    pub access_token: String,
    /// Workflow timing
    pub workflow: WorkflowSettings,
    /// Store runtime tuning
    pub store: StoreSettings,
}

/// Base URLs of the services the transport talks to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerUrls {
    /// Subscriptions and customer endpoints
    pub auth_url: String,
    /// Token introspection
    pub oauth_url: String,
    /// Profile endpoint
    pub profile_url: String,
}

impl Default for ServerUrls {
    fn default() -> Self {
        Self {
            auth_url: "http://127.0.0.1:9000".to_string(),
            oauth_url: "http://127.0.0.1:9010".to_string(),
            profile_url: "http://127.0.0.1:1111".to_string(),
        }
    }
}

/// Workflow timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSettings {
    /// Delay before a mutation's entry is reset (default: 2000)
    pub reset_delay_ms: u64,
    /// How long a workflow waits for one operation to settle (default: 30)
    pub settle_timeout_secs: u64,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            reset_delay_ms: 2000,
            settle_timeout_secs: 30,
        }
    }
}

/// Store runtime tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Capacity of the action broadcast channel (default: 64)
    pub broadcast_capacity: usize,
    /// Graceful shutdown timeout in seconds (default: 5)
    pub shutdown_timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            broadcast_capacity: 64,
            shutdown_timeout_secs: 5,
        }
    }
}

impl BillingConfig {
    /// Load `.env` from the working directory when there is one, then the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvFile`] if `.env` exists but cannot be read,
    /// or [`ConfigError::Invalid`] for a malformed numeric variable.
    pub fn load() -> Result<Self, ConfigError> {
        let dotenv = Path::new(".env");
        if dotenv.is_file() {
            Self::from_env_file(dotenv)
        } else {
            Self::from_env()
        }
    }

    /// Load configuration from a dotenv file and the environment.
    ///
    /// Variables set in the environment take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvFile`] if the file cannot be read or parsed,
    /// or [`ConfigError::Invalid`] for a malformed numeric variable.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        let env_file_error = |e: dotenvy::Error| ConfigError::EnvFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        let file: HashMap<String, String> = dotenvy::from_path_iter(path)
            .map_err(env_file_error)?
            .collect::<Result<_, _>>()
            .map_err(env_file_error)?;

        Self::from_lookup(|name| std::env::var(name).ok().or_else(|| file.get(name).cloned()))
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable is set but
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable is set but
    /// does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let servers = ServerUrls::default();
        let workflow = WorkflowSettings::default();
        let store = StoreSettings::default();

        Ok(Self {
            servers: ServerUrls {
                auth_url: lookup("BILLING_AUTH_URL").unwrap_or(servers.auth_url),
                oauth_url: lookup("BILLING_OAUTH_URL").unwrap_or(servers.oauth_url),
                profile_url: lookup("BILLING_PROFILE_URL").unwrap_or(servers.profile_url),
            },
            access_token: lookup("BILLING_ACCESS_TOKEN").unwrap_or_default(),
            workflow: WorkflowSettings {
                reset_delay_ms: parse(&lookup, "BILLING_RESET_DELAY_MS", workflow.reset_delay_ms)?,
                settle_timeout_secs: parse(&lookup, "BILLING_SETTLE_TIMEOUT_SECS", workflow.settle_timeout_secs)?,
            },
            store: StoreSettings {
                broadcast_capacity: parse(&lookup, "BILLING_BROADCAST_CAPACITY", store.broadcast_capacity)?,
                shutdown_timeout_secs: parse(&lookup, "BILLING_SHUTDOWN_TIMEOUT_SECS", store.shutdown_timeout_secs)?,
            },
        })
    }

    /// Timing handed to the orchestrator
    #[must_use]
    pub const fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            reset_delay: Duration::from_millis(self.workflow.reset_delay_ms),
            settle_timeout: Duration::from_secs(self.workflow.settle_timeout_secs),
        }
    }

    /// Settings handed to the store runtime
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(
            self.store.broadcast_capacity,
            Duration::from_secs(self.store.shutdown_timeout_secs),
        )
    }
}

fn parse<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}

//! # Billing Store Testing
//!
//! Testing utilities and helpers for the billing store.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//! - Helpers for observing a running [`Store`](billing_store_runtime::Store)
//!
//! ## Example
//!
//! ```ignore
//! use billing_store_testing::helpers::wait_for_state;
//!
//! #[tokio::test]
//! async fn test_reset_after_delay() {
//!     let store = build_store(env, config);
//!     orchestrator.update_payment("tok_123").await;
//!
//!     let reset = wait_for_state(&store, |t| t.update_payment.result.is_none(), Duration::from_secs(1)).await;
//!     assert!(reset);
//! }
//! ```

/// Reducer test harness
pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Helpers for tests that drive a live store
pub mod helpers {
    use billing_store_core::reducer::Reducer;
    use billing_store_runtime::Store;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Poll a store until `predicate` holds for its state
    ///
    /// Returns `false` if the timeout elapses first.
    pub async fn wait_for_state<S, A, E, R, F>(store: &Store<S, A, E, R>, predicate: F, timeout: Duration) -> bool
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
        F: Fn(&S) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            if store.state(&predicate).await {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Install a test subscriber that honours `RUST_LOG`
    ///
    /// Safe to call from every test; only the first call installs anything.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

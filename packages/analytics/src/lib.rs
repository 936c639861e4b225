#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Temporal aggregation engine for violation statistics.
//!
//! Each public function in [`tools`] corresponds to a query operation that
//! the AI agent and the dashboard data hooks can invoke. Functions accept
//! structured parameter types, read from a [`ViolationStore`] snapshot, and
//! return typed results. The pure aggregation cores live in [`aggregate`].
//!
//! [`ViolationStore`]: violation_map_store::ViolationStore

pub mod aggregate;
pub mod tools;

use thiserror::Error;

/// Errors that can occur during aggregation operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The underlying record store failed.
    #[error("Store error: {0}")]
    Store(#[from] violation_map_store::StoreError),

    /// Malformed or out-of-range caller input. Surfaced with the offending
    /// field named; never retried.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The parameter that failed validation.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

/// Engine-level configuration resolved once at startup.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Whether the one-day client-date correction is applied to
    /// browser-originated ranges. Disabled in local development, where
    /// client and server share a clock.
    pub client_skew_enabled: bool,
}

impl EngineConfig {
    /// Creates a config with the given client-skew setting.
    #[must_use]
    pub const fn new(client_skew_enabled: bool) -> Self {
        Self {
            client_skew_enabled,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(true)
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Violation record store seam.
//!
//! The aggregation engine consumes records through the [`ViolationStore`]
//! trait so the persistence layer stays swappable. The provided
//! [`MemoryStore`] keeps records date-sorted in memory and is seeded from a
//! CSV export of the detection pipeline; live insertion is handled outside
//! this system.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use violation_map_temporal::TimeWindow;
use violation_map_violation_models::ViolationRecord;

/// Errors that can occur while reading from a violation store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse failure while seeding.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record could not be converted to the canonical shape.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Read-only query primitives over the violation record collection.
///
/// Absence of matching data is never an error: implementations return
/// empty vectors and zero counts. Range filters are inclusive at both
/// ends.
#[async_trait]
pub trait ViolationStore: Send + Sync {
    /// Returns every stored record, date-ascending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    async fn fetch_all(&self) -> Result<Vec<ViolationRecord>, StoreError>;

    /// Returns the records whose `date` falls inside `window`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    async fn fetch_range(&self, window: TimeWindow) -> Result<Vec<ViolationRecord>, StoreError>;

    /// Counts the records whose `date` falls inside `window`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    async fn count_range(&self, window: TimeWindow) -> Result<u64, StoreError>;
}

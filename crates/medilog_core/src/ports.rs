//! crates/medilog_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases.

use async_trait::async_trait;

use crate::domain::{MedicalRecord, RecordDraft};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all store operations.
/// This abstracts away the specific errors from the underlying storage engine.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The persistence contract for medication records.
///
/// Implemented once per storage engine; every implementation must present the
/// same observable behavior so the backends stay interchangeable.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every record, ordered by `start_date` descending
    /// (ties broken by `id` descending). Unbounded, no pagination.
    async fn list_all(&self) -> StoreResult<Vec<MedicalRecord>>;

    /// Fetches a single record by id.
    async fn get_by_id(&self, id: i64) -> StoreResult<MedicalRecord>;

    /// Inserts a new record, assigning its id and both timestamps.
    /// Returns the full stored row.
    async fn insert(&self, draft: RecordDraft) -> StoreResult<MedicalRecord>;

    /// Replaces all six user fields of an existing record and re-sets
    /// `updated_at`. Returns the full updated row.
    async fn update(&self, id: i64, draft: RecordDraft) -> StoreResult<MedicalRecord>;

    /// Deletes a record. `NotFound` if no row matched.
    async fn delete(&self, id: i64) -> StoreResult<()>;

    /// Case-insensitive substring search over `medicine`, `dosage`,
    /// `condition`, and the ISO text rendering of `start_date`,
    /// ordered like `list_all`.
    async fn search_by_term(&self, term: &str) -> StoreResult<Vec<MedicalRecord>>;

    /// Liveness probe for the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}

//! The `RecordStore` trait - everything the engine asks of the backing store.
//!
//! The store owns the record query, its paging cursor, and all metadata
//! endpoints. The engine never persists anything itself; it issues
//! single-field updates and re-reads.

use crate::error::Result;
use crate::types::{
    CurrentStage, Dataset, OptionValue, RecordId, RecordUpdate, StageDef,
};
use async_trait::async_trait;
use std::collections::HashSet;

/// Backing record store collaborator.
///
/// Every method is a suspension point; none may block the caller's event
/// loop. Implementations are expected to be cheap to share behind an `Arc`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Snapshot of the current record query: displayed columns, loaded
    /// records, and whether a further page is available.
    async fn dataset(&self) -> Result<Dataset>;

    /// Advance the paging cursor by one page.
    async fn load_next_page(&self) -> Result<()>;

    /// Option values (key, label, display order) for the given categorical
    /// fields, scoped to the entity type.
    async fn fetch_options(&self, entity: &str, fields: &[String]) -> Result<Vec<OptionValue>>;

    /// Keys of the options flagged active in a status-style field's state
    /// metadata.
    async fn fetch_active_states(&self, entity: &str, field: &str) -> Result<HashSet<String>>;

    /// Stage definitions of every business process flow attached to the
    /// entity type.
    async fn fetch_process_stages(&self, entity: &str) -> Result<Vec<StageDef>>;

    /// Resolve the current stage of each requested record within one
    /// process, via the process's instance-stage join.
    async fn fetch_current_stage(
        &self,
        entity: &str,
        process: &str,
        record_ids: &[RecordId],
    ) -> Result<Vec<CurrentStage>>;

    /// Persist a single-field update.
    async fn update_record(&self, update: &RecordUpdate) -> Result<()>;

    /// Re-issue the current record query and its next-page continuation.
    async fn refresh(&self) -> Result<()>;
}

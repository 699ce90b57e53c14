//! In-memory `RecordStore` used by tests and examples.
//!
//! Scripted pages, metadata tables, per-endpoint failure toggles, and a
//! recorded-update log so tests can assert exactly what the engine asked
//! the store to do.

use crate::error::{Result, StoreError};
use crate::types::{
    ColumnSpec, CurrentStage, Dataset, OptionValue, Record, RecordId, RecordUpdate, StageDef,
};
use crate::RecordStore;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    entity: String,
    columns: Vec<ColumnSpec>,
    loaded: Vec<Record>,
    pending_pages: Vec<Vec<Record>>,
    refreshed: Option<Vec<Record>>,

    options: Vec<OptionValue>,
    active_states: HashMap<String, HashSet<String>>,
    stages: Vec<StageDef>,
    current_stages: Vec<CurrentStage>,

    fail_options: bool,
    fail_active_states: bool,
    fail_stages: bool,
    fail_current_stage: bool,
    fail_update: bool,

    updates: Vec<RecordUpdate>,
    refresh_count: usize,
    page_loads: usize,
}

/// In-memory store double.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store for the given entity type
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entity: entity.into(),
                ..Inner::default()
            }),
        }
    }

    /// Set the displayed dataset columns
    pub fn with_columns(self, columns: Vec<ColumnSpec>) -> Self {
        self.inner.lock().unwrap().columns = columns;
        self
    }

    /// Set the records of the already-loaded first page
    pub fn with_records(self, records: Vec<Record>) -> Self {
        self.inner.lock().unwrap().loaded = records;
        self
    }

    /// Queue a further page behind the paging cursor
    pub fn with_next_page(self, records: Vec<Record>) -> Self {
        self.inner.lock().unwrap().pending_pages.push(records);
        self
    }

    /// Replace the loaded records on the next `refresh` call (ground truth
    /// after a persisted move)
    pub fn with_refreshed_records(self, records: Vec<Record>) -> Self {
        self.inner.lock().unwrap().refreshed = Some(records);
        self
    }

    /// Seed option values for categorical fields
    pub fn with_options(self, options: Vec<OptionValue>) -> Self {
        self.inner.lock().unwrap().options = options;
        self
    }

    /// Seed the active-state keys of a status-style field
    pub fn with_active_states(self, field: impl Into<String>, keys: HashSet<String>) -> Self {
        self.inner
            .lock()
            .unwrap()
            .active_states
            .insert(field.into(), keys);
        self
    }

    /// Seed process stage definitions
    pub fn with_stages(self, stages: Vec<StageDef>) -> Self {
        self.inner.lock().unwrap().stages = stages;
        self
    }

    /// Seed current-stage rows returned by the instance-stage join
    pub fn with_current_stages(self, current: Vec<CurrentStage>) -> Self {
        self.inner.lock().unwrap().current_stages = current;
        self
    }

    /// Make `fetch_options` fail
    pub fn failing_options(self) -> Self {
        self.inner.lock().unwrap().fail_options = true;
        self
    }

    /// Make `fetch_active_states` fail
    pub fn failing_active_states(self) -> Self {
        self.inner.lock().unwrap().fail_active_states = true;
        self
    }

    /// Make `fetch_process_stages` fail
    pub fn failing_stages(self) -> Self {
        self.inner.lock().unwrap().fail_stages = true;
        self
    }

    /// Make `fetch_current_stage` fail
    pub fn failing_current_stage(self) -> Self {
        self.inner.lock().unwrap().fail_current_stage = true;
        self
    }

    /// Make `update_record` fail
    pub fn failing_update(self) -> Self {
        self.inner.lock().unwrap().fail_update = true;
        self
    }

    /// Updates issued so far, in order
    pub fn updates(&self) -> Vec<RecordUpdate> {
        self.inner.lock().unwrap().updates.clone()
    }

    /// Number of `refresh` calls so far
    pub fn refresh_count(&self) -> usize {
        self.inner.lock().unwrap().refresh_count
    }

    /// Number of `load_next_page` calls so far
    pub fn page_loads(&self) -> usize {
        self.inner.lock().unwrap().page_loads
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn dataset(&self) -> Result<Dataset> {
        let inner = self.inner.lock().unwrap();
        Ok(Dataset {
            entity: inner.entity.clone(),
            columns: inner.columns.clone(),
            records: inner.loaded.clone(),
            has_next_page: !inner.pending_pages.is_empty(),
        })
    }

    async fn load_next_page(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.page_loads += 1;
        if inner.pending_pages.is_empty() {
            return Err(StoreError::NoMorePages);
        }
        let page = inner.pending_pages.remove(0);
        inner.loaded.extend(page);
        Ok(())
    }

    async fn fetch_options(&self, _entity: &str, fields: &[String]) -> Result<Vec<OptionValue>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_options {
            return Err(StoreError::fetch("option metadata unavailable"));
        }
        Ok(inner
            .options
            .iter()
            .filter(|o| fields.iter().any(|f| f == &o.field))
            .cloned()
            .collect())
    }

    async fn fetch_active_states(&self, _entity: &str, field: &str) -> Result<HashSet<String>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_active_states {
            return Err(StoreError::fetch("state metadata unavailable"));
        }
        Ok(inner.active_states.get(field).cloned().unwrap_or_default())
    }

    async fn fetch_process_stages(&self, _entity: &str) -> Result<Vec<StageDef>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_stages {
            return Err(StoreError::fetch("process metadata unavailable"));
        }
        Ok(inner.stages.clone())
    }

    async fn fetch_current_stage(
        &self,
        _entity: &str,
        _process: &str,
        record_ids: &[RecordId],
    ) -> Result<Vec<CurrentStage>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_current_stage {
            return Err(StoreError::fetch("instance-stage join unavailable"));
        }
        Ok(inner
            .current_stages
            .iter()
            .filter(|c| record_ids.contains(&c.record_id))
            .cloned()
            .collect())
    }

    async fn update_record(&self, update: &RecordUpdate) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.updates.push(update.clone());
        if inner.fail_update {
            return Err(StoreError::update(
                update.record_id.as_str(),
                "write rejected",
            ));
        }
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.refresh_count += 1;
        if let Some(records) = inner.refreshed.take() {
            inner.loaded = records;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnKind, FieldValue};

    fn record(id: &str) -> Record {
        Record::new(id, "task").with_field("title", FieldValue::text(format!("Task {}", id)))
    }

    #[tokio::test]
    async fn test_paging() {
        let store = MemoryStore::new("task")
            .with_records(vec![record("a")])
            .with_next_page(vec![record("b"), record("c")]);

        let page = store.dataset().await.unwrap();
        assert_eq!(page.records.len(), 1);
        assert!(page.has_next_page);

        store.load_next_page().await.unwrap();
        let page = store.dataset().await.unwrap();
        assert_eq!(page.records.len(), 3);
        assert!(!page.has_next_page);
        assert_eq!(store.page_loads(), 1);

        let result = store.load_next_page().await;
        assert!(matches!(result, Err(StoreError::NoMorePages)));
    }

    #[tokio::test]
    async fn test_option_fetch_is_scoped_to_fields() {
        let store = MemoryStore::new("task").with_options(vec![
            OptionValue {
                field: "status".into(),
                key: "1".into(),
                label: "Todo".into(),
                order: 0,
            },
            OptionValue {
                field: "priority".into(),
                key: "10".into(),
                label: "High".into(),
                order: 0,
            },
        ]);

        let options = store
            .fetch_options("task", &["status".to_string()])
            .await
            .unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].label, "Todo");
    }

    #[tokio::test]
    async fn test_failed_update_is_still_recorded() {
        let store = MemoryStore::new("task").failing_update();
        let update = RecordUpdate {
            entity_set: "tasks".into(),
            record_id: RecordId::from_string("a"),
            field: "status".into(),
            value: Some("Done".into()),
        };

        assert!(store.update_record(&update).await.is_err());
        assert_eq!(store.updates().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_swaps_in_ground_truth() {
        let store = MemoryStore::new("task")
            .with_records(vec![record("a")])
            .with_refreshed_records(vec![record("a"), record("b")]);

        store.refresh().await.unwrap();
        assert_eq!(store.refresh_count(), 1);
        let page = store.dataset().await.unwrap();
        assert_eq!(page.records.len(), 2);
    }

    #[tokio::test]
    async fn test_columns_round_trip() {
        let store = MemoryStore::new("task").with_columns(vec![ColumnSpec::new(
            "title",
            "Title",
            ColumnKind::Text,
        )]);
        let page = store.dataset().await.unwrap();
        assert_eq!(page.columns.len(), 1);
        assert_eq!(page.entity, "task");
    }
}

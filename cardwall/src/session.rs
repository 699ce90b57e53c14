//! The board session: one board instance's state and orchestration.
//!
//! A session is constructed once per board from an explicit store client
//! and a parsed configuration - there are no global singletons and no
//! ambient flags. All mutable board state lives here and is only touched
//! through `&mut self` methods on one logical task; store calls are the
//! only suspension points.

use crate::catalog::{self, Catalog};
use crate::columns as column_builder;
use crate::config::BoardOptions;
use crate::error::{BoardError, Result};
use crate::filter::{self, FilterState, SearchDebouncer, SortConfig};
use crate::project::{self, Projection};
use crate::reconcile::{
    splice, write_value, DragPhase, DragState, DropTarget, MoveContext, MoveGuard, MoveOutcome,
    MoveVerdict,
};
use crate::types::{
    Aggregate, CardItem, ColumnItem, ViewDefinition, UNALLOCATED_COLUMN, UNALLOCATED_TITLE,
};
use cardwall_store::{entity_set_name, Dataset, RecordId, RecordStore, RecordUpdate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::Instant;

/// Severity of a surfaced notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A transient, user-facing message (persistence failures, veto reasons,
/// degraded configuration). Never blocks interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// One board instance.
pub struct BoardSession {
    store: Arc<dyn RecordStore>,
    options: BoardOptions,
    guard: Option<Arc<dyn MoveGuard>>,

    dataset: Option<Dataset>,
    views: Vec<ViewDefinition>,
    active_view: Option<String>,
    current_stages: HashMap<RecordId, String>,

    projection: Projection,
    columns: Vec<ColumnItem>,

    filters: FilterState,
    debouncer: SearchDebouncer,
    drag: DragState,

    loading: bool,
    notifications: Vec<Notification>,
}

impl BoardSession {
    /// Create a session over an explicit store client.
    pub fn new(store: Arc<dyn RecordStore>, options: BoardOptions) -> Self {
        Self {
            store,
            options,
            guard: None,
            dataset: None,
            views: Vec::new(),
            active_view: None,
            current_stages: HashMap::new(),
            projection: Projection::default(),
            columns: Vec::new(),
            filters: FilterState::new(),
            debouncer: SearchDebouncer::new(),
            drag: DragState::new(),
            loading: false,
            notifications: Vec::new(),
        }
    }

    /// Attach a pre-move validation hook.
    pub fn with_move_guard(mut self, guard: Arc<dyn MoveGuard>) -> Self {
        self.guard = Some(guard);
        self
    }

    // =========================================================================
    // Refresh pipeline
    // =========================================================================

    /// Run the full pipeline against the store's current record query:
    /// paging guard, view catalog, projection, filters, column build.
    ///
    /// The previous card list is fully replaced, never merged, so a newer
    /// run simply overwrites whatever an older one left behind.
    pub async fn refresh(&mut self) -> Result<()> {
        self.loading = true;
        let outcome = self.refresh_inner().await;
        self.loading = false;
        outcome
    }

    async fn refresh_inner(&mut self) -> Result<()> {
        let mut dataset = self.store.dataset().await?;

        // Never build a board from a partial record set
        while catalog::needs_more_records(&dataset) {
            if let Err(err) = self.store.load_next_page().await {
                tracing::warn!("page load failed, continuing with loaded records: {}", err);
                break;
            }
            dataset = self.store.dataset().await?;
        }

        let Catalog {
            views,
            current_stages,
        } = catalog::discover(self.store.as_ref(), &dataset, &self.options.stage_orders).await;

        self.active_view = catalog::select_view(
            &views,
            self.options.default_view.as_deref(),
            self.active_view.as_deref(),
        )
        .map(|v| v.key.clone());
        self.views = views;
        self.current_stages = current_stages;
        self.dataset = Some(dataset);

        self.reproject();
        Ok(())
    }

    /// Re-derive cards from the held dataset and active view.
    fn reproject(&mut self) {
        self.projection = match (&self.dataset, self.active_view()) {
            (Some(dataset), Some(view)) => {
                project::project(dataset, view, &self.current_stages, &self.options.rules)
            }
            _ => Projection::default(),
        };
        self.rebuild();
    }

    /// Re-run filters and the column build over the current projection.
    fn rebuild(&mut self) {
        let Some(view) = self.active_view().cloned() else {
            self.columns = Vec::new();
            return;
        };
        let filtered = Projection {
            cards: filter::apply(self.projection.cards.clone(), &self.filters, today()),
            needs_unallocated: self.projection.needs_unallocated,
        };
        self.columns = column_builder::build(filtered, &view);
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn views(&self) -> &[ViewDefinition] {
        &self.views
    }

    /// The active view, if the catalog has one.
    pub fn active_view(&self) -> Option<&ViewDefinition> {
        let key = self.active_view.as_deref()?;
        self.views.iter().find(|v| v.key == key)
    }

    /// Switch the active view and re-derive the board.
    pub fn select_view(&mut self, key: &str) -> Result<()> {
        if !self.views.iter().any(|v| v.key == key) {
            return Err(BoardError::view_not_found(key));
        }
        self.active_view = Some(key.to_string());
        self.reproject();
        Ok(())
    }

    // =========================================================================
    // Board state
    // =========================================================================

    /// The built board.
    pub fn columns(&self) -> &[ColumnItem] {
        &self.columns
    }

    /// The full-fidelity card list, before filters.
    pub fn cards(&self) -> &[CardItem] {
        &self.projection.cards
    }

    /// Aggregates for one column, using the configured sum field.
    pub fn column_aggregate(&self, column_id: &str) -> Option<Aggregate> {
        let column = self.columns.iter().find(|c| c.id == column_id)?;
        Some(column.aggregate(self.options.sum_field.as_deref()))
    }

    /// Whether a store round trip is outstanding (spinner state).
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn options(&self) -> &BoardOptions {
        &self.options
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Drain surfaced notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // =========================================================================
    // Filters, search, sort
    // =========================================================================

    pub fn filter_state(&self) -> &FilterState {
        &self.filters
    }

    /// Set or clear one quick filter and re-derive the visible board.
    pub fn set_filter(&mut self, field: &str, value: Option<String>) {
        self.filters.set_value(field, value);
        self.rebuild();
    }

    /// Apply a named preset (replacing all quick-filter values), or clear
    /// every quick filter with `None`.
    pub fn apply_preset(&mut self, preset_id: Option<&str>) {
        let preset = preset_id.and_then(|id| self.options.preset(id)).cloned();
        self.filters.apply_preset(preset.as_ref());
        self.rebuild();
    }

    pub fn set_sort(&mut self, sort: Option<SortConfig>) {
        self.filters.set_sort(sort);
        self.rebuild();
    }

    /// Record raw search input; the term applies once input has been idle
    /// for the debounce delay.
    pub fn set_search_input(&mut self, term: impl Into<String>) {
        self.debouncer.submit(term);
    }

    /// Apply the pending search term if its idle period has elapsed.
    pub fn poll_search(&mut self) {
        if let Some(term) = self.debouncer.poll(Instant::now()) {
            self.filters.set_search(Some(term));
            self.rebuild();
        }
    }

    /// Wait out the debounce delay and apply the pending term.
    pub async fn settle_search(&mut self) {
        if let Some(term) = self.debouncer.settled().await {
            self.filters.set_search(Some(term));
            self.rebuild();
        }
    }

    /// Clear the applied search term immediately.
    pub fn clear_search(&mut self) {
        self.filters.set_search(None);
        self.rebuild();
    }

    // =========================================================================
    // Drag reconciliation
    // =========================================================================

    pub fn drag_phase(&self) -> &DragPhase {
        self.drag.phase()
    }

    /// Begin a drag gesture on a card.
    pub fn drag_start(&mut self, record_id: &RecordId) -> Result<()> {
        for column in &self.columns {
            if let Some(index) = column.cards.iter().position(|c| &c.id == record_id) {
                self.drag
                    .begin(record_id.clone(), column.id.clone(), index);
                return Ok(());
            }
        }
        Err(BoardError::card_not_found(record_id.as_str()))
    }

    /// Resolve a drop: validate, optimistically splice, persist, and force
    /// a store refresh.
    ///
    /// The store refresh is requested regardless of the update outcome; the
    /// host's dataset-change callback then drives [`BoardSession::refresh`],
    /// whose ground truth supersedes the optimistic splice. A failed write
    /// is surfaced as a notification, not rolled back by hand.
    pub async fn drag_drop(&mut self, target: Option<DropTarget>) -> Result<MoveOutcome> {
        let DragPhase::Dragging {
            record_id,
            source_column,
            source_index,
        } = self.drag.phase().clone()
        else {
            return Err(BoardError::NoActiveDrag);
        };

        let Some(target) = target else {
            return Ok(self.cancel_drag());
        };
        if target.column == source_column && target.index == source_index {
            return Ok(self.cancel_drag());
        }

        let view = self.active_view().cloned().ok_or(BoardError::NoActiveView)?;
        let destination_title = column_title(&view, &target.column)
            .ok_or_else(|| BoardError::column_not_found(target.column.clone()))?;

        if let Some(guard) = self.guard.clone() {
            let context = MoveContext {
                record_id: record_id.clone(),
                entity: self.entity().to_string(),
                source_column_title: column_title(&view, &source_column)
                    .unwrap_or_else(|| source_column.clone()),
                destination_column_title: destination_title.clone(),
                card: self.card_snapshot(&record_id)?,
            };
            if let MoveVerdict::Deny { message } = guard.before_move(&context).await {
                self.notifications
                    .push(Notification::warning(message.clone()));
                self.cancel_drag();
                return Ok(MoveOutcome::Vetoed { message });
            }
        }

        self.drag.commit();
        splice(
            &mut self.columns,
            &record_id,
            &source_column,
            &target.column,
            target.index,
        );

        let update = RecordUpdate {
            entity_set: entity_set_name(self.entity()),
            record_id: record_id.clone(),
            field: view.unique_name.clone(),
            value: write_value(&view, &target.column),
        };
        if let Err(err) = self.store.update_record(&update).await {
            tracing::warn!(record = %record_id, "persistence update failed: {}", err);
            self.notifications
                .push(Notification::error(format!("move was not saved: {}", err)));
        }

        // Re-issue the record query either way; the refreshed dataset will
        // supersede the optimistic splice when it arrives
        if let Err(err) = self.store.refresh().await {
            tracing::warn!("store refresh failed: {}", err);
        }
        self.drag.settle(Instant::now());

        Ok(MoveOutcome::Committed)
    }

    /// Whether a pointer release may be treated as a card click.
    pub fn click_allowed(&self, moved_px: f32) -> bool {
        self.drag.click_allowed(moved_px, Instant::now())
    }

    fn cancel_drag(&mut self) -> MoveOutcome {
        let now = Instant::now();
        self.drag.cancel(now);
        self.drag.settle(now);
        MoveOutcome::Cancelled
    }

    fn entity(&self) -> &str {
        self.dataset.as_ref().map(|d| d.entity.as_str()).unwrap_or("")
    }

    fn card_snapshot(&self, record_id: &RecordId) -> Result<CardItem> {
        self.columns
            .iter()
            .flat_map(|c| c.cards.iter())
            .find(|c| &c.id == record_id)
            .cloned()
            .ok_or_else(|| BoardError::card_not_found(record_id.as_str()))
    }
}

fn column_title(view: &ViewDefinition, column_id: &str) -> Option<String> {
    if column_id == UNALLOCATED_COLUMN {
        return Some(UNALLOCATED_TITLE.to_string());
    }
    view.column_by_id(column_id).map(|c| c.title.clone())
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

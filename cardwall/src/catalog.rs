//! View catalog: discovery of the grouping dimensions a board can offer.
//!
//! One view per categorical option-set column in the dataset, plus one
//! synthetic view per business process flow attached to the record type.
//! Every metadata fetch fails soft: a broken source contributes an empty
//! list, never a broken board.

use crate::types::{ColumnDefinition, ViewDefinition};
use cardwall_fields::StageOrder;
use cardwall_store::{ColumnKind, Dataset, RecordId, RecordStore};
use std::collections::{HashMap, HashSet};

/// Stage order assigned when the configured table has no entry for a stage.
pub const DEFAULT_STAGE_ORDER: i64 = 100;

/// Records loaded past this ceiling stop triggering further page loads.
pub const PAGING_CEILING: usize = 2500;

/// The discovered catalog: selectable views plus the current-stage index
/// of the primary process.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub views: Vec<ViewDefinition>,
    /// record id -> current stage name, for the first discovered process
    pub current_stages: HashMap<RecordId, String>,
}

/// Whether the catalog must request another page before the board may be
/// built from this dataset.
pub fn needs_more_records(dataset: &Dataset) -> bool {
    dataset.has_next_page && dataset.records.len() < PAGING_CEILING
}

/// Discover all selectable views for the dataset's record type.
///
/// Option-set views come first, process views are appended after them.
pub async fn discover(
    store: &dyn RecordStore,
    dataset: &Dataset,
    stage_orders: &[StageOrder],
) -> Catalog {
    let mut views = option_set_views(store, dataset).await;
    let (process_views, current_stages) = process_views(store, dataset, stage_orders).await;
    views.extend(process_views);
    Catalog {
        views,
        current_stages,
    }
}

/// Pick the active view: a configured default name wins, then the
/// previously active key if it still exists, then the first entry.
pub fn select_view<'a>(
    views: &'a [ViewDefinition],
    configured_default: Option<&str>,
    previous_key: Option<&str>,
) -> Option<&'a ViewDefinition> {
    if let Some(name) = configured_default {
        if let Some(view) = views.iter().find(|v| v.text == name || v.key == name) {
            return Some(view);
        }
    }
    if let Some(key) = previous_key {
        if let Some(view) = views.iter().find(|v| v.key == key) {
            return Some(view);
        }
    }
    views.first()
}

async fn option_set_views(store: &dyn RecordStore, dataset: &Dataset) -> Vec<ViewDefinition> {
    let categorical: Vec<_> = dataset
        .columns
        .iter()
        .filter(|c| c.kind.is_categorical())
        .collect();
    if categorical.is_empty() {
        return Vec::new();
    }

    let fields: Vec<String> = categorical.iter().map(|c| c.name.clone()).collect();
    let options = match store.fetch_options(&dataset.entity, &fields).await {
        Ok(options) => options,
        Err(err) => {
            tracing::warn!(entity = %dataset.entity, "option metadata fetch failed: {}", err);
            return Vec::new();
        }
    };

    let mut views = Vec::with_capacity(categorical.len());
    for spec in categorical {
        let mut field_options: Vec<_> = options.iter().filter(|o| o.field == spec.name).collect();

        if spec.kind == ColumnKind::Status {
            match store.fetch_active_states(&dataset.entity, &spec.name).await {
                Ok(active) => field_options.retain(|o| active.contains(&o.key)),
                Err(err) => {
                    tracing::warn!(field = %spec.name, "state metadata fetch failed: {}", err);
                    continue;
                }
            }
        }

        field_options.sort_by_key(|o| o.order);
        let columns: Vec<ColumnDefinition> = field_options
            .into_iter()
            .map(|o| ColumnDefinition::new(o.key.clone(), o.label.clone(), o.order))
            .collect();
        views.push(ViewDefinition::option_set(
            spec.name.clone(),
            spec.display_name.clone(),
            columns,
        ));
    }
    views
}

async fn process_views(
    store: &dyn RecordStore,
    dataset: &Dataset,
    stage_orders: &[StageOrder],
) -> (Vec<ViewDefinition>, HashMap<RecordId, String>) {
    let stages = match store.fetch_process_stages(&dataset.entity).await {
        Ok(stages) => stages,
        Err(err) => {
            tracing::warn!(entity = %dataset.entity, "process metadata fetch failed: {}", err);
            return (Vec::new(), HashMap::new());
        }
    };
    if stages.is_empty() {
        return (Vec::new(), HashMap::new());
    }

    let order_table: HashMap<&str, i64> = stage_orders
        .iter()
        .map(|o| (o.id.as_str(), o.order))
        .collect();

    // Group stages by parent process, preserving discovery order of both
    // processes and stages; duplicate stage ids keep their first occurrence.
    let mut process_order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, (String, String, Vec<ColumnDefinition>, HashSet<String>)> =
        HashMap::new();

    for stage in &stages {
        let entry = grouped.entry(stage.process_id.clone()).or_insert_with(|| {
            process_order.push(stage.process_id.clone());
            (
                stage.process_name.clone(),
                stage.process_unique_name.clone(),
                Vec::new(),
                HashSet::new(),
            )
        });
        if !entry.3.insert(stage.stage_id.clone()) {
            continue;
        }
        let order = order_table
            .get(stage.stage_id.as_str())
            .copied()
            .unwrap_or(DEFAULT_STAGE_ORDER);
        entry.2.push(ColumnDefinition::new(
            stage.stage_id.clone(),
            stage.stage_name.clone(),
            order,
        ));
    }

    let mut views = Vec::with_capacity(process_order.len());
    for process_id in &process_order {
        let (name, unique_name, mut columns, _) = grouped.remove(process_id).unwrap_or_default();
        // Stable: ties keep discovery order
        columns.sort_by_key(|c| c.order);
        views.push(ViewDefinition::process(
            process_id.clone(),
            name,
            unique_name,
            columns,
        ));
    }

    // Current stage resolution for the primary (first) process only
    let mut current_stages = HashMap::new();
    if let Some(primary) = views.first() {
        let record_ids = dataset.record_ids();
        match store
            .fetch_current_stage(&dataset.entity, &primary.unique_name, &record_ids)
            .await
        {
            Ok(rows) => {
                current_stages = rows
                    .into_iter()
                    .map(|c| (c.record_id, c.stage_name))
                    .collect();
            }
            Err(err) => {
                tracing::warn!(process = %primary.unique_name, "current-stage fetch failed: {}", err);
            }
        }
    }

    (views, current_stages)
}

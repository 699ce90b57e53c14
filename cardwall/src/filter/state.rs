//! Quick-filter state: per-field values, presets, search, sort.

use super::predicate::Predicate;
use super::search::matches_search;
use super::sort::{sort_cards, SortConfig};
use crate::types::CardItem;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration of one quick-filter control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickFilterFieldConfig {
    /// Field the filter applies to
    pub key: String,
    /// Display label
    pub text: String,
    #[serde(default)]
    pub multiselect: bool,
    /// Rendered in the overflow popup rather than the primary bar
    #[serde(default)]
    pub in_popup: bool,
}

/// A named snapshot of quick-filter values, applied atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPreset {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub values: IndexMap<String, String>,
}

/// The complete filter/sort/search state of one board instance.
///
/// Values are kept in their encoded-string form; predicates are parsed on
/// application, which keeps this state trivially clonable and serializable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    values: IndexMap<String, String>,
    search: Option<String>,
    sort: Option<SortConfig>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear one field's filter value. `None` means "no filter".
    pub fn set_value(&mut self, field: &str, value: Option<String>) {
        match value {
            Some(value) => {
                self.values.insert(field.to_string(), value);
            }
            None => {
                self.values.shift_remove(field);
            }
        }
    }

    /// The encoded filter value for a field, if any
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Apply a preset: `Some` atomically replaces the entire value map with
    /// the preset's snapshot (clearing every filter the snapshot omits);
    /// `None` clears all quick filters. Sort and search are untouched
    /// either way.
    pub fn apply_preset(&mut self, preset: Option<&FilterPreset>) {
        match preset {
            Some(preset) => self.values = preset.values.clone(),
            None => self.values.clear(),
        }
    }

    /// Set the applied search term. `None` or blank clears it.
    pub fn set_search(&mut self, term: Option<String>) {
        self.search = term.filter(|t| !t.trim().is_empty());
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn set_sort(&mut self, sort: Option<SortConfig>) {
        self.sort = sort;
    }

    pub fn sort(&self) -> Option<&SortConfig> {
        self.sort.as_ref()
    }

    /// Number of fields with an active filter
    pub fn active_count(&self) -> usize {
        self.values.len()
    }

    /// Snapshot of the current value map
    pub fn values(&self) -> &IndexMap<String, String> {
        &self.values
    }
}

/// Run the full pipeline: per-field predicates AND search, then sort.
///
/// Predicates are pure functions of a card and the state; nothing here
/// mutates shared state. `today` anchors the relative date vocabulary.
pub fn apply(cards: Vec<CardItem>, state: &FilterState, today: NaiveDate) -> Vec<CardItem> {
    let predicates: Vec<(&str, Predicate)> = state
        .values
        .iter()
        .map(|(field, encoded)| (field.as_str(), Predicate::parse(encoded)))
        .collect();

    let mut out: Vec<CardItem> = cards
        .into_iter()
        .filter(|card| {
            predicates
                .iter()
                .all(|(field, predicate)| predicate.matches(card.value(field), today))
                && state
                    .search
                    .as_deref()
                    .map(|term| matches_search(card, term))
                    .unwrap_or(true)
        })
        .collect();

    if let Some(sort) = &state.sort {
        sort_cards(&mut out, sort);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CardValue;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cards() -> Vec<CardItem> {
        vec![
            CardItem::new("a", "todo", "Implement user authentication")
                .with_field("priority", "Priority", CardValue::text("High"))
                .with_field(
                    "estimate",
                    "Estimate",
                    CardValue::Number { value: 8.0, formatted: "8".into() },
                ),
            CardItem::new("b", "todo", "Write onboarding docs")
                .with_field("priority", "Priority", CardValue::text("Low"))
                .with_field(
                    "estimate",
                    "Estimate",
                    CardValue::Number { value: 2.0, formatted: "2".into() },
                ),
            CardItem::new("c", "done", "Fix login redirect")
                .with_field("priority", "Priority", CardValue::text("High"))
                .with_field(
                    "estimate",
                    "Estimate",
                    CardValue::Number { value: 3.0, formatted: "3".into() },
                ),
        ]
    }

    #[test]
    fn test_filters_compose_with_and() {
        let mut state = FilterState::new();
        state.set_value("priority", Some("High".into()));
        state.set_value("estimate", Some("lte:5".into()));

        let out = apply(cards(), &state, day(2024, 6, 1));
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn test_search_composes_with_filters() {
        let mut state = FilterState::new();
        state.set_value("priority", Some("High".into()));
        state.set_search(Some("auth".into()));

        let out = apply(cards(), &state, day(2024, 6, 1));
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_clearing_a_value_removes_the_filter() {
        let mut state = FilterState::new();
        state.set_value("priority", Some("High".into()));
        assert_eq!(state.active_count(), 1);
        state.set_value("priority", None);
        assert_eq!(state.active_count(), 0);
        assert_eq!(apply(cards(), &state, day(2024, 6, 1)).len(), 3);
    }

    #[test]
    fn test_preset_replaces_the_whole_map() {
        let mut state = FilterState::new();
        state.set_value("priority", Some("Low".into()));
        state.set_value("estimate", Some("gt:1".into()));
        state.set_search(Some("docs".into()));

        let preset = FilterPreset {
            id: "hot".into(),
            label: "Hot items".into(),
            values: [("priority".to_string(), "High".to_string())]
                .into_iter()
                .collect(),
        };
        state.apply_preset(Some(&preset));

        // The estimate filter was not in the snapshot: gone
        assert_eq!(state.value("priority"), Some("High"));
        assert!(state.value("estimate").is_none());
        assert_eq!(state.active_count(), 1);
        // Search is untouched by presets
        assert_eq!(state.search(), Some("docs"));
    }

    #[test]
    fn test_clearing_presets_empties_filters_only() {
        let mut state = FilterState::new();
        state.set_value("priority", Some("High".into()));
        state.set_sort(Some(SortConfig::ascending("estimate")));
        state.set_search(Some("auth".into()));

        state.apply_preset(None);

        assert_eq!(state.active_count(), 0);
        assert!(state.sort().is_some());
        assert_eq!(state.search(), Some("auth"));
    }

    #[test]
    fn test_sort_runs_after_filtering() {
        let mut state = FilterState::new();
        state.set_value("priority", Some("High".into()));
        state.set_sort(Some(SortConfig::ascending("estimate")));

        let out = apply(cards(), &state, day(2024, 6, 1));
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_blank_search_is_no_filter() {
        let mut state = FilterState::new();
        state.set_search(Some("   ".into()));
        assert!(state.search().is_none());
    }
}

//! Parsers for the dynamically configured field-set values.
//!
//! Every recognized option is a plain string that may hold either a JSON
//! array or a comma-separated list. Malformed JSON produces a distinct
//! [`ConfigIssue`] per configuration key and the key falls back to an empty
//! set/map - a broken list never crashes rendering and never masks the
//! other keys.

use crate::error::ConfigIssue;
use crate::types::StageOrder;
use indexmap::IndexMap;
use serde::Deserialize;

/// Outcome of parsing one configuration key: the parsed value plus the
/// issue, if any, that degraded it.
pub type Parsed<T> = (T, Option<ConfigIssue>);

fn looks_like_json(raw: &str) -> bool {
    matches!(raw.trim_start().chars().next(), Some('[' | '{'))
}

fn issue(key: &str, message: impl Into<String>) -> Option<ConfigIssue> {
    let issue = ConfigIssue::new(key, message);
    tracing::warn!(key = %issue.key, "configuration value degraded: {}", issue.message);
    Some(issue)
}

/// Parse a list of field names: a JSON array of strings, or a comma list.
pub fn parse_field_list(key: &str, raw: &str) -> Parsed<Vec<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return (Vec::new(), None);
    }

    if looks_like_json(raw) {
        return match serde_json::from_str::<Vec<String>>(raw) {
            Ok(list) => (list, None),
            Err(err) => (Vec::new(), issue(key, format!("malformed JSON array: {}", err))),
        };
    }

    let list = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (list, None)
}

#[derive(Deserialize)]
struct FieldValuePair {
    field: String,
    value: String,
}

/// Parse a field→value map: a JSON object, a JSON array of
/// `{field, value}` objects, or a comma list of `field:value` pairs.
pub fn parse_field_map(key: &str, raw: &str) -> Parsed<IndexMap<String, String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return (IndexMap::new(), None);
    }

    if looks_like_json(raw) {
        if raw.starts_with('{') {
            return match serde_json::from_str::<IndexMap<String, String>>(raw) {
                Ok(map) => (map, None),
                Err(err) => (
                    IndexMap::new(),
                    issue(key, format!("malformed JSON object: {}", err)),
                ),
            };
        }
        return match serde_json::from_str::<Vec<FieldValuePair>>(raw) {
            Ok(pairs) => (
                pairs.into_iter().map(|p| (p.field, p.value)).collect(),
                None,
            ),
            Err(err) => (
                IndexMap::new(),
                issue(key, format!("malformed JSON array: {}", err)),
            ),
        };
    }

    // Comma-list fallback: field:value pairs. A pair without a separator is
    // a failure of the fallback too, so it surfaces as an issue.
    let mut map = IndexMap::new();
    let mut bad_pair = None;
    for pair in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match pair.split_once(':') {
            Some((field, value)) => {
                map.insert(field.trim().to_string(), value.trim().to_string());
            }
            None => bad_pair = Some(pair.to_string()),
        }
    }
    let issue = bad_pair.and_then(|pair| issue(key, format!("entry '{}' is not a field:value pair", pair)));
    (map, issue)
}

/// Parse the stage-order table: a JSON array of `{id, order}` rows.
pub fn parse_stage_orders(key: &str, raw: &str) -> Parsed<Vec<StageOrder>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return (Vec::new(), None);
    }

    match serde_json::from_str::<Vec<StageOrder>>(raw) {
        Ok(orders) => (orders, None),
        Err(err) => (
            Vec::new(),
            issue(key, format!("malformed stage-order table: {}", err)),
        ),
    }
}

//! Record and dataset types exposed by the backing store.
//!
//! Records are read-only to the engine: every field carries both the raw
//! value and the store's formatted display string, and the raw side is a
//! tagged union so consumers can match exhaustively instead of sniffing
//! shapes at runtime.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a backing-store record.
///
/// Minted by the store, opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a record id from an existing string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A reference to another record: id plus the display name and entity type
/// needed to render and navigate it without a second fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: RecordId,
    pub name: String,
    pub entity: String,
}

impl EntityRef {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entity: entity.into(),
        }
    }
}

/// The raw side of a field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum RawValue {
    Null,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Reference(EntityRef),
    References(Vec<EntityRef>),
}

impl RawValue {
    /// Numeric view of the value, if it has one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// One record field: raw value plus the store's formatted display string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub raw: RawValue,
    #[serde(default)]
    pub formatted: String,
}

impl FieldValue {
    /// Text field whose formatted value equals the raw text
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            raw: RawValue::Text(value.clone()),
            formatted: value,
        }
    }

    /// Numeric field with an explicit formatted rendering
    pub fn number(value: f64, formatted: impl Into<String>) -> Self {
        Self {
            raw: RawValue::Number(value),
            formatted: formatted.into(),
        }
    }

    /// Date field with an explicit formatted rendering
    pub fn date(value: NaiveDate, formatted: impl Into<String>) -> Self {
        Self {
            raw: RawValue::Date(value),
            formatted: formatted.into(),
        }
    }

    /// Single entity reference; the formatted value is the display name
    pub fn reference(reference: EntityRef) -> Self {
        let formatted = reference.name.clone();
        Self {
            raw: RawValue::Reference(reference),
            formatted,
        }
    }

    /// List of entity references; the formatted value joins the display names
    pub fn references(references: Vec<EntityRef>) -> Self {
        let formatted = references
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            raw: RawValue::References(references),
            formatted,
        }
    }

    /// Absent value
    pub fn empty() -> Self {
        Self {
            raw: RawValue::Null,
            formatted: String::new(),
        }
    }
}

/// A backing-store row. Field order follows the dataset's displayed columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub entity: String,
    #[serde(default)]
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    /// Create a record with no fields
    pub fn new(id: impl Into<RecordId>, entity: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity: entity.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field value
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// The formatted display string for a field, if present
    pub fn formatted(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|v| v.formatted.as_str())
    }

    /// The record's entity type
    pub fn entity_type(&self) -> &str {
        &self.entity
    }
}

/// What kind of value a displayed dataset column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    /// Static categorical field backed by an option set
    OptionSet,
    /// Status-style categorical field with active/inactive state metadata
    Status,
    /// Single or multi-valued reference to other records
    Lookup,
}

impl ColumnKind {
    /// Whether this column can serve as a grouping dimension
    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::OptionSet | Self::Status)
    }
}

/// One displayed dataset column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub display_name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        kind: ColumnKind,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            kind,
        }
    }
}

/// A snapshot of the store's current record query: displayed columns, the
/// records loaded so far, and whether a further page is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub entity: String,
    pub columns: Vec<ColumnSpec>,
    pub records: Vec<Record>,
    #[serde(default)]
    pub has_next_page: bool,
}

impl Dataset {
    /// Ids of all loaded records, in dataset order
    pub fn record_ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }
}

/// One option of a categorical field: stable key, display label, display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValue {
    pub field: String,
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub order: i64,
}

/// One stage of a business process flow definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDef {
    pub process_id: String,
    pub process_name: String,
    pub process_unique_name: String,
    pub stage_id: String,
    pub stage_name: String,
}

/// The current stage of one record within a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentStage {
    pub record_id: RecordId,
    pub stage_name: String,
}

/// A single-field persistence update issued by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordUpdate {
    /// Pluralized entity set name, e.g. `opportunities` for `opportunity`
    pub entity_set: String,
    pub record_id: RecordId,
    pub field: String,
    /// `None` clears the classification field
    pub value: Option<String>,
}

/// Pluralize an entity logical name into its entity set name.
pub fn entity_set_name(entity: &str) -> String {
    if let Some(stem) = entity.strip_suffix('y') {
        let penultimate = stem.chars().last();
        if !matches!(penultimate, Some('a' | 'e' | 'i' | 'o' | 'u')) {
            return format!("{}ies", stem);
        }
    }
    if entity.ends_with('s')
        || entity.ends_with('x')
        || entity.ends_with('z')
        || entity.ends_with("ch")
        || entity.ends_with("sh")
    {
        return format!("{}es", entity);
    }
    format!("{}s", entity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_field_lookup() {
        let record = Record::new("r1", "task")
            .with_field("title", FieldValue::text("Ship it"))
            .with_field("estimate", FieldValue::number(3.0, "3"));

        assert_eq!(record.formatted("title"), Some("Ship it"));
        assert_eq!(
            record.field("estimate").and_then(|v| v.raw.as_number()),
            Some(3.0)
        );
        assert!(record.field("missing").is_none());
        assert_eq!(record.entity_type(), "task");
    }

    #[test]
    fn test_field_order_is_preserved() {
        let record = Record::new("r1", "task")
            .with_field("b", FieldValue::text("second"))
            .with_field("a", FieldValue::text("first"));

        let names: Vec<&str> = record.fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_references_formatted_joins_names() {
        let value = FieldValue::references(vec![
            EntityRef::new("a1", "Alice", "contact"),
            EntityRef::new("b2", "Bob", "contact"),
        ]);
        assert_eq!(value.formatted, "Alice, Bob");
    }

    #[test]
    fn test_raw_value_serialization_round_trip() {
        let value = RawValue::Reference(EntityRef::new("a1", "Alice", "contact"));
        let json = serde_json::to_string(&value).unwrap();
        assert!(json.contains("\"kind\":\"reference\""));
        let parsed: RawValue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_entity_set_name() {
        assert_eq!(entity_set_name("account"), "accounts");
        assert_eq!(entity_set_name("opportunity"), "opportunities");
        assert_eq!(entity_set_name("address"), "addresses");
        assert_eq!(entity_set_name("branch"), "branches");
        assert_eq!(entity_set_name("day"), "days");
    }

    #[test]
    fn test_column_kind_categorical() {
        assert!(ColumnKind::OptionSet.is_categorical());
        assert!(ColumnKind::Status.is_categorical());
        assert!(!ColumnKind::Lookup.is_categorical());
        assert!(!ColumnKind::Text.is_categorical());
    }
}

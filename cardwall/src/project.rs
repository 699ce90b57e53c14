//! Record projector: raw records in, display-ready cards out.
//!
//! Cards never carry the record they came from; they are rebuilt in full
//! whenever the record set or active view changes, so projection is a pure
//! function of its inputs.

use crate::types::{CardField, CardItem, CardValue, ViewDefinition, UNALLOCATED_COLUMN};
use cardwall_fields::FieldRules;
use cardwall_store::{Dataset, FieldValue, RawValue, Record, RecordId};
use std::collections::HashMap;

/// The projector's output: the card list plus whether any card lacked a
/// grouping value, which is what entitles the board to an unallocated
/// column.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    pub cards: Vec<CardItem>,
    /// True when the view groups by a field and at least one record has a
    /// missing or empty formatted value for it
    pub needs_unallocated: bool,
}

/// Project every record of the dataset into a card under the active view.
pub fn project(
    dataset: &Dataset,
    view: &ViewDefinition,
    current_stages: &HashMap<RecordId, String>,
    rules: &FieldRules,
) -> Projection {
    let mut projection = Projection {
        cards: Vec::with_capacity(dataset.records.len()),
        needs_unallocated: false,
    };

    for record in &dataset.records {
        if !view.is_process() && group_value(record, view).is_none() {
            projection.needs_unallocated = true;
        }
        projection
            .cards
            .push(project_record(record, dataset, view, current_stages, rules));
    }
    projection
}

fn project_record(
    record: &Record,
    dataset: &Dataset,
    view: &ViewDefinition,
    current_stages: &HashMap<RecordId, String>,
    rules: &FieldRules,
) -> CardItem {
    let mut card = CardItem::new(
        record.id.clone(),
        resolve_column_key(record, view, current_stages),
        String::new(),
    );

    for (index, spec) in dataset.columns.iter().enumerate() {
        // The first column is always the card title, whatever its name
        if index == 0 {
            card.title = record.formatted(&spec.name).unwrap_or_default().to_string();
            continue;
        }
        if !rules.is_visible(&spec.name) {
            continue;
        }
        let label = rules.label_for(&spec.name, &spec.display_name);
        let value = card_value(record.field(&spec.name));
        card.fields.insert(spec.name.clone(), CardField::new(label, value));
    }

    card
}

/// The record's non-empty formatted value for the view's grouping field.
fn group_value<'a>(record: &'a Record, view: &ViewDefinition) -> Option<&'a str> {
    record.formatted(&view.key).filter(|v| !v.is_empty())
}

fn resolve_column_key(
    record: &Record,
    view: &ViewDefinition,
    current_stages: &HashMap<RecordId, String>,
) -> String {
    if view.is_process() {
        // Unresolved records keep an empty stage key
        return current_stages
            .get(&record.id)
            .and_then(|stage_name| view.column_by_title(stage_name))
            .map(|c| c.id.clone())
            .unwrap_or_default();
    }

    match group_value(record, view) {
        Some(value) => view
            .column_by_title(value)
            .map(|c| c.id.clone())
            .unwrap_or_else(|| UNALLOCATED_COLUMN.to_string()),
        None => UNALLOCATED_COLUMN.to_string(),
    }
}

fn card_value(field: Option<&FieldValue>) -> CardValue {
    let Some(field) = field else {
        return CardValue::text("");
    };
    match &field.raw {
        RawValue::Reference(r) => CardValue::Reference { value: r.clone() },
        RawValue::References(rs) => CardValue::References { value: rs.clone() },
        RawValue::Number(n) => CardValue::Number {
            value: *n,
            formatted: field.formatted.clone(),
        },
        RawValue::Date(d) => CardValue::Date {
            value: *d,
            formatted: field.formatted.clone(),
        },
        RawValue::Text(_) | RawValue::Null => CardValue::text(field.formatted.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnDefinition;
    use cardwall_store::{ColumnKind, ColumnSpec, EntityRef};

    fn status_view() -> ViewDefinition {
        ViewDefinition::option_set(
            "status",
            "Status",
            vec![
                ColumnDefinition::new("1", "Todo", 0),
                ColumnDefinition::new("2", "Done", 1),
            ],
        )
    }

    fn dataset() -> Dataset {
        Dataset {
            entity: "task".into(),
            columns: vec![
                ColumnSpec::new("subject", "Subject", ColumnKind::Text),
                ColumnSpec::new("status", "Status", ColumnKind::OptionSet),
                ColumnSpec::new("owner", "Owner", ColumnKind::Lookup),
            ],
            records: vec![
                Record::new("r1", "task")
                    .with_field("subject", FieldValue::text("Ship the thing"))
                    .with_field("status", FieldValue::text("Todo"))
                    .with_field(
                        "owner",
                        FieldValue::reference(EntityRef::new("u1", "Alice", "user")),
                    ),
                Record::new("r2", "task")
                    .with_field("subject", FieldValue::text("No status"))
                    .with_field("status", FieldValue::empty()),
            ],
            has_next_page: false,
        }
    }

    #[test]
    fn test_first_column_becomes_title() {
        let projection = project(&dataset(), &status_view(), &HashMap::new(), &FieldRules::new());
        let card = &projection.cards[0];
        assert_eq!(card.title, "Ship the thing");
        // The title column is not duplicated into the field map
        assert!(card.fields.get("subject").is_none());
    }

    #[test]
    fn test_column_key_resolution() {
        let projection = project(&dataset(), &status_view(), &HashMap::new(), &FieldRules::new());
        assert_eq!(projection.cards[0].column, "1");
        // Empty formatted value -> unallocated, and the board earns the column
        assert_eq!(projection.cards[1].column, UNALLOCATED_COLUMN);
        assert!(projection.needs_unallocated);
    }

    #[test]
    fn test_unmatched_value_is_unallocated_without_entitling_the_column() {
        let ds = Dataset {
            entity: "task".into(),
            columns: vec![
                ColumnSpec::new("subject", "Subject", ColumnKind::Text),
                ColumnSpec::new("status", "Status", ColumnKind::OptionSet),
            ],
            records: vec![Record::new("r1", "task")
                .with_field("subject", FieldValue::text("Odd one"))
                .with_field("status", FieldValue::text("Archived"))],
            has_next_page: false,
        };
        let projection = project(&ds, &status_view(), &HashMap::new(), &FieldRules::new());
        assert_eq!(projection.cards[0].column, UNALLOCATED_COLUMN);
        // A non-empty value that matches no column does not inject the column
        assert!(!projection.needs_unallocated);
    }

    #[test]
    fn test_reference_values_stay_structured() {
        let projection = project(&dataset(), &status_view(), &HashMap::new(), &FieldRules::new());
        match projection.cards[0].value("owner") {
            Some(CardValue::Reference { value }) => {
                assert_eq!(value.name, "Alice");
                assert_eq!(value.entity, "user");
            }
            other => panic!("expected structured reference, got {:?}", other),
        }
    }

    #[test]
    fn test_field_rules_apply() {
        let mut rules = FieldRules::new();
        rules.set_hidden("owner");
        rules.set_display_name("status", "Workflow state");

        let projection = project(&dataset(), &status_view(), &HashMap::new(), &rules);
        let card = &projection.cards[0];
        assert!(card.fields.get("owner").is_none());
        assert_eq!(card.fields.get("status").unwrap().label, "Workflow state");
    }

    #[test]
    fn test_projection_is_deterministic() {
        let ds = dataset();
        let view = status_view();
        let rules = FieldRules::new();
        let first = project(&ds, &view, &HashMap::new(), &rules);
        let second = project(&ds, &view, &HashMap::new(), &rules);
        assert_eq!(first.cards, second.cards);
        assert_eq!(first.needs_unallocated, second.needs_unallocated);
    }

    #[test]
    fn test_process_view_resolution_uses_stage_index() {
        let view = ViewDefinition::process(
            "p1",
            "Sales",
            "sales_unique",
            vec![
                ColumnDefinition::new("s1", "Qualify", 100),
                ColumnDefinition::new("s2", "Close", 100),
            ],
        );
        let mut stages = HashMap::new();
        stages.insert(RecordId::from_string("r1"), "Close".to_string());

        let projection = project(&dataset(), &view, &stages, &FieldRules::new());
        assert_eq!(projection.cards[0].column, "s2");
        // No stage row for r2: empty key, and process views never earn
        // an unallocated column
        assert_eq!(projection.cards[1].column, "");
        assert!(!projection.needs_unallocated);
    }
}

//! Card types: the projected, display-ready representation of one record.

use cardwall_store::{EntityRef, RecordId};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The value of one card field.
///
/// A tagged union per value kind so the presentation layer can match
/// exhaustively instead of probing an open-ended bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CardValue {
    Text { value: String },
    Number { value: f64, formatted: String },
    Date { value: NaiveDate, formatted: String },
    Reference { value: EntityRef },
    References { value: Vec<EntityRef> },
}

impl CardValue {
    /// Plain text value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Numeric view of the value, if it has one.
    ///
    /// Text values that parse as formatted numbers count, so numeric
    /// filters work on columns the store only hands us as display strings.
    pub fn number(&self) -> Option<f64> {
        match self {
            Self::Number { value, .. } => Some(*value),
            Self::Text { value } => parse_formatted_number(value).map(|(n, _)| n),
            _ => None,
        }
    }

    /// Date view of the value, if it has one
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// String coercion used by search, sort, and categorical matching
    pub fn display(&self) -> String {
        match self {
            Self::Text { value } => value.clone(),
            Self::Number { formatted, .. } => formatted.clone(),
            Self::Date { formatted, .. } => formatted.clone(),
            Self::Reference { value } => value.name.clone(),
            Self::References { value } => value
                .iter()
                .map(|r| r.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Parse a formatted numeric string such as `$1,234.50` or `1 234,50 €`.
///
/// Returns the numeric value and the currency symbol, if one was attached.
pub(crate) fn parse_formatted_number(s: &str) -> Option<(f64, Option<String>)> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut digits = String::with_capacity(trimmed.len());
    let mut symbol = String::new();
    for ch in trimmed.chars() {
        match ch {
            '0'..='9' | '.' | '-' => digits.push(ch),
            ',' | ' ' | '\u{a0}' => {}
            other => symbol.push(other),
        }
    }

    let value: f64 = digits.parse().ok()?;
    let symbol = symbol.trim().to_string();
    Some((value, if symbol.is_empty() { None } else { Some(symbol) }))
}

/// One named field on a card: display label plus value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardField {
    pub label: String,
    pub value: CardValue,
}

impl CardField {
    pub fn new(label: impl Into<String>, value: CardValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A card: the projection of one record under the active view.
///
/// Cards are rebuilt in full whenever the record set or active view
/// changes; the only field ever mutated in place is `column`, by the drag
/// reconciler's optimistic reassignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardItem {
    pub id: RecordId,
    /// Resolved bucket key within the active view
    pub column: String,
    /// First dataset column, by convention
    pub title: String,
    #[serde(default)]
    pub fields: IndexMap<String, CardField>,
}

impl CardItem {
    /// Create a card with no extra fields
    pub fn new(
        id: impl Into<RecordId>,
        column: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            column: column.into(),
            title: title.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        value: CardValue,
    ) -> Self {
        self.fields
            .insert(name.into(), CardField::new(label, value));
        self
    }

    /// Look up a field value by name
    pub fn value(&self, field: &str) -> Option<&CardValue> {
        self.fields.get(field).map(|f| &f.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_coercion() {
        assert_eq!(CardValue::Number { value: 7.5, formatted: "7.5".into() }.number(), Some(7.5));
        assert_eq!(CardValue::text("1,234.5").number(), Some(1234.5));
        assert_eq!(CardValue::text("not a number").number(), None);
        assert_eq!(
            CardValue::References { value: Vec::new() }.number(),
            None
        );
    }

    #[test]
    fn test_parse_formatted_number() {
        assert_eq!(parse_formatted_number("$1,234.50"), Some((1234.5, Some("$".into()))));
        assert_eq!(parse_formatted_number("42"), Some((42.0, None)));
        assert_eq!(parse_formatted_number("-3.5"), Some((-3.5, None)));
        assert_eq!(parse_formatted_number("1 234 kr"), Some((1234.0, Some("kr".into()))));
        assert_eq!(parse_formatted_number(""), None);
        assert_eq!(parse_formatted_number("n/a"), None);
    }

    #[test]
    fn test_display_coercion() {
        let refs = CardValue::References {
            value: vec![
                EntityRef::new("a", "Alice", "contact"),
                EntityRef::new("b", "Bob", "contact"),
            ],
        };
        assert_eq!(refs.display(), "Alice, Bob");

        let date = CardValue::Date {
            value: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            formatted: "3/1/2024".into(),
        };
        assert_eq!(date.display(), "3/1/2024");
    }

    #[test]
    fn test_card_field_lookup() {
        let card = CardItem::new("r1", "todo", "Ship it")
            .with_field("estimate", "Estimate", CardValue::Number { value: 3.0, formatted: "3".into() });
        assert_eq!(card.value("estimate").and_then(|v| v.number()), Some(3.0));
        assert!(card.value("missing").is_none());
    }
}

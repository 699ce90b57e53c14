//! Board sorting: one active field/direction pair.

use crate::types::{CardItem, CardValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// The active sort: a field key and a direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortConfig {
    pub field: String,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Stable sort of cards by the configured field.
///
/// Numbers compare numerically, dates chronologically, strings caselessly.
/// Absent or type-mismatched values compare equal, so the sort degrades to
/// a stable no-op instead of scrambling the board.
pub fn sort_cards(cards: &mut [CardItem], sort: &SortConfig) {
    cards.sort_by(|a, b| {
        let ordering = compare_values(a.value(&sort.field), b.value(&sort.field));
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare_values(a: Option<&CardValue>, b: Option<&CardValue>) -> Ordering {
    let (Some(a), Some(b)) = (a, b) else {
        return Ordering::Equal;
    };

    if let (Some(x), Some(y)) = (a.date(), b.date()) {
        return x.cmp(&y);
    }
    match (a.number(), b.number()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (None, None) => a.display().to_lowercase().cmp(&b.display().to_lowercase()),
        // One numeric, one not: treat as equal rather than invent an order
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn card(id: &str, estimate: Option<f64>, owner: &str) -> CardItem {
        let mut card = CardItem::new(id, "todo", format!("Card {}", id)).with_field(
            "owner",
            "Owner",
            CardValue::text(owner),
        );
        if let Some(estimate) = estimate {
            card = card.with_field(
                "estimate",
                "Estimate",
                CardValue::Number {
                    value: estimate,
                    formatted: estimate.to_string(),
                },
            );
        }
        card
    }

    #[test]
    fn test_numeric_sort() {
        let mut cards = vec![
            card("a", Some(8.0), "zoe"),
            card("b", Some(2.0), "amy"),
            card("c", Some(5.0), "max"),
        ];
        sort_cards(&mut cards, &SortConfig::ascending("estimate"));
        let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);

        sort_cards(&mut cards, &SortConfig::descending("estimate"));
        let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_string_sort_is_caseless() {
        let mut cards = vec![
            card("a", None, "Zoe"),
            card("b", None, "amy"),
            card("c", None, "Max"),
        ];
        sort_cards(&mut cards, &SortConfig::ascending("owner"));
        let owners: Vec<String> = cards
            .iter()
            .map(|c| c.value("owner").unwrap().display())
            .collect();
        assert_eq!(owners, vec!["amy", "Max", "Zoe"]);
    }

    #[test]
    fn test_absent_values_keep_relative_order() {
        let mut cards = vec![
            card("a", None, "zoe"),
            card("b", Some(1.0), "amy"),
            card("c", None, "max"),
        ];
        // Missing estimates compare equal: stable sort keeps a before c
        sort_cards(&mut cards, &SortConfig::ascending("estimate"));
        let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_date_sort() {
        let date = |y, m, d| CardValue::Date {
            value: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            formatted: String::new(),
        };
        let mut cards = vec![
            CardItem::new("a", "todo", "A").with_field("due", "Due", date(2024, 6, 1)),
            CardItem::new("b", "todo", "B").with_field("due", "Due", date(2024, 1, 15)),
        ];
        sort_cards(&mut cards, &SortConfig::ascending("due"));
        let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}

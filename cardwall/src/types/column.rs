//! Built board columns and their on-demand aggregates.

use super::card::{parse_formatted_number, CardItem, CardValue};
use serde::{Deserialize, Serialize};

/// One rendered column of the board: a bucket definition plus the cards
/// assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnItem {
    pub id: String,
    pub title: String,
    pub order: i64,
    #[serde(default)]
    pub cards: Vec<CardItem>,
}

impl ColumnItem {
    /// Create an empty column
    pub fn new(id: impl Into<String>, title: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
            cards: Vec::new(),
        }
    }

    /// Number of cards in the column
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    /// Aggregates over the column's current card list.
    ///
    /// Derived on demand, never stored: the sum covers the given numeric
    /// field and the currency symbol comes from the first formatted value
    /// that carries one.
    pub fn aggregate(&self, sum_field: Option<&str>) -> Aggregate {
        let mut aggregate = Aggregate {
            count: self.cards.len(),
            sum: None,
            currency: None,
        };

        let Some(field) = sum_field else {
            return aggregate;
        };

        for card in &self.cards {
            let Some(value) = card.value(field) else {
                continue;
            };
            let (amount, symbol) = match value {
                CardValue::Number { value, formatted } => {
                    let symbol = parse_formatted_number(formatted).and_then(|(_, s)| s);
                    (Some(*value), symbol)
                }
                CardValue::Text { value } => match parse_formatted_number(value) {
                    Some((n, s)) => (Some(n), s),
                    None => (None, None),
                },
                _ => (None, None),
            };
            if let Some(amount) = amount {
                aggregate.sum = Some(aggregate.sum.unwrap_or(0.0) + amount);
                if aggregate.currency.is_none() {
                    aggregate.currency = symbol;
                }
            }
        }

        aggregate
    }
}

/// Column-level aggregate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub count: usize,
    pub sum: Option<f64>,
    pub currency: Option<String>,
}

//! Quick-filter predicates.
//!
//! Every filter value travels as a single encoded string so it can be
//! round-tripped through host configuration untouched. Parsing never
//! fails: anything that is not a recognized numeric or date encoding is a
//! categorical match list.

use crate::types::CardValue;
use chrono::{Datelike, Duration, NaiveDate};

/// A parsed quick-filter predicate for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact match against one or more option keys
    Categorical(Vec<String>),
    Numeric(NumericOp),
    Date(DateRange),
}

/// Numeric comparison operators.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericOp {
    Gt(f64),
    Lt(f64),
    Gte(f64),
    Lte(f64),
    Between { low: f64, high: f64 },
}

/// Date-range vocabulary. Relative ranges resolve against the supplied
/// `today` at match time, keeping predicates pure.
#[derive(Debug, Clone, PartialEq)]
pub enum DateRange {
    Today,
    Last7,
    Last30,
    CurrentMonth,
    CurrentYear,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl Predicate {
    /// Parse an encoded filter value.
    pub fn parse(encoded: &str) -> Self {
        let encoded = encoded.trim();

        match encoded {
            "today" => return Self::Date(DateRange::Today),
            "last7" => return Self::Date(DateRange::Last7),
            "last30" => return Self::Date(DateRange::Last30),
            "currentMonth" => return Self::Date(DateRange::CurrentMonth),
            "currentYear" => return Self::Date(DateRange::CurrentYear),
            _ => {}
        }

        if let Some(rest) = encoded.strip_prefix("custom:") {
            if let Some((start, end)) = parse_date_pair(rest) {
                return Self::Date(DateRange::Custom { start, end });
            }
        }
        if let Some(op) = parse_numeric(encoded) {
            return Self::Numeric(op);
        }

        Self::Categorical(
            encoded
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Whether the given card value passes this predicate.
    ///
    /// Absent values never match an active filter.
    pub fn matches(&self, value: Option<&CardValue>, today: NaiveDate) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Self::Categorical(keys) => {
                let display = value.display();
                keys.iter().any(|k| k == &display)
            }
            Self::Numeric(op) => value.number().map(|n| op.matches(n)).unwrap_or(false),
            Self::Date(range) => value.date().map(|d| range.contains(d, today)).unwrap_or(false),
        }
    }
}

impl NumericOp {
    fn matches(&self, n: f64) -> bool {
        match self {
            Self::Gt(bound) => n > *bound,
            Self::Lt(bound) => n < *bound,
            Self::Gte(bound) => n >= *bound,
            Self::Lte(bound) => n <= *bound,
            Self::Between { low, high } => n >= *low && n <= *high,
        }
    }
}

impl DateRange {
    fn contains(&self, d: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Self::Today => d == today,
            Self::Last7 => d <= today && d >= today - Duration::days(6),
            Self::Last30 => d <= today && d >= today - Duration::days(29),
            Self::CurrentMonth => d.year() == today.year() && d.month() == today.month(),
            Self::CurrentYear => d.year() == today.year(),
            Self::Custom { start, end } => d >= *start && d <= *end,
        }
    }
}

fn parse_numeric(encoded: &str) -> Option<NumericOp> {
    if let Some(rest) = encoded.strip_prefix("between:") {
        let (a, b) = rest.split_once('|')?;
        let a: f64 = a.trim().parse().ok()?;
        let b: f64 = b.trim().parse().ok()?;
        // Normalize so low <= high regardless of entry order
        return Some(NumericOp::Between {
            low: a.min(b),
            high: a.max(b),
        });
    }

    let (prefix, ctor): (&str, fn(f64) -> NumericOp) = if encoded.starts_with("gte:") {
        ("gte:", NumericOp::Gte)
    } else if encoded.starts_with("lte:") {
        ("lte:", NumericOp::Lte)
    } else if encoded.starts_with("gt:") {
        ("gt:", NumericOp::Gt)
    } else if encoded.starts_with("lt:") {
        ("lt:", NumericOp::Lt)
    } else {
        return None;
    };

    let bound: f64 = encoded[prefix.len()..].trim().parse().ok()?;
    Some(ctor(bound))
}

fn parse_date_pair(rest: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (a, b) = rest.split_once('|')?;
    let a = NaiveDate::parse_from_str(a.trim(), "%Y-%m-%d").ok()?;
    let b = NaiveDate::parse_from_str(b.trim(), "%Y-%m-%d").ok()?;
    // Same normalization as between: the earlier date is the lower bound
    Some((a.min(b), a.max(b)))
}

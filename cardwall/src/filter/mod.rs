//! Quick filter / sort / search pipeline.
//!
//! Independently configured per-field predicates, a debounced full-text
//! search, and a single sort key compose into one pure reduction applied
//! between projection and column bucketing. Filter values travel as
//! encoded strings (see [`Predicate::parse`]) so presets and host
//! configuration can carry them verbatim.

mod predicate;
mod search;
mod sort;
mod state;

pub use predicate::{DateRange, NumericOp, Predicate};
pub use search::{matches_search, SearchDebouncer, SEARCH_DEBOUNCE};
pub use sort::{sort_cards, SortConfig, SortDirection};
pub use state::{apply, FilterPreset, FilterState, QuickFilterFieldConfig};

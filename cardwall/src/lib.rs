//! Board projection and mutation engine.
//!
//! Cardwall turns raw records from a backing store into a live, filterable,
//! sortable board: cards bucketed into columns by a user-selected grouping
//! dimension (a categorical option-set field, or the ordered stage sequence
//! of a business process flow), with drag-initiated moves persisted back to
//! the store through an optimistic, rollback-free reconciliation loop.
//!
//! ## Overview
//!
//! - **View catalog** - discovers the selectable grouping dimensions and
//!   the current-stage index of the primary process; every metadata fetch
//!   fails soft.
//! - **Record projector** - maps each record to a typed [`CardItem`];
//!   cards are rebuilt in full on every input change, never merged.
//! - **Column builder** - buckets cards into the active view's columns,
//!   injecting the synthetic unallocated column when it is earned.
//! - **Filter pipeline** - per-field quick filters, debounced full-text
//!   search, and a single sort key, composed as pure predicates.
//! - **Drag reconciler** - an explicit gesture state machine with click
//!   discrimination, optional pre-move validation, an optimistic splice,
//!   and a single-field persistence update followed by a forced refresh.
//!
//! ## Basic usage
//!
//! ```rust,no_run
//! use cardwall::{BoardOptions, BoardSession, DropTarget};
//! use cardwall_store::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new("task"));
//! let mut board = BoardSession::new(store, BoardOptions::new());
//!
//! board.refresh().await?;
//! for column in board.columns() {
//!     println!("{}: {} cards", column.title, column.count());
//! }
//!
//! // Move the first card of the first column to the second column
//! if let (Some(card), Some(dest)) = (
//!     board.columns().first().and_then(|c| c.cards.first()).map(|c| c.id.clone()),
//!     board.columns().get(1).map(|c| c.id.clone()),
//! ) {
//!     board.drag_start(&card)?;
//!     board.drag_drop(Some(DropTarget::new(dest, 0))).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod columns;
mod config;
mod error;
pub mod filter;
pub mod project;
mod reconcile;
mod session;
pub mod types;

// Re-export for trait implementations
pub use async_trait::async_trait;

pub use config::{keys, BoardOptions};
pub use error::{BoardError, Result};
pub use reconcile::{
    DragPhase, DragState, DropTarget, MoveContext, MoveGuard, MoveOutcome, MoveVerdict,
    CLICK_DRAG_THRESHOLD_PX, DROP_GRACE_WINDOW,
};
pub use session::{BoardSession, Notification, Severity};

// Re-export commonly used types
pub use filter::{
    FilterPreset, FilterState, QuickFilterFieldConfig, SearchDebouncer, SortConfig, SortDirection,
    SEARCH_DEBOUNCE,
};
pub use types::{
    Aggregate, CardField, CardItem, CardValue, ColumnDefinition, ColumnItem, ViewDefinition,
    ViewKind, UNALLOCATED_COLUMN, UNALLOCATED_TITLE,
};

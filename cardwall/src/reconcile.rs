//! Drag reconciler: explicit gesture state, click discrimination, and the
//! optimistic splice.
//!
//! The gesture is a real state value - `Idle → Dragging → (Committing |
//! Cancelled) → Idle` - not something inferred from timing, so tests can
//! drive it deterministically.

use crate::types::{CardItem, ColumnItem, ViewDefinition, UNALLOCATED_COLUMN};
use async_trait::async_trait;
use cardwall_store::RecordId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Pointer travel below this many pixels between press and release is a
/// click, not a drag.
pub const CLICK_DRAG_THRESHOLD_PX: f32 = 5.0;

/// Click handlers stay suppressed for this long after a drop, so the
/// pointer-up that ends a drag cannot double as a card click.
pub const DROP_GRACE_WINDOW: Duration = Duration::from_millis(300);

/// Where a drag gesture ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    /// Destination column id
    pub column: String,
    /// Insertion index within the destination column
    pub index: usize,
}

impl DropTarget {
    pub fn new(column: impl Into<String>, index: usize) -> Self {
        Self {
            column: column.into(),
            index,
        }
    }
}

/// The gesture state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum DragPhase {
    Idle,
    Dragging {
        record_id: RecordId,
        source_column: String,
        source_index: usize,
    },
    Committing,
    Cancelled,
}

/// Per-board drag state: the phase plus the post-drop click suppression
/// deadline. Owned by the board session, never ambient.
#[derive(Debug)]
pub struct DragState {
    phase: DragPhase,
    suppress_until: Option<Instant>,
}

impl Default for DragState {
    fn default() -> Self {
        Self {
            phase: DragPhase::Idle,
            suppress_until: None,
        }
    }
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Enter `Dragging` from `Idle`
    pub fn begin(&mut self, record_id: RecordId, source_column: String, source_index: usize) {
        self.phase = DragPhase::Dragging {
            record_id,
            source_column,
            source_index,
        };
    }

    /// Resolve the gesture as cancelled and start the grace window
    pub fn cancel(&mut self, now: Instant) {
        self.phase = DragPhase::Cancelled;
        self.suppress_until = Some(now + DROP_GRACE_WINDOW);
    }

    /// Enter `Committing` while the move is validated and persisted
    pub fn commit(&mut self) {
        self.phase = DragPhase::Committing;
    }

    /// Return to `Idle`, keeping the grace window ticking
    pub fn settle(&mut self, now: Instant) {
        if matches!(self.phase, DragPhase::Committing) {
            self.suppress_until = Some(now + DROP_GRACE_WINDOW);
        }
        self.phase = DragPhase::Idle;
    }

    /// Whether a pointer release may be honored as a card click.
    ///
    /// Never while a drag is in flight, never within the post-drop grace
    /// window, and only when total pointer travel stayed under the
    /// threshold.
    pub fn click_allowed(&self, moved_px: f32, now: Instant) -> bool {
        if moved_px >= CLICK_DRAG_THRESHOLD_PX {
            return false;
        }
        if !matches!(self.phase, DragPhase::Idle) {
            return false;
        }
        match self.suppress_until {
            Some(until) => now >= until,
            None => true,
        }
    }
}

/// Everything a validation hook gets to see before a move commits.
#[derive(Debug, Clone)]
pub struct MoveContext {
    pub record_id: RecordId,
    pub entity: String,
    pub source_column_title: String,
    pub destination_column_title: String,
    pub card: CardItem,
}

/// A validation hook's answer.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveVerdict {
    Allow,
    Deny { message: String },
}

/// Externally supplied pre-move validation. The engine blocks the commit
/// pending the verdict; a deny cancels the gesture with no store call.
#[async_trait]
pub trait MoveGuard: Send + Sync {
    async fn before_move(&self, ctx: &MoveContext) -> MoveVerdict;
}

/// How a drop resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Optimistic move applied and the update issued
    Committed,
    /// No-op drop: missing target, or same column and index
    Cancelled,
    /// The validation hook denied the move
    Vetoed { message: String },
}

/// The value written to the record's classification field for a drop on
/// the given column. The unallocated column clears the field.
pub fn write_value(view: &ViewDefinition, column_id: &str) -> Option<String> {
    if column_id == UNALLOCATED_COLUMN {
        return None;
    }
    view.column_by_id(column_id).map(|c| c.title.clone())
}

/// Optimistically move a card between columns, preserving every other
/// card's relative order. Returns false if the card or a column is gone.
pub fn splice(
    columns: &mut [ColumnItem],
    record_id: &RecordId,
    source_column: &str,
    destination_column: &str,
    destination_index: usize,
) -> bool {
    let Some(source) = columns.iter_mut().find(|c| c.id == source_column) else {
        return false;
    };
    let Some(position) = source.cards.iter().position(|c| &c.id == record_id) else {
        return false;
    };
    let mut card = source.cards.remove(position);

    let Some(destination) = columns.iter_mut().find(|c| c.id == destination_column) else {
        return false;
    };
    card.column = destination.id.clone();
    let index = destination_index.min(destination.cards.len());
    destination.cards.insert(index, card);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnDefinition;

    fn columns() -> Vec<ColumnItem> {
        let mut todo = ColumnItem::new("todo", "Todo", 0);
        todo.cards.push(CardItem::new("a", "todo", "A"));
        todo.cards.push(CardItem::new("b", "todo", "B"));
        let mut done = ColumnItem::new("done", "Done", 1);
        done.cards.push(CardItem::new("c", "done", "C"));
        vec![todo, done]
    }

    #[test]
    fn test_splice_moves_card_and_preserves_order() {
        let mut cols = columns();
        let moved = splice(&mut cols, &RecordId::from_string("a"), "todo", "done", 0);
        assert!(moved);

        let todo_ids: Vec<&str> = cols[0].cards.iter().map(|c| c.id.as_str()).collect();
        let done_ids: Vec<&str> = cols[1].cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(todo_ids, vec!["b"]);
        assert_eq!(done_ids, vec!["a", "c"]);
        assert_eq!(cols[1].cards[0].column, "done");
    }

    #[test]
    fn test_splice_clamps_destination_index() {
        let mut cols = columns();
        assert!(splice(&mut cols, &RecordId::from_string("a"), "todo", "done", 99));
        let done_ids: Vec<&str> = cols[1].cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(done_ids, vec!["c", "a"]);
    }

    #[test]
    fn test_splice_missing_card_is_a_noop() {
        let mut cols = columns();
        assert!(!splice(&mut cols, &RecordId::from_string("zz"), "todo", "done", 0));
        assert_eq!(cols[0].count(), 2);
        assert_eq!(cols[1].count(), 1);
    }

    #[test]
    fn test_write_value_resolution() {
        let view = ViewDefinition::option_set(
            "status",
            "Status",
            vec![ColumnDefinition::new("2", "Done", 1)],
        );
        assert_eq!(write_value(&view, "2"), Some("Done".to_string()));
        assert_eq!(write_value(&view, UNALLOCATED_COLUMN), None);
        assert_eq!(write_value(&view, "missing"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_suppression_lifecycle() {
        let mut drag = DragState::new();
        let now = Instant::now();

        // Idle, small movement: click goes through
        assert!(drag.click_allowed(1.0, now));
        // At or past the threshold it is a drag, not a click
        assert!(!drag.click_allowed(5.0, now));

        drag.begin(RecordId::from_string("a"), "todo".into(), 0);
        assert!(drag.is_dragging());
        assert!(!drag.click_allowed(1.0, now));

        drag.commit();
        drag.settle(now);
        assert_eq!(drag.phase(), &DragPhase::Idle);

        // Within the grace window clicks stay suppressed
        assert!(!drag.click_allowed(1.0, now));
        tokio::time::advance(DROP_GRACE_WINDOW).await;
        assert!(drag.click_allowed(1.0, Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_also_starts_grace_window() {
        let mut drag = DragState::new();
        drag.begin(RecordId::from_string("a"), "todo".into(), 0);
        let now = Instant::now();
        drag.cancel(now);
        assert_eq!(drag.phase(), &DragPhase::Cancelled);

        drag.settle(now);
        assert!(!drag.click_allowed(1.0, now));
        tokio::time::advance(DROP_GRACE_WINDOW).await;
        assert!(drag.click_allowed(1.0, Instant::now()));
    }
}

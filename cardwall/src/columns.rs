//! Column builder: bucket projected cards into the active view's columns.

use crate::project::Projection;
use crate::types::{ColumnItem, ViewDefinition, UNALLOCATED_COLUMN, UNALLOCATED_TITLE};

/// Build the board's columns from a (possibly filtered) projection.
///
/// Columns follow the view's defined order. Non-process views get a
/// synthetic unallocated column prepended when the projection earned one.
/// A card whose key matches no column is dropped from the rendered board;
/// that is the accepted outcome for inconsistent configuration.
pub fn build(projection: Projection, view: &ViewDefinition) -> Vec<ColumnItem> {
    let mut columns: Vec<ColumnItem> =
        Vec::with_capacity(view.columns.len() + usize::from(projection.needs_unallocated));

    if !view.is_process() && projection.needs_unallocated {
        columns.push(ColumnItem::new(UNALLOCATED_COLUMN, UNALLOCATED_TITLE, 0));
    }
    columns.extend(
        view.columns
            .iter()
            .map(|c| ColumnItem::new(c.id.clone(), c.title.clone(), c.order)),
    );

    for card in projection.cards {
        match columns.iter_mut().find(|c| c.id == card.column) {
            Some(column) => column.cards.push(card),
            None => {
                tracing::debug!(record = %card.id, key = %card.column, "card matches no column, dropped from board");
            }
        }
    }

    columns
}

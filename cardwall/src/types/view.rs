//! View types: the grouping dimensions a board can be bucketed by.

use serde::{Deserialize, Serialize};

/// Reserved column id for records that resolve to no defined bucket.
pub const UNALLOCATED_COLUMN: &str = "unallocated";

/// Display title of the synthetic unallocated column.
pub const UNALLOCATED_TITLE: &str = "Unallocated";

/// What kind of grouping dimension a view is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    /// Static categorical field backed by an option set
    OptionSet,
    /// Ordered stage sequence of a business process flow
    Process,
}

/// One bucket of a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub id: String,
    pub title: String,
    pub order: i64,
}

impl ColumnDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
        }
    }
}

/// A grouping dimension selectable by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// Field name, or the process discriminator for process views
    pub key: String,
    /// Display label
    pub text: String,
    pub kind: ViewKind,
    /// Field name used to write moves back to the store
    pub unique_name: String,
    /// Ordered buckets
    pub columns: Vec<ColumnDefinition>,
}

impl ViewDefinition {
    /// View over a categorical option-set field. Moves write back to the
    /// same field the view groups by.
    pub fn option_set(
        key: impl Into<String>,
        text: impl Into<String>,
        columns: Vec<ColumnDefinition>,
    ) -> Self {
        let key = key.into();
        Self {
            unique_name: key.clone(),
            key,
            text: text.into(),
            kind: ViewKind::OptionSet,
            columns,
        }
    }

    /// View over the stage sequence of a business process flow
    pub fn process(
        key: impl Into<String>,
        text: impl Into<String>,
        unique_name: impl Into<String>,
        columns: Vec<ColumnDefinition>,
    ) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            kind: ViewKind::Process,
            unique_name: unique_name.into(),
            columns,
        }
    }

    pub fn is_process(&self) -> bool {
        self.kind == ViewKind::Process
    }

    /// Find a bucket by its display title
    pub fn column_by_title(&self, title: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.title == title)
    }

    /// Find a bucket by id
    pub fn column_by_id(&self, id: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.id == id)
    }
}

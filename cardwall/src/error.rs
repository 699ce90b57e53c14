//! Error types for the board engine

use cardwall_store::StoreError;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// View not found in the discovered catalog
    #[error("view not found: {key}")]
    ViewNotFound { key: String },

    /// Column not found in the active view
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// Card not found on the board
    #[error("card not found: {id}")]
    CardNotFound { id: String },

    /// A drop was reported without an active drag gesture
    #[error("no drag gesture in progress")]
    NoActiveDrag,

    /// No view is active, so there is nothing to project or move against
    #[error("no active view")]
    NoActiveView,

    /// Backing store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BoardError {
    /// Create a view-not-found error
    pub fn view_not_found(key: impl Into<String>) -> Self {
        Self::ViewNotFound { key: key.into() }
    }

    /// Create a column-not-found error
    pub fn column_not_found(id: impl Into<String>) -> Self {
        Self::ColumnNotFound { id: id.into() }
    }

    /// Create a card-not-found error
    pub fn card_not_found(id: impl Into<String>) -> Self {
        Self::CardNotFound { id: id.into() }
    }
}

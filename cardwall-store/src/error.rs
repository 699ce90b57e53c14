//! Error types for the store collaborator surface

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur at the backing-store boundary
#[derive(Debug, Error)]
pub enum StoreError {
    /// A metadata or record fetch failed
    #[error("fetch failed: {message}")]
    Fetch { message: String },

    /// A record update failed
    #[error("update failed for {record_id}: {message}")]
    Update { record_id: String, message: String },

    /// No further pages are available to load
    #[error("no further pages available")]
    NoMorePages,
}

impl StoreError {
    /// Create a fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create an update error
    pub fn update(record_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Update {
            record_id: record_id.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::fetch("metadata endpoint unreachable");
        assert_eq!(err.to_string(), "fetch failed: metadata endpoint unreachable");

        let err = StoreError::update("rec-1", "precondition failed");
        assert_eq!(err.to_string(), "update failed for rec-1: precondition failed");
    }
}

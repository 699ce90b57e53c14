//! Error type for field rules and configuration parsing

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A recoverable per-key configuration problem.
///
/// Issues never abort rendering: the offending key falls back to an empty
/// set/map and the issue is collected for surfacing, so one malformed list
/// does not mask the others.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("invalid configuration for {key}: {message}")]
pub struct ConfigIssue {
    pub key: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

//! Typed per-field presentation rules for the cardwall board engine.
//!
//! The embedding host hands the board a bag of loosely-typed string options:
//! field lists as JSON arrays or comma lists, field→value maps, a stage
//! ordering table. This crate parses that surface exactly once into a typed
//! [`FieldRules`] table plus a list of per-key [`ConfigIssue`]s, so the
//! engine never re-parses configuration on a render path and a malformed
//! value degrades one key instead of the whole board.

mod error;
pub mod parse;
mod types;

pub use error::ConfigIssue;
pub use types::{FieldRule, FieldRules, LinkStyle, StageOrder};

//! Backing record store collaborator surface for the cardwall board engine.
//!
//! The engine never talks to a concrete store directly: everything it needs
//! (the record query, paging, option-set and process metadata, single-field
//! updates) goes through the [`RecordStore`] trait defined here. Records
//! are read-only to the engine and expose every field as a raw tagged value
//! plus the store's formatted display string.
//!
//! [`MemoryStore`] is a scriptable in-memory implementation used by tests.

mod error;
mod memory;
mod store;
mod types;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::RecordStore;
pub use types::{
    entity_set_name, ColumnKind, ColumnSpec, CurrentStage, Dataset, EntityRef, FieldValue,
    OptionValue, RawValue, Record, RecordId, RecordUpdate, StageDef,
};

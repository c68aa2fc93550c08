//! Resource store: one persisted, observable table per record type.

pub mod backend;
pub mod json_file;
pub mod resource_table;

pub use backend::{MemoryTableBackend, TableBackend};
pub use json_file::JsonTableBackend;
pub use resource_table::ResourceTable;

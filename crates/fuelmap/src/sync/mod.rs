//! Synchronizer: pulls a domain's remote records into its resource store.

pub mod report;
pub mod synchronizer;

pub use report::{SyncMode, SyncReport};
pub use synchronizer::Synchronizer;

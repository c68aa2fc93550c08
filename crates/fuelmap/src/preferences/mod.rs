//! Preference store: the single versioned `UserData` record.

pub mod backend;
pub mod store;

pub use backend::{JsonPreferenceBackend, MemoryPreferenceBackend, PreferenceBackend};
pub use store::PreferenceStore;

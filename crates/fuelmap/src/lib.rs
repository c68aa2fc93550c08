//! Reactive data layer for the CNG station finder
//!
//! Remote data flows through the `Synchronizer` into persisted resource
//! tables; domain repositories turn table snapshots into live, queried lists;
//! user repositories join those lists with user preferences and the device
//! location.

pub mod config;
pub mod data_layer;
pub mod geo;
pub mod location;
pub mod preferences;
pub mod query;
pub mod repository;
pub mod storage;
pub mod sync;
pub mod telemetry;
pub mod user;

pub use config::{DataLayerConfig, RemoteConfig};
pub use data_layer::DataLayer;
pub use location::ManualLocationProvider;
pub use preferences::{
    JsonPreferenceBackend, MemoryPreferenceBackend, PreferenceBackend, PreferenceStore,
};
pub use repository::{
    CareersRepository, FaqRepository, NewsRepository, PricesRepository, ResourceRepository,
    StationsRepository,
};
pub use storage::{JsonTableBackend, MemoryTableBackend, ResourceTable, TableBackend};
pub use sync::{SyncMode, SyncReport, Synchronizer};
pub use user::{UserNewsRepository, UserStationsRepository};

//! Core abstractions for the fuelmap data layer
//!
//! This crate provides the seams every layer is built against:
//! - `Live`: a push-based observable value with map/combine/switch combinators
//! - `Predicate`: composable record filters
//! - `ResourceStore`, `RemoteSource`, `LocationProvider`: storage and input traits

pub mod live;
pub mod snapshot;
pub mod traits;

pub use live::Live;
pub use snapshot::Snapshot;
pub use traits::{
    Always, And, LocationProvider, Not, Or, Predicate, RawRecord, RecordStream, RemoteSource,
    ResourceStore, UpsertReport,
};

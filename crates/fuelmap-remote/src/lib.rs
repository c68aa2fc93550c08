//! Remote sources for the fuelmap data layer
//!
//! - `HttpRemoteSource`: fetches each domain from the operator backend
//! - `FakeRemoteSource`: scripted records with injectable failures for tests and offline use

pub mod client;
pub mod fake;

pub use client::HttpRemoteSource;
pub use fake::FakeRemoteSource;

//! Scripted remote source for tests and offline mode
//!
//! Serves whatever records were set per domain, optionally after a delay, and
//! can be told to fail partway through a stream.

use async_trait::async_trait;
use futures::StreamExt;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

use fuelmap_api::{Domain, RemoteError, Resource};
use fuelmap_core::{RawRecord, RecordStream, RemoteSource};

#[derive(Default)]
struct FakeState {
    records: HashMap<Domain, Vec<RawRecord>>,
    /// Stream errors after this many records
    fail_after: HashMap<Domain, usize>,
    delay: Option<Duration>,
    fetch_counts: HashMap<Domain, usize>,
}

/// In-memory remote source with scripted records per domain.
///
/// Domains with no records set report `RemoteError::Unavailable`.
#[derive(Default)]
pub struct FakeRemoteSource {
    state: Mutex<FakeState>,
}

impl FakeRemoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        // The state is plain data; a panic mid-update cannot leave it inconsistent.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_records(&self, domain: Domain, records: Vec<RawRecord>) {
        self.state().records.insert(domain, records);
    }

    /// Serve `resources` as the full remote contents of their domain
    pub fn set_resources<T: Resource>(&self, resources: &[T]) {
        let records = resources.iter().map(to_raw).collect();
        self.set_records(T::DOMAIN, records);
    }

    /// Fail the stream with a network error after `count` records
    pub fn fail_after(&self, domain: Domain, count: usize) {
        self.state().fail_after.insert(domain, count);
    }

    pub fn clear_failure(&self, domain: Domain) {
        self.state().fail_after.remove(&domain);
    }

    /// Latency applied before every fetch responds
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.state().delay = delay;
    }

    pub fn fetch_count(&self, domain: Domain) -> usize {
        self.state().fetch_counts.get(&domain).copied().unwrap_or(0)
    }
}

fn to_raw<T: Serialize>(value: &T) -> RawRecord {
    serde_json::to_value(value).unwrap_or(RawRecord::Null)
}

#[async_trait]
impl RemoteSource for FakeRemoteSource {
    fn source_id(&self) -> &str {
        "fake"
    }

    async fn fetch(&self, domain: Domain) -> Result<RecordStream, RemoteError> {
        let (records, fail_after, delay) = {
            let mut state = self.state();
            *state.fetch_counts.entry(domain).or_insert(0) += 1;
            (
                state.records.get(&domain).cloned(),
                state.fail_after.get(&domain).copied(),
                state.delay,
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let records = records.ok_or(RemoteError::Unavailable { domain })?;
        debug!(
            "[FakeRemoteSource] Serving {} {} records (fail_after={:?})",
            records.len(),
            domain,
            fail_after
        );

        let items: Vec<Result<RawRecord, RemoteError>> = match fail_after {
            Some(count) => records
                .into_iter()
                .take(count)
                .map(Ok)
                .chain(std::iter::once(Err(RemoteError::Network {
                    message: format!("injected failure after {} {} records", count, domain),
                })))
                .collect(),
            None => records.into_iter().map(Ok).collect(),
        };
        Ok(futures::stream::iter(items).boxed())
    }
}

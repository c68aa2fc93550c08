use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn};

use fuelmap_api::{Domain, Resource, SyncError};
use fuelmap_core::{RemoteSource, ResourceStore};

use super::{SyncMode, SyncReport};

type SharedSync = Shared<BoxFuture<'static, Result<SyncReport, SyncError>>>;

/// Domain plus the address of the target store
type FlightKey = (Domain, usize);

fn flight_key<T: Resource>(store: &Arc<dyn ResourceStore<T>>) -> FlightKey {
    (T::DOMAIN, Arc::as_ptr(store) as *const () as usize)
}

struct InFlight {
    ticket: u64,
    result: SharedSync,
}

/// Pulls full domain snapshots from a [`RemoteSource`] into resource stores.
///
/// At most one attempt per domain and store runs at a time; callers syncing
/// the same store while one is in flight await that attempt's result instead
/// of starting another. Attempts run on their own task, so a caller going
/// away never cancels one.
pub struct Synchronizer {
    remote: Arc<dyn RemoteSource>,
    mode: SyncMode,
    in_flight: Arc<Mutex<HashMap<FlightKey, InFlight>>>,
    next_ticket: AtomicU64,
}

impl Synchronizer {
    pub fn new(remote: Arc<dyn RemoteSource>) -> Self {
        Self::with_mode(remote, SyncMode::default())
    }

    pub fn with_mode(remote: Arc<dyn RemoteSource>, mode: SyncMode) -> Self {
        Self {
            remote,
            mode,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn is_syncing(&self, domain: Domain) -> bool {
        self.in_flight
            .lock()
            .map(|in_flight| in_flight.keys().any(|(d, _)| *d == domain))
            .unwrap_or(false)
    }

    /// Synchronize `T`'s domain into `store`.
    ///
    /// `true` only if the fetch succeeded, every record parsed and every record
    /// was accepted by the store.
    pub async fn sync<T: Resource>(&self, store: Arc<dyn ResourceStore<T>>) -> bool {
        match self.sync_detailed(store).await {
            Ok(report) => report.is_clean(),
            Err(_) => false,
        }
    }

    pub async fn sync_detailed<T: Resource>(
        &self,
        store: Arc<dyn ResourceStore<T>>,
    ) -> Result<SyncReport, SyncError> {
        let domain = T::DOMAIN;
        let key = flight_key(&store);
        let attempt = {
            let mut in_flight = self
                .in_flight
                .lock()
                .map_err(|e| SyncError::Aborted(format!("in-flight registry poisoned: {}", e)))?;

            match in_flight.get(&key) {
                Some(existing) => {
                    debug!("[Synchronizer] Joining in-flight {} sync", domain);
                    existing.result.clone()
                }
                None => {
                    let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst);
                    let attempt = self.spawn_attempt(store, key, ticket);
                    in_flight.insert(
                        key,
                        InFlight {
                            ticket,
                            result: attempt.clone(),
                        },
                    );
                    attempt
                }
            }
        };

        let result = attempt.await;
        if let Err(e) = &result {
            warn!("[Synchronizer] {} sync failed: {}", domain, e);
        }
        result
    }

    fn spawn_attempt<T: Resource>(
        &self,
        store: Arc<dyn ResourceStore<T>>,
        key: FlightKey,
        ticket: u64,
    ) -> SharedSync {
        let remote = self.remote.clone();
        let mode = self.mode;
        let registry = self.in_flight.clone();

        let handle = tokio::spawn(async move {
            let result = run_attempt(remote, store, mode).await;
            // Only remove our own entry; a later attempt may have replaced it.
            if let Ok(mut in_flight) = registry.lock() {
                if in_flight
                    .get(&key)
                    .is_some_and(|entry| entry.ticket == ticket)
                {
                    in_flight.remove(&key);
                }
            }
            result
        });

        async move {
            handle
                .await
                .unwrap_or_else(|e| Err(SyncError::Aborted(e.to_string())))
        }
        .boxed()
        .shared()
    }
}

#[tracing::instrument(name = "fuelmap.sync", skip(remote, store), fields(domain = %T::DOMAIN))]
async fn run_attempt<T: Resource>(
    remote: Arc<dyn RemoteSource>,
    store: Arc<dyn ResourceStore<T>>,
    mode: SyncMode,
) -> Result<SyncReport, SyncError> {
    let started = Instant::now();
    let mut stream = remote.fetch(T::DOMAIN).await?;

    // Parse everything before touching the store so a failure leaves it as is.
    let mut records: Vec<T> = Vec::new();
    while let Some(raw) = stream.next().await {
        let raw = raw?;
        let index = records.len();
        let record = serde_json::from_value(raw).map_err(|e| SyncError::Parse {
            index,
            message: e.to_string(),
        })?;
        records.push(record);
    }

    let fetched = records.len();
    let synced_at = Utc::now();
    for record in &mut records {
        record.mark_synced(synced_at);
    }

    let written = match mode {
        SyncMode::Upsert => store.upsert_all(records).await?,
        SyncMode::Replace => store.replace_all(records).await?,
    };

    let report = SyncReport {
        domain: T::DOMAIN,
        fetched,
        accepted: written.accepted,
        rejected: written.rejected,
        version: written.version,
        duration: started.elapsed(),
    };
    info!(
        "[Synchronizer] Synced {} from {}: fetched={}, accepted={}, rejected={}, version={}, took {:?}",
        report.domain,
        remote.source_id(),
        report.fetched,
        report.accepted,
        report.rejected.len(),
        report.version,
        report.duration
    );
    Ok(report)
}

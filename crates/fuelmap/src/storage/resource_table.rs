use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use fuelmap_api::{RejectedRecord, Resource, StoreError};
use fuelmap_core::{Live, Predicate, ResourceStore, Snapshot, UpsertReport};

use super::{MemoryTableBackend, TableBackend};

/// Persisted, observable table of one record type.
///
/// Writers are serialized by an async lock held across the whole
/// validate, persist and publish cycle. Readers never take the lock; they
/// see the last published snapshot.
pub struct ResourceTable<T: Resource> {
    backend: Arc<dyn TableBackend<T>>,
    writer: Mutex<()>,
    snapshot_tx: watch::Sender<Arc<Snapshot<T>>>,
}

impl<T: Resource> ResourceTable<T> {
    /// Load the table's persisted contents as snapshot version 0
    pub async fn open(backend: Arc<dyn TableBackend<T>>) -> Result<Self, StoreError> {
        let records = backend.load().await?;
        info!(
            "[ResourceTable] Opened table '{}' with {} records",
            backend.table_name(),
            records.len()
        );
        Ok(Self::from_records(backend, records))
    }

    pub fn in_memory() -> Self {
        Self::from_records(Arc::new(MemoryTableBackend::<T>::new()), BTreeMap::new())
    }

    fn from_records(backend: Arc<dyn TableBackend<T>>, records: BTreeMap<String, T>) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(Snapshot::new(0, records)));
        Self {
            backend,
            writer: Mutex::new(()),
            snapshot_tx,
        }
    }

    /// Last published snapshot
    pub fn current(&self) -> Arc<Snapshot<T>> {
        self.snapshot_tx.borrow().clone()
    }

    async fn write(&self, records: Vec<T>, replace: bool) -> Result<UpsertReport, StoreError> {
        let _guard = self.writer.lock().await;
        let current = self.current();
        let table = self.backend.table_name();

        let mut next = if replace {
            BTreeMap::new()
        } else {
            current.to_map()
        };
        let mut report = UpsertReport {
            version: current.version(),
            ..UpsertReport::default()
        };

        for (index, record) in records.into_iter().enumerate() {
            match record.validate() {
                Ok(()) => {
                    next.insert(record.id().to_string(), record);
                    report.accepted += 1;
                }
                Err(reason) => {
                    warn!(
                        "[ResourceTable] Rejected record {} ('{}') for table '{}': {}",
                        index,
                        record.id(),
                        table,
                        reason
                    );
                    report.rejected.push(RejectedRecord {
                        index,
                        id: record.id().to_string(),
                        reason,
                    });
                }
            }
        }

        // A batch that was entirely rejected must not prune the table either.
        if report.accepted == 0 && (!replace || !report.rejected.is_empty()) {
            debug!("[ResourceTable] Nothing to write for table '{}'", table);
            return Ok(report);
        }

        self.backend.persist(&next).await?;

        let snapshot = Arc::new(Snapshot::new(current.version() + 1, next));
        report.version = snapshot.version();
        info!(
            "[ResourceTable] Table '{}' now at version {} ({} records, {} accepted, {} rejected)",
            table,
            snapshot.version(),
            snapshot.len(),
            report.accepted,
            report.rejected.len()
        );
        self.snapshot_tx.send_replace(snapshot);
        Ok(report)
    }
}

#[async_trait]
impl<T: Resource> ResourceStore<T> for ResourceTable<T> {
    fn table_name(&self) -> &str {
        self.backend.table_name()
    }

    async fn upsert_all(&self, records: Vec<T>) -> Result<UpsertReport, StoreError> {
        self.write(records, false).await
    }

    async fn replace_all(&self, records: Vec<T>) -> Result<UpsertReport, StoreError> {
        self.write(records, true).await
    }

    async fn query_all(&self, predicate: &dyn Predicate<T>) -> Vec<T> {
        self.current()
            .records()
            .filter(|record| predicate.test(record))
            .cloned()
            .collect()
    }

    async fn query_one(&self, id: &str) -> Option<T> {
        self.current().get(id).cloned()
    }

    fn snapshot(&self) -> Live<Arc<Snapshot<T>>> {
        Live::from(self.snapshot_tx.subscribe())
    }
}

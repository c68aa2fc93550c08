use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use fuelmap_api::{Resource, StoreError};

/// Durable substrate behind a [`ResourceTable`](super::ResourceTable).
///
/// `persist` always receives the complete table contents.
#[async_trait]
pub trait TableBackend<T: Resource>: Send + Sync {
    fn table_name(&self) -> &str;

    async fn load(&self) -> Result<BTreeMap<String, T>, StoreError>;

    async fn persist(&self, records: &BTreeMap<String, T>) -> Result<(), StoreError>;
}

/// Keeps the last persisted contents in memory only.
pub struct MemoryTableBackend<T> {
    table: String,
    persisted: Mutex<BTreeMap<String, T>>,
}

impl<T: Resource> MemoryTableBackend<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Start from pre-existing contents, as if loaded from disk
    pub fn with_records(records: Vec<T>) -> Self {
        let persisted = records
            .into_iter()
            .map(|record| (record.id().to_string(), record))
            .collect();
        Self {
            table: T::DOMAIN.as_str().to_string(),
            persisted: Mutex::new(persisted),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, T>>, StoreError> {
        self.persisted.lock().map_err(|e| StoreError::Io {
            table: self.table.clone(),
            message: format!("memory backend poisoned: {}", e),
        })
    }
}

impl<T: Resource> Default for MemoryTableBackend<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Resource> TableBackend<T> for MemoryTableBackend<T> {
    fn table_name(&self) -> &str {
        &self.table
    }

    async fn load(&self) -> Result<BTreeMap<String, T>, StoreError> {
        Ok(self.lock()?.clone())
    }

    async fn persist(&self, records: &BTreeMap<String, T>) -> Result<(), StoreError> {
        *self.lock()? = records.clone();
        Ok(())
    }
}

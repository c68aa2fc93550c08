//! Table backend storing each table as one JSON document on disk.
//!
//! Layout: `{data_dir}/{table}.json` holding `{"version": N, "records": [...]}`.
//! Writes go to a sibling temp file which is then renamed over the target, so
//! a crash mid-write never leaves a truncated table behind.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use fuelmap_api::{Resource, StoreError};

use super::TableBackend;

/// Current on-disk table format
pub const TABLE_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    records: Vec<&'a T>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    version: u32,
    #[serde(default)]
    records: Vec<T>,
}

pub struct JsonTableBackend {
    table: String,
    path: PathBuf,
}

impl JsonTableBackend {
    pub fn new(data_dir: impl AsRef<Path>, table: impl Into<String>) -> Self {
        let table = table.into();
        let path = data_dir.as_ref().join(format!("{}.json", table));
        Self { table, path }
    }

    pub fn for_resource<T: Resource>(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir, T::DOMAIN.as_str())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, action: &str, e: std::io::Error) -> StoreError {
        StoreError::Io {
            table: self.table.clone(),
            message: format!("Failed to {} {}: {}", action, self.path.display(), e),
        }
    }

    fn serialization_error(&self, e: serde_json::Error) -> StoreError {
        StoreError::Serialization {
            table: self.table.clone(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl<T: Resource> TableBackend<T> for JsonTableBackend {
    fn table_name(&self) -> &str {
        &self.table
    }

    async fn load(&self) -> Result<BTreeMap<String, T>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("[JsonTableBackend] No file for table '{}', starting empty", self.table);
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(self.io_error("read", e)),
        };

        let envelope: Envelope<T> =
            serde_json::from_str(&content).map_err(|e| self.serialization_error(e))?;
        if envelope.version > TABLE_FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                table: self.table.clone(),
                found: envelope.version,
                supported: TABLE_FORMAT_VERSION,
            });
        }

        debug!(
            "[JsonTableBackend] Loaded {} records for table '{}'",
            envelope.records.len(),
            self.table
        );
        Ok(envelope
            .records
            .into_iter()
            .map(|record| (record.id().to_string(), record))
            .collect())
    }

    async fn persist(&self, records: &BTreeMap<String, T>) -> Result<(), StoreError> {
        let envelope = EnvelopeRef {
            version: TABLE_FORMAT_VERSION,
            records: records.values().collect(),
        };
        let json = serde_json::to_vec_pretty(&envelope).map_err(|e| self.serialization_error(e))?;

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| self.io_error("create directory for", e))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|e| self.io_error("write", e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.io_error("replace", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelmap_api::News;

    fn news(id: &str) -> News {
        News {
            id: id.to_string(),
            title: format!("News {id}"),
            ..News::default()
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonTableBackend::for_resource::<News>(dir.path());
        let loaded: BTreeMap<String, News> = backend.load().await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_persist_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonTableBackend::for_resource::<News>(dir.path().join("nested"));

        let records: BTreeMap<String, News> =
            [news("a"), news("b")].into_iter().map(|n| (n.id.clone(), n)).collect();
        backend.persist(&records).await.unwrap();

        assert!(backend.path().ends_with("news.json"));
        assert!(!backend.path().with_extension("json.tmp").exists());
        let loaded: BTreeMap<String, News> = backend.load().await.unwrap();
        assert_eq!(loaded, records);
    }

    #[tokio::test]
    async fn test_future_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonTableBackend::for_resource::<News>(dir.path());
        std::fs::write(backend.path(), r#"{"version": 99, "records": []}"#).unwrap();

        let result: Result<BTreeMap<String, News>, _> = backend.load().await;
        assert!(matches!(
            result,
            Err(StoreError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonTableBackend::for_resource::<News>(dir.path());
        std::fs::write(backend.path(), "not json").unwrap();

        let result: Result<BTreeMap<String, News>, _> = backend.load().await;
        assert!(matches!(result, Err(StoreError::Serialization { .. })));
    }
}

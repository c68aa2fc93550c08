use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use fuelmap_api::{PreferenceError, USER_DATA_VERSION, UserData};

#[async_trait]
pub trait PreferenceBackend: Send + Sync {
    /// `None` when nothing has been persisted yet
    async fn load(&self) -> Result<Option<UserData>, PreferenceError>;

    async fn persist(&self, data: &UserData) -> Result<(), PreferenceError>;
}

#[derive(Default)]
pub struct MemoryPreferenceBackend {
    persisted: Mutex<Option<UserData>>,
}

impl MemoryPreferenceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<UserData>>, PreferenceError> {
        self.persisted
            .lock()
            .map_err(|e| PreferenceError::Io(format!("memory backend poisoned: {}", e)))
    }
}

#[async_trait]
impl PreferenceBackend for MemoryPreferenceBackend {
    async fn load(&self) -> Result<Option<UserData>, PreferenceError> {
        Ok(self.lock()?.clone())
    }

    async fn persist(&self, data: &UserData) -> Result<(), PreferenceError> {
        *self.lock()? = Some(data.clone());
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a> {
    version: u32,
    user_data: &'a UserData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    version: u32,
    #[serde(default)]
    user_data: UserData,
}

/// Stores `UserData` as `{"version": N, "userData": {...}}` in one file.
pub struct JsonPreferenceBackend {
    path: PathBuf,
}

impl JsonPreferenceBackend {
    pub const FILE_NAME: &'static str = "user_data.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PreferenceBackend for JsonPreferenceBackend {
    async fn load(&self) -> Result<Option<UserData>, PreferenceError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("[JsonPreferenceBackend] No preferences at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(PreferenceError::Io(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let envelope: Envelope = serde_json::from_str(&content)
            .map_err(|e| PreferenceError::Serialization(e.to_string()))?;
        if envelope.version > USER_DATA_VERSION {
            return Err(PreferenceError::UnsupportedVersion {
                found: envelope.version,
                supported: USER_DATA_VERSION,
            });
        }
        Ok(Some(envelope.user_data))
    }

    async fn persist(&self, data: &UserData) -> Result<(), PreferenceError> {
        let envelope = EnvelopeRef {
            version: USER_DATA_VERSION,
            user_data: data,
        };
        let json = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| PreferenceError::Serialization(e.to_string()))?;

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| PreferenceError::Io(format!("Failed to create {}: {}", dir.display(), e)))?;
        }
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|e| PreferenceError::Io(format!("Failed to write {}: {}", temp_path.display(), e)))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| PreferenceError::Io(format!("Failed to replace {}: {}", self.path.display(), e)))?;
        Ok(())
    }
}

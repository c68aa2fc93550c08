use serde::{Deserialize, Serialize};
use std::time::Duration;

use fuelmap_api::{Domain, RejectedRecord};

/// How fetched records are written to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Insert or replace fetched records, keep everything else
    #[default]
    Upsert,
    /// Make the table mirror the remote, dropping records it no longer lists
    Replace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub domain: Domain,
    pub fetched: usize,
    pub accepted: usize,
    pub rejected: Vec<RejectedRecord>,
    pub version: u64,
    pub duration: Duration,
}

impl SyncReport {
    /// Every fetched record made it into the store
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

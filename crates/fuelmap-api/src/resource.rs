//! Contract every synchronized record type fulfils.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::Debug;

use crate::{Domain, RecordError};

/// A snapshot entity owned by a resource table.
///
/// `Default` doubles as the placeholder emitted for lookups of absent ids,
/// so the default value must carry an empty identifier.
pub trait Resource:
    Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Domain this record type is synchronized under
    const DOMAIN: Domain;

    /// Stable identifier (station code, news id, ...)
    fn id(&self) -> &str;

    /// Text fields matched by a query's `search_query`
    fn search_text(&self) -> Vec<&str>;

    fn is_pinned(&self) -> bool {
        false
    }

    /// Domain-specific category used by type-set filters (station type)
    fn type_tag(&self) -> Option<&str> {
        None
    }

    fn last_synced(&self) -> Option<DateTime<Utc>>;

    fn mark_synced(&mut self, at: DateTime<Utc>);

    /// Identifier non-emptiness is the only structural requirement.
    fn validate(&self) -> Result<(), RecordError> {
        if self.id().trim().is_empty() {
            Err(RecordError::EmptyId)
        } else {
            Ok(())
        }
    }

    fn is_placeholder(&self) -> bool {
        self.id().is_empty()
    }
}

/// Sort key extractor for one record type.
///
/// `compare` defines ascending order; descending is its reverse. Ties must
/// return `Ordering::Equal` so the stable sort keeps prior relative order.
pub trait SortingType<T>: Clone + Copy + Debug + Default + PartialEq + Send + Sync + 'static {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

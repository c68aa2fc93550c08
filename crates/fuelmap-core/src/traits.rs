use async_trait::async_trait;
use futures::Stream;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use fuelmap_api::{Domain, Location, RejectedRecord, RemoteError, Resource, StoreError};

use crate::{Live, Snapshot};

pub trait Predicate<T>: Send + Sync {
    fn test(&self, item: &T) -> bool;

    fn and<P>(self, other: P) -> And<T, Self, P>
    where
        Self: Sized,
        P: Predicate<T>,
    {
        And {
            left: self,
            right: other,
            _phantom: PhantomData,
        }
    }

    fn or<P>(self, other: P) -> Or<T, Self, P>
    where
        Self: Sized,
        P: Predicate<T>,
    {
        Or {
            left: self,
            right: other,
            _phantom: PhantomData,
        }
    }

    fn not(self) -> Not<T, Self>
    where
        Self: Sized,
    {
        Not {
            inner: self,
            _phantom: PhantomData,
        }
    }
}

impl<T> Predicate<T> for Box<dyn Predicate<T>>
where
    T: Send + Sync,
{
    fn test(&self, item: &T) -> bool {
        (**self).test(item)
    }
}

/// Matches every item
pub struct Always;

impl<T> Predicate<T> for Always {
    fn test(&self, _item: &T) -> bool {
        true
    }
}

pub struct And<T, L, R> {
    left: L,
    right: R,
    _phantom: PhantomData<fn(&T)>,
}

impl<T, L, R> Predicate<T> for And<T, L, R>
where
    L: Predicate<T>,
    R: Predicate<T>,
{
    fn test(&self, item: &T) -> bool {
        self.left.test(item) && self.right.test(item)
    }
}

pub struct Or<T, L, R> {
    left: L,
    right: R,
    _phantom: PhantomData<fn(&T)>,
}

impl<T, L, R> Predicate<T> for Or<T, L, R>
where
    L: Predicate<T>,
    R: Predicate<T>,
{
    fn test(&self, item: &T) -> bool {
        self.left.test(item) || self.right.test(item)
    }
}

pub struct Not<T, P> {
    inner: P,
    _phantom: PhantomData<fn(&T)>,
}

impl<T, P> Predicate<T> for Not<T, P>
where
    P: Predicate<T>,
{
    fn test(&self, item: &T) -> bool {
        !self.inner.test(item)
    }
}

/// Outcome of a batch write
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpsertReport {
    pub accepted: usize,
    pub rejected: Vec<RejectedRecord>,
    /// Snapshot version published by the write (unchanged if nothing was accepted)
    pub version: u64,
}

impl UpsertReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Persisted, observable table of one record type.
///
/// Every successful mutation publishes exactly one new snapshot, after the
/// data has been persisted. A failed mutation publishes nothing.
#[async_trait]
pub trait ResourceStore<T: Resource>: Send + Sync {
    fn table_name(&self) -> &str;

    /// Insert or replace each valid record by id. Invalid records are
    /// reported individually and do not abort the batch.
    async fn upsert_all(&self, records: Vec<T>) -> Result<UpsertReport, StoreError>;

    /// Like `upsert_all`, but records absent from `records` are removed.
    async fn replace_all(&self, records: Vec<T>) -> Result<UpsertReport, StoreError>;

    async fn query_all(&self, predicate: &dyn Predicate<T>) -> Vec<T>;

    async fn query_one(&self, id: &str) -> Option<T>;

    fn snapshot(&self) -> Live<Arc<Snapshot<T>>>;
}

/// One record as delivered by a remote source, before deserialization
pub type RawRecord = serde_json::Value;

pub type RecordStream = Pin<Box<dyn Stream<Item = Result<RawRecord, RemoteError>> + Send>>;

/// Remote source of truth for every domain.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    fn source_id(&self) -> &str;

    /// Full current record set of `domain`. Errors may surface when the
    /// request is made or at any point while the stream is consumed.
    async fn fetch(&self, domain: Domain) -> Result<RecordStream, RemoteError>;
}

pub trait LocationProvider: Send + Sync {
    /// `None` while the device position is unknown
    fn current_location(&self) -> Live<Option<Location>>;
}

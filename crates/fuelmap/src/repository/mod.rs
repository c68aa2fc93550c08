//! Domain repositories: live, queried views over one resource store.

use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

use fuelmap_api::{
    Career, CareerSortingType, Faq, FaqSortingType, News, NewsSortingType, Price,
    PriceSortingType, Resource, ResourceQuery, SortingOrder, SortingType, Station,
    StationSortingType,
};
use fuelmap_core::{Live, ResourceStore};

use crate::query;
use crate::sync::Synchronizer;

/// Read side of one domain.
///
/// Every observation re-evaluates its query once per published snapshot and
/// suppresses emissions equal to the previous one.
pub struct ResourceRepository<T: Resource, S> {
    store: Arc<dyn ResourceStore<T>>,
    _sorting: PhantomData<fn() -> S>,
}

pub type StationsRepository = ResourceRepository<Station, StationSortingType>;
pub type NewsRepository = ResourceRepository<News, NewsSortingType>;
pub type PricesRepository = ResourceRepository<Price, PriceSortingType>;
pub type CareersRepository = ResourceRepository<Career, CareerSortingType>;
pub type FaqRepository = ResourceRepository<Faq, FaqSortingType>;

impl<T: Resource, S> Clone for ResourceRepository<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _sorting: PhantomData,
        }
    }
}

impl<T, S> ResourceRepository<T, S>
where
    T: Resource,
    S: SortingType<T>,
{
    pub fn new(store: Arc<dyn ResourceStore<T>>) -> Self {
        Self {
            store,
            _sorting: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<dyn ResourceStore<T>> {
        &self.store
    }

    /// Live, filtered and sorted list of records matching `query`
    pub fn observe(&self, query: ResourceQuery<S>) -> Live<Arc<Vec<T>>> {
        let table = self.store.table_name().to_string();
        self.store
            .snapshot()
            .map(move |snapshot| {
                let records = query::apply(snapshot.records(), &query);
                debug!(
                    "[ResourceRepository] '{}' v{}: {} of {} records match",
                    table,
                    snapshot.version(),
                    records.len(),
                    snapshot.len()
                );
                Arc::new(records)
            })
            .distinct()
    }

    pub fn observe_ascending(&self, query: ResourceQuery<S>) -> Live<Arc<Vec<T>>> {
        self.observe(query.with_order(SortingOrder::Ascending))
    }

    pub fn observe_descending(&self, query: ResourceQuery<S>) -> Live<Arc<Vec<T>>> {
        self.observe(query.with_order(SortingOrder::Descending))
    }

    /// Live single record. While `id` is absent this emits `T::default()`,
    /// whose empty id marks it as a placeholder.
    pub fn observe_one(&self, id: impl Into<String>) -> Live<T> {
        let id = id.into();
        self.store
            .snapshot()
            .map(move |snapshot| snapshot.get(&id).cloned().unwrap_or_default())
            .distinct()
    }

    /// One-shot read of the current matching records
    pub fn current(&self, query: &ResourceQuery<S>) -> Vec<T> {
        let snapshot = self.store.snapshot().get();
        query::apply(snapshot.records(), query)
    }

    /// Pull this domain from the remote through `synchronizer`
    pub async fn sync_with(&self, synchronizer: &Synchronizer) -> bool {
        synchronizer.sync(self.store.clone()).await
    }
}

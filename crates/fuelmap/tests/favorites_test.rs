//! Favorites behavior of the user stations repository, end to end.

use async_trait::async_trait;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::timeout;

use fuelmap::{
    ManualLocationProvider, PreferenceStore, ResourceTable, StationsRepository,
    UserStationsRepository,
};
use fuelmap_api::{Station, StationQuery, StoreError, UserStationResource};
use fuelmap_core::{Live, Predicate, ResourceStore, Snapshot, UpsertReport};

const WAIT: Duration = Duration::from_secs(2);

fn station(code: &str, title: &str) -> Station {
    Station {
        code: code.to_string(),
        title: title.to_string(),
        station_type: "CNG".to_string(),
        latitude: 53.9,
        longitude: 27.5,
        ..Station::default()
    }
}

/// Store wrapper counting every read the repositories make
struct CountingStore {
    inner: ResourceTable<Station>,
    reads: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: ResourceTable::in_memory(),
            reads: AtomicUsize::new(0),
        }
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceStore<Station> for CountingStore {
    fn table_name(&self) -> &str {
        self.inner.table_name()
    }

    async fn upsert_all(&self, records: Vec<Station>) -> Result<UpsertReport, StoreError> {
        self.inner.upsert_all(records).await
    }

    async fn replace_all(&self, records: Vec<Station>) -> Result<UpsertReport, StoreError> {
        self.inner.replace_all(records).await
    }

    async fn query_all(&self, predicate: &dyn Predicate<Station>) -> Vec<Station> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.query_all(predicate).await
    }

    async fn query_one(&self, id: &str) -> Option<Station> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.query_one(id).await
    }

    fn snapshot(&self) -> Live<Arc<Snapshot<Station>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.snapshot()
    }
}

struct Fixture {
    store: Arc<CountingStore>,
    preferences: Arc<PreferenceStore>,
    repository: UserStationsRepository,
}

async fn fixture(stations: Vec<Station>) -> Fixture {
    let store = Arc::new(CountingStore::new());
    store.upsert_all(stations).await.unwrap();
    let preferences = Arc::new(PreferenceStore::in_memory());
    let repository = UserStationsRepository::new(
        StationsRepository::new(store.clone()),
        preferences.clone(),
        Arc::new(ManualLocationProvider::new()),
    );
    Fixture {
        store,
        preferences,
        repository,
    }
}

fn codes(list: &[UserStationResource]) -> Vec<String> {
    list.iter().map(|s| s.station.code.clone()).collect()
}

#[tokio::test]
async fn test_favorites_follow_toggles() {
    let f = fixture(vec![station("1", "A"), station("2", "B")]).await;
    let mut favorites = f.repository.observe_all_favorites(StationQuery::new());
    assert!(favorites.get().is_empty());

    f.preferences.set_station_favorite("1", true).await.unwrap();
    let list = timeout(WAIT, favorites.wait_for(|l| !l.is_empty()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(codes(&list), vec!["1"]);
    assert!(list[0].is_favorite);

    f.preferences.set_station_favorite("1", false).await.unwrap();
    let list = timeout(WAIT, favorites.wait_for(|l| l.is_empty()))
        .await
        .unwrap()
        .unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_empty_favorites_never_read_the_store() {
    let f = fixture(vec![station("1", "A"), station("2", "B")]).await;

    let favorites = f
        .repository
        .observe_all_favorites(StationQuery::new().with_search("A"));
    assert!(favorites.get().is_empty());
    assert_eq!(f.store.reads(), 0);

    let all = f.repository.observe_all(StationQuery::new());
    assert_eq!(all.get().len(), 2);
    assert!(f.store.reads() > 0);
}

#[tokio::test]
async fn test_stale_favorite_is_never_listed() {
    let f = fixture(vec![station("1", "A")]).await;
    f.preferences.set_station_favorite("404", true).await.unwrap();
    f.preferences.set_station_favorite("1", true).await.unwrap();

    let favorites = f.repository.observe_all_favorites(StationQuery::new());
    assert_eq!(codes(&favorites.get()), vec!["1"]);
}

#[tokio::test]
async fn test_favorites_appear_when_records_arrive_later() {
    let f = fixture(Vec::new()).await;
    f.preferences.set_station_favorite("2", true).await.unwrap();
    let mut favorites = f.repository.observe_all_favorites(StationQuery::new());
    assert!(favorites.get().is_empty());

    f.store
        .upsert_all(vec![station("1", "A"), station("2", "B")])
        .await
        .unwrap();
    let list = timeout(WAIT, favorites.wait_for(|l| !l.is_empty()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(codes(&list), vec!["2"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_favorite_toggles_both_land() {
    let f = fixture(vec![station("1", "A"), station("2", "B")]).await;
    let first = {
        let preferences = f.preferences.clone();
        tokio::spawn(async move { preferences.set_station_favorite("1", true).await })
    };
    let second = {
        let preferences = f.preferences.clone();
        tokio::spawn(async move { preferences.set_station_favorite("2", true).await })
    };
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let mut favorites = f.repository.observe_all_favorites(StationQuery::new());
    let list = timeout(WAIT, favorites.wait_for(|l| l.len() == 2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(codes(&list), vec!["1", "2"]);
}

fn arb_catalog() -> impl Strategy<Value = (Vec<Station>, BTreeSet<String>, String)> {
    (
        prop::collection::btree_set(1u32..40, 0..12),
        prop::collection::btree_set(1u32..40, 0..8),
        "[a-d]{0,1}",
    )
        .prop_map(|(codes, favorites, search)| {
            let stations: Vec<Station> = codes
                .iter()
                .map(|code| {
                    let title = ["alpha", "bravo", "charlie", "delta"][*code as usize % 4];
                    station(&code.to_string(), title)
                })
                .collect();
            let favorites: BTreeSet<String> = favorites.iter().map(|code| code.to_string()).collect();
            (stations, favorites, search)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_favorites_are_the_favorite_subset_of_all((stations, favorites, search) in arb_catalog()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (all, favorite_list, reads_before_all) = runtime.block_on(async {
            let f = fixture(stations).await;
            for code in &favorites {
                f.preferences.set_station_favorite(code, true).await.unwrap();
            }

            let query = StationQuery::new().with_search(search);
            let favorite_list = f.repository.observe_all_favorites(query.clone()).get();
            let reads_before_all = f.store.reads();
            let all = f.repository.observe_all(query).get();
            (all, favorite_list, reads_before_all)
        });

        let expected: Vec<String> = all
            .iter()
            .filter(|s| favorites.contains(&s.station.code))
            .map(|s| s.station.code.clone())
            .collect();
        prop_assert_eq!(codes(&favorite_list), expected);
        prop_assert!(favorite_list.iter().all(|s| s.is_favorite));
        if favorites.is_empty() {
            prop_assert!(favorite_list.is_empty());
            prop_assert_eq!(reads_before_all, 0);
        }
    }
}

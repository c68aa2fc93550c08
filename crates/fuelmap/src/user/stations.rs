use std::sync::Arc;
use tracing::debug;

use fuelmap_api::{Location, Station, StationQuery, UserData, UserStationResource};
use fuelmap_core::{Live, LocationProvider};

use super::merge;
use crate::geo;
use crate::preferences::PreferenceStore;
use crate::repository::StationsRepository;

type Joined = (Arc<Vec<Station>>, Arc<UserData>);

/// Stations joined with favorites, persisted sorting and distance to the device.
#[derive(Clone)]
pub struct UserStationsRepository {
    stations: StationsRepository,
    preferences: Arc<PreferenceStore>,
    location: Arc<dyn LocationProvider>,
}

impl UserStationsRepository {
    pub fn new(
        stations: StationsRepository,
        preferences: Arc<PreferenceStore>,
        location: Arc<dyn LocationProvider>,
    ) -> Self {
        Self {
            stations,
            preferences,
            location,
        }
    }

    pub fn observe_all(&self, query: StationQuery) -> Live<Arc<Vec<UserStationResource>>> {
        self.observe_joined(query, false)
    }

    /// Like `observe_all`, restricted to favorite stations. With no favorites
    /// the domain repository is not queried at all.
    pub fn observe_all_favorites(&self, query: StationQuery) -> Live<Arc<Vec<UserStationResource>>> {
        self.observe_joined(query, true)
    }

    /// Live single station; a placeholder with an empty code while absent
    pub fn observe_one(&self, code: impl Into<String>) -> Live<UserStationResource> {
        let code = code.into();
        let user_data = self.preferences.observe();
        let location = self.location.current_location();

        self.stations
            .observe_one(code)
            .combine_with(&user_data, |station, data| {
                (station.clone(), data.is_favorite(&station.code))
            })
            .combine_with(&location, |(station, is_favorite), location| {
                UserStationResource {
                    station: station.clone(),
                    is_favorite: *is_favorite && !station.code.is_empty(),
                    distance_km: geo::distance_between(*location, station.location()),
                }
            })
            .distinct()
    }

    fn observe_joined(
        &self,
        query: StationQuery,
        favorites_only: bool,
    ) -> Live<Arc<Vec<UserStationResource>>> {
        let user_data = self.preferences.observe();
        let location = self.location.current_location();
        let stations = self.stations.clone();

        // `None` means nothing can match, so the domain list is never requested.
        let effective = user_data
            .map(move |data| {
                let merged = merge::effective_station_query(&query, &data.station_sorting_config);
                if !favorites_only {
                    Some(merged)
                } else if data.favorite_station_codes.is_empty() {
                    None
                } else {
                    Some(merge::restrict_to_ids(merged, &data.favorite_station_codes))
                }
            })
            .distinct();

        let records = effective.switch_map(move |query| match query {
            Some(query) => stations.observe(query.clone()),
            None => {
                debug!("[UserStationsRepository] No favorites, skipping station query");
                Live::constant(Arc::new(Vec::new()))
            }
        });

        records
            .combine_with(&user_data, |records, data| -> Joined {
                (records.clone(), data.clone())
            })
            .combine_with(&location, move |(records, data), location: &Option<Location>| {
                Arc::new(merge::join_stations(records, data, *location, favorites_only))
            })
            .distinct()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::ManualLocationProvider;
    use crate::storage::ResourceTable;
    use fuelmap_api::{Resource, SortingOrder, StationSortingConfig, StationSortingType};
    use fuelmap_core::ResourceStore;
    use std::time::Duration;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(2);

    fn station(code: &str, title: &str, latitude: f64, longitude: f64) -> Station {
        Station {
            code: code.to_string(),
            title: title.to_string(),
            latitude,
            longitude,
            station_type: "CNG".to_string(),
            ..Station::default()
        }
    }

    async fn setup() -> (
        Arc<PreferenceStore>,
        Arc<ManualLocationProvider>,
        UserStationsRepository,
    ) {
        let table = Arc::new(ResourceTable::<Station>::in_memory());
        table
            .upsert_all(vec![
                station("1", "Alpha", 53.95, 27.6),
                station("2", "Bravo", 53.90, 27.56),
            ])
            .await
            .unwrap();
        let preferences = Arc::new(PreferenceStore::in_memory());
        let location = Arc::new(ManualLocationProvider::new());
        let repository = UserStationsRepository::new(
            StationsRepository::new(table),
            preferences.clone(),
            location.clone(),
        );
        (preferences, location, repository)
    }

    fn codes(list: &[UserStationResource]) -> Vec<&str> {
        list.iter().map(|s| s.id()).collect()
    }

    #[tokio::test]
    async fn test_observe_all_follows_favorites() {
        let (preferences, _location, repository) = setup().await;
        let mut all = repository.observe_all(StationQuery::new());
        assert_eq!(codes(&all.get()), vec!["1", "2"]);
        assert!(all.get().iter().all(|s| !s.is_favorite));

        preferences.set_station_favorite("2", true).await.unwrap();
        let list = timeout(WAIT, all.wait_for(|l| l.iter().any(|s| s.is_favorite)))
            .await
            .unwrap()
            .unwrap();
        assert!(list[1].is_favorite);
        assert!(!list[0].is_favorite);
    }

    #[tokio::test]
    async fn test_persisted_distance_sort_uses_location() {
        let (preferences, location, repository) = setup().await;
        preferences
            .set_station_sorting_config(StationSortingConfig {
                sorting_type: StationSortingType::Distance,
                sorting_order: SortingOrder::Ascending,
                station_types: None,
            })
            .await
            .unwrap();
        let mut all = repository.observe_all(StationQuery::new());

        location.set_location(Some(Location::new(53.90, 27.56)));
        let list = timeout(WAIT, all.wait_for(|l| l.iter().all(|s| s.distance_km.is_some())))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(codes(&list), vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_observe_one_joins_user_fields() {
        let (preferences, location, repository) = setup().await;
        location.set_location(Some(Location::new(53.90, 27.56)));
        preferences.set_station_favorite("1", true).await.unwrap();

        let mut one = repository.observe_one("1");
        let resource = timeout(WAIT, one.wait_for(|s| s.is_favorite && s.distance_km.is_some()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resource.id(), "1");

        let missing = repository.observe_one("404").get();
        assert!(missing.station.is_placeholder());
        assert!(!missing.is_favorite);
    }
}

//! Effective query derivation and the pure joins behind user repositories.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use fuelmap_api::{
    Location, News, NewsQuery, NewsSortingConfig, SortingOrder, Station, StationQuery,
    StationSortingConfig, StationSortingType, UserData, UserNewsResource, UserStationResource,
};

use crate::geo;

/// Persisted sorting and type filter win; the caller's search, id and pinned
/// filters are kept.
pub fn effective_station_query(caller: &StationQuery, config: &StationSortingConfig) -> StationQuery {
    StationQuery {
        search_query: caller.search_query.clone(),
        filter_ids: caller.filter_ids.clone(),
        filter_pinned: caller.filter_pinned,
        filter_types: config
            .station_types
            .clone()
            .or_else(|| caller.filter_types.clone()),
        sorting_type: config.sorting_type,
        sorting_order: config.sorting_order,
    }
}

/// Persisted sorting and only-pinned flag win; the caller's search, id and
/// type filters are kept.
pub fn effective_news_query(caller: &NewsQuery, config: &NewsSortingConfig) -> NewsQuery {
    NewsQuery {
        search_query: caller.search_query.clone(),
        filter_ids: caller.filter_ids.clone(),
        filter_pinned: if config.only_pinned {
            Some(true)
        } else {
            caller.filter_pinned
        },
        filter_types: caller.filter_types.clone(),
        sorting_type: config.sorting_type,
        sorting_order: config.sorting_order,
    }
}

/// Narrow `query` to `ids`, intersecting with any id filter it already has.
pub fn restrict_to_ids(mut query: StationQuery, ids: &BTreeSet<String>) -> StationQuery {
    query.filter_ids = Some(match query.filter_ids.take() {
        Some(existing) => existing.intersection(ids).cloned().collect(),
        None => ids.clone(),
    });
    query
}

pub fn join_stations(
    stations: &[Station],
    data: &UserData,
    location: Option<Location>,
    favorites_only: bool,
) -> Vec<UserStationResource> {
    let mut joined: Vec<UserStationResource> = stations
        .iter()
        .filter(|station| !favorites_only || data.is_favorite(&station.code))
        .map(|station| UserStationResource {
            station: station.clone(),
            is_favorite: data.is_favorite(&station.code),
            distance_km: geo::distance_between(location, station.location()),
        })
        .collect();

    let config = &data.station_sorting_config;
    if config.sorting_type == StationSortingType::Distance {
        sort_by_distance(&mut joined, config.sorting_order);
    }
    joined
}

/// Stable sort on distance; stations with unknown distance go last in
/// either order.
pub fn sort_by_distance(resources: &mut [UserStationResource], order: SortingOrder) {
    resources.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => order.apply(x.total_cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

pub fn join_news(news: &[News], data: &UserData, unread_only: bool) -> Vec<UserNewsResource> {
    news.iter()
        .map(|item| UserNewsResource {
            news: item.clone(),
            has_been_viewed: data.has_viewed(&item.id),
        })
        .filter(|resource| !unread_only || !resource.has_been_viewed)
        .collect()
}

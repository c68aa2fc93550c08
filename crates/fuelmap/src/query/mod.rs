//! Query engine: pure filtering and sorting of snapshot records.
//!
//! Filters are combined with AND. Sorting is stable, so records with equal
//! sort keys keep the order they had in the input (id order for snapshots).

pub mod predicates;

use fuelmap_api::{Resource, ResourceQuery, SortingOrder, SortingType};
use fuelmap_core::{Always, Predicate};

pub use predicates::{IdIn, PinnedIs, TextContains, TypeIn};

/// Build the conjunction of every filter present in `query`.
pub fn predicate_for<T, S>(query: &ResourceQuery<S>) -> Box<dyn Predicate<T>>
where
    T: Resource,
{
    let mut predicate: Box<dyn Predicate<T>> = Box::new(Always);

    if let Some(ids) = &query.filter_ids {
        predicate = Box::new(predicate.and(IdIn::new(ids.clone())));
    }
    if let Some(pinned) = query.filter_pinned {
        predicate = Box::new(predicate.and(PinnedIs(pinned)));
    }
    if let Some(types) = &query.filter_types {
        predicate = Box::new(predicate.and(TypeIn::new(types.clone())));
    }
    if let Some(search) = TextContains::new(&query.search_query) {
        predicate = Box::new(predicate.and(search));
    }

    predicate
}

pub fn sort<T, S>(records: &mut [T], sorting_type: S, sorting_order: SortingOrder)
where
    S: SortingType<T>,
{
    records.sort_by(|a, b| sorting_order.apply(sorting_type.compare(a, b)));
}

/// Filter then sort `records` according to `query`.
pub fn apply<'a, T, S>(records: impl IntoIterator<Item = &'a T>, query: &ResourceQuery<S>) -> Vec<T>
where
    T: Resource,
    S: SortingType<T>,
{
    let predicate = predicate_for::<T, S>(query);
    let mut matched: Vec<T> = records
        .into_iter()
        .filter(|record| predicate.test(record))
        .cloned()
        .collect();
    sort(&mut matched, query.sorting_type, query.sorting_order);
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelmap_api::{News, NewsQuery, NewsSortingType, Station, StationQuery, StationSortingType};
    use proptest::prelude::*;

    fn station(code: &str, title: &str, station_type: &str) -> Station {
        Station {
            code: code.to_string(),
            title: title.to_string(),
            station_type: station_type.to_string(),
            ..Station::default()
        }
    }

    fn news(id: &str, title: &str, pinned: bool) -> News {
        News {
            id: id.to_string(),
            title: title.to_string(),
            is_pinned: pinned,
            ..News::default()
        }
    }

    fn ids<T: Resource>(records: &[T]) -> Vec<&str> {
        records.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let stations = vec![station("1", "North", "CNG"), station("2", "South", "LNG")];
        let result = apply(&stations, &StationQuery::new().with_search("   "));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let stations = vec![
            station("1", "AGNKS Minsk-1", "CNG"),
            station("2", "AGNKS Brest", "CNG"),
        ];
        let result = apply(&stations, &StationQuery::new().with_search("minsk"));
        assert_eq!(ids(&result), vec!["1"]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let stations = vec![
            station("1", "A", "CNG"),
            station("2", "B", "LNG"),
            station("3", "C", "CNG"),
        ];
        let query = StationQuery::new().with_ids(["1", "2"]).with_types(["CNG"]);
        assert_eq!(ids(&apply(&stations, &query)), vec!["1"]);
    }

    #[test]
    fn test_empty_id_filter_matches_nothing() {
        let stations = vec![station("1", "A", "CNG")];
        let query = StationQuery::new().with_ids(Vec::<String>::new());
        assert!(apply(&stations, &query).is_empty());
    }

    #[test]
    fn test_pinned_filter() {
        let items = vec![news("1", "a", true), news("2", "b", false)];
        assert_eq!(ids(&apply(&items, &NewsQuery::new().with_pinned(true))), vec!["1"]);
        assert_eq!(ids(&apply(&items, &NewsQuery::new().with_pinned(false))), vec!["2"]);
    }

    #[test]
    fn test_descending_keeps_ties_in_input_order() {
        let stations = vec![
            station("1", "Same", "CNG"),
            station("2", "Other", "CNG"),
            station("3", "same", "CNG"),
        ];
        let query = StationQuery::new().sorted_by(StationSortingType::Title, SortingOrder::Descending);
        assert_eq!(ids(&apply(&stations, &query)), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_predicate_for_composes_with_store_queries() {
        let query = NewsQuery::new()
            .with_search("fuel")
            .sorted_by(NewsSortingType::Title, SortingOrder::Ascending);
        let predicate = predicate_for::<News, _>(&query);
        assert!(predicate.test(&news("1", "Fuel prices", false)));
        assert!(!predicate.test(&news("2", "Opening hours", false)));
    }

    fn arb_station() -> impl Strategy<Value = Station> {
        ("[0-9]{1,3}", "[a-c]{0,2}", prop_oneof!["CNG", "LNG"])
            .prop_map(|(code, title, kind)| station(&code, &title, &kind))
    }

    fn arb_sorting() -> impl Strategy<Value = (StationSortingType, SortingOrder)> {
        (
            prop_oneof![
                Just(StationSortingType::Title),
                Just(StationSortingType::Code),
                Just(StationSortingType::Distance),
            ],
            prop_oneof![Just(SortingOrder::Ascending), Just(SortingOrder::Descending)],
        )
    }

    proptest! {
        #[test]
        fn prop_sort_is_deterministic_and_stable(
            mut stations in prop::collection::vec(arb_station(), 0..24),
            (sorting_type, order) in arb_sorting(),
        ) {
            // the address carries the input position
            for (index, station) in stations.iter_mut().enumerate() {
                station.address = index.to_string();
            }
            let query = StationQuery::new().sorted_by(sorting_type, order);
            let first = apply(&stations, &query);
            let second = apply(&stations, &query);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.len(), stations.len());

            for pair in first.windows(2) {
                let ordering = order.apply(sorting_type.compare(&pair[0], &pair[1]));
                prop_assert_ne!(ordering, std::cmp::Ordering::Greater);
                if ordering == std::cmp::Ordering::Equal {
                    let a: usize = pair[0].address.parse().unwrap();
                    let b: usize = pair[1].address.parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }

        #[test]
        fn prop_filter_result_is_subset(
            stations in prop::collection::vec(arb_station(), 0..24),
            search in "[a-c]{0,1}",
        ) {
            let query = StationQuery::new().with_search(search.clone()).with_types(["CNG"]);
            let result = apply(&stations, &query);
            prop_assert!(result.len() <= stations.len());
            for record in &result {
                prop_assert!(stations.contains(record));
                prop_assert_eq!(record.station_type.as_str(), "CNG");
            }
        }
    }
}

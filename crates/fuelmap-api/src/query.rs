use std::collections::BTreeSet;

use crate::sorting::{
    CareerSortingType, FaqSortingType, NewsSortingType, PriceSortingType, SortingOrder,
    StationSortingType,
};

/// Transient filter + sort + search specification for one read.
///
/// Absent optional filters mean "no constraint", never "match nothing".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceQuery<S> {
    pub search_query: String,
    pub filter_ids: Option<BTreeSet<String>>,
    pub filter_pinned: Option<bool>,
    /// Allowed type tags (station types); records without a tag never match
    pub filter_types: Option<BTreeSet<String>>,
    pub sorting_type: S,
    pub sorting_order: SortingOrder,
}

pub type StationQuery = ResourceQuery<StationSortingType>;
pub type NewsQuery = ResourceQuery<NewsSortingType>;
pub type PriceQuery = ResourceQuery<PriceSortingType>;
pub type CareerQuery = ResourceQuery<CareerSortingType>;
pub type FaqQuery = ResourceQuery<FaqSortingType>;

impl<S: Default> ResourceQuery<S> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> ResourceQuery<S> {
    pub fn with_search(mut self, search_query: impl Into<String>) -> Self {
        self.search_query = search_query.into();
        self
    }

    pub fn with_ids<I, V>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.filter_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.filter_pinned = Some(pinned);
        self
    }

    pub fn with_types<I, V>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.filter_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn sorted_by(mut self, sorting_type: S, sorting_order: SortingOrder) -> Self {
        self.sorting_type = sorting_type;
        self.sorting_order = sorting_order;
        self
    }

    pub fn with_order(mut self, sorting_order: SortingOrder) -> Self {
        self.sorting_order = sorting_order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_has_no_constraints() {
        let query = StationQuery::new();
        assert!(query.search_query.is_empty());
        assert_eq!(query.filter_ids, None);
        assert_eq!(query.filter_pinned, None);
        assert_eq!(query.filter_types, None);
        assert_eq!(query.sorting_type, StationSortingType::Title);
        assert_eq!(query.sorting_order, SortingOrder::Ascending);
    }

    #[test]
    fn test_builder_sets_fields() {
        let query = NewsQuery::new()
            .with_search("tariff")
            .with_ids(["1", "2", "2"])
            .with_pinned(true)
            .sorted_by(NewsSortingType::Title, SortingOrder::Descending);

        assert_eq!(query.search_query, "tariff");
        assert_eq!(query.filter_ids.as_ref().map(|ids| ids.len()), Some(2));
        assert_eq!(query.filter_pinned, Some(true));
        assert_eq!(query.sorting_type, NewsSortingType::Title);
        assert_eq!(query.sorting_order, SortingOrder::Descending);
    }
}

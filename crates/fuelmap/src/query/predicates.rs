//! Record-level predicates built from a query's filters.

use std::collections::BTreeSet;

use fuelmap_api::Resource;
use fuelmap_core::Predicate;

/// Record id is one of `ids`
pub struct IdIn {
    ids: BTreeSet<String>,
}

impl IdIn {
    pub fn new(ids: BTreeSet<String>) -> Self {
        Self { ids }
    }
}

impl<T: Resource> Predicate<T> for IdIn {
    fn test(&self, item: &T) -> bool {
        self.ids.contains(item.id())
    }
}

pub struct PinnedIs(pub bool);

impl<T: Resource> Predicate<T> for PinnedIs {
    fn test(&self, item: &T) -> bool {
        item.is_pinned() == self.0
    }
}

/// Case-insensitive substring match over the record's searchable text.
pub struct TextContains {
    needle: String,
}

impl TextContains {
    /// Returns `None` for blank input, which matches everything.
    pub fn new(search_query: &str) -> Option<Self> {
        let needle = search_query.trim().to_lowercase();
        if needle.is_empty() {
            None
        } else {
            Some(Self { needle })
        }
    }
}

impl<T: Resource> Predicate<T> for TextContains {
    fn test(&self, item: &T) -> bool {
        item.search_text()
            .iter()
            .any(|text| text.to_lowercase().contains(&self.needle))
    }
}

/// Record's type tag is one of `types`; untagged records never match
pub struct TypeIn {
    types: BTreeSet<String>,
}

impl TypeIn {
    pub fn new(types: BTreeSet<String>) -> Self {
        Self { types }
    }
}

impl<T: Resource> Predicate<T> for TypeIn {
    fn test(&self, item: &T) -> bool {
        item.type_tag()
            .is_some_and(|tag| self.types.contains(tag))
    }
}

use std::collections::BTreeMap;

/// Immutable, versioned view of a resource table.
///
/// The version increases by exactly one per successful mutation. Records are
/// keyed and iterated by id, which is also the tie order for stable sorts.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    version: u64,
    records: BTreeMap<String, T>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            version: 0,
            records: BTreeMap::new(),
        }
    }
}

impl<T> Snapshot<T> {
    pub fn new(version: u64, records: BTreeMap<String, T>) -> Self {
        Self { version, records }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Working copy for building the next version
    pub fn to_map(&self) -> BTreeMap<String, T>
    where
        T: Clone,
    {
        self.records.clone()
    }
}

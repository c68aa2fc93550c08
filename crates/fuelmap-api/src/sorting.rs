//! Sorting types per domain and their ascending comparators.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::{Career, Faq, News, Price, SortingType, Station};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortingOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortingOrder {
    /// Orient an ascending comparison result
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortingOrder::Ascending => ordering,
            SortingOrder::Descending => ordering.reverse(),
        }
    }
}

/// Case-insensitive text comparison
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Station codes are numeric strings ("2" < "10"); fall back to text order otherwise.
fn compare_codes(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationSortingType {
    #[default]
    Title,
    Code,
    /// Needs the device location, which only the user-level join knows.
    /// At the record level it orders by title.
    Distance,
}

impl SortingType<Station> for StationSortingType {
    fn compare(&self, a: &Station, b: &Station) -> Ordering {
        match self {
            StationSortingType::Title | StationSortingType::Distance => {
                compare_text(&a.title, &b.title)
            }
            StationSortingType::Code => compare_codes(&a.code, &b.code),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsSortingType {
    #[default]
    Date,
    Title,
}

impl SortingType<News> for NewsSortingType {
    fn compare(&self, a: &News, b: &News) -> Ordering {
        match self {
            NewsSortingType::Date => a.published_at.cmp(&b.published_at),
            NewsSortingType::Title => compare_text(&a.title, &b.title),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSortingType {
    #[default]
    Title,
    Value,
}

impl SortingType<Price> for PriceSortingType {
    fn compare(&self, a: &Price, b: &Price) -> Ordering {
        match self {
            PriceSortingType::Title => compare_text(&a.title, &b.title),
            PriceSortingType::Value => a.value.total_cmp(&b.value),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareerSortingType {
    #[default]
    Date,
    Title,
}

impl SortingType<Career> for CareerSortingType {
    fn compare(&self, a: &Career, b: &Career) -> Ordering {
        match self {
            CareerSortingType::Date => a.published_at.cmp(&b.published_at),
            CareerSortingType::Title => compare_text(&a.title, &b.title),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaqSortingType {
    #[default]
    Position,
    Question,
}

impl SortingType<Faq> for FaqSortingType {
    fn compare(&self, a: &Faq, b: &Faq) -> Ordering {
        match self {
            FaqSortingType::Position => a.position.cmp(&b.position),
            FaqSortingType::Question => compare_text(&a.question, &b.question),
        }
    }
}

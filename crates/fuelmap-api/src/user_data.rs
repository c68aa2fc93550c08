//! The single user-specific record kept by the preference store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::sorting::{NewsSortingType, SortingOrder, StationSortingType};

/// Current on-disk format version of [`UserData`]
pub const USER_DATA_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StationSortingConfig {
    pub sorting_type: StationSortingType,
    pub sorting_order: SortingOrder,
    /// Active station-type filter; `None` shows every type
    pub station_types: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsSortingConfig {
    pub sorting_type: NewsSortingType,
    pub sorting_order: SortingOrder,
    pub only_pinned: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DarkThemeConfig {
    #[default]
    FollowSystem,
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageConfig {
    #[default]
    FollowSystem,
    Russian,
    Belarusian,
    English,
}

/// Sections of the home screen, in user-chosen order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeContentItem {
    Prices,
    Stations,
    News,
    Careers,
    Faq,
}

impl HomeContentItem {
    pub fn default_order() -> Vec<HomeContentItem> {
        vec![
            HomeContentItem::Prices,
            HomeContentItem::Stations,
            HomeContentItem::News,
            HomeContentItem::Careers,
            HomeContentItem::Faq,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageCounter {
    AppLaunches,
    StationDetailsOpened,
    NavigationRequests,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsageCounters {
    pub app_launches: u64,
    pub station_details_opened: u64,
    pub navigation_requests: u64,
}

impl UsageCounters {
    pub fn get(&self, counter: UsageCounter) -> u64 {
        match counter {
            UsageCounter::AppLaunches => self.app_launches,
            UsageCounter::StationDetailsOpened => self.station_details_opened,
            UsageCounter::NavigationRequests => self.navigation_requests,
        }
    }

    pub fn increment(&mut self, counter: UsageCounter) {
        let slot = match counter {
            UsageCounter::AppLaunches => &mut self.app_launches,
            UsageCounter::StationDetailsOpened => &mut self.station_details_opened,
            UsageCounter::NavigationRequests => &mut self.navigation_requests,
        };
        *slot = slot.saturating_add(1);
    }
}

/// All user-specific preferences and overlays.
///
/// Favorite and viewed ids may refer to records that no longer exist;
/// joins simply never match them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserData {
    pub favorite_station_codes: BTreeSet<String>,
    pub viewed_news_ids: BTreeSet<String>,
    pub station_sorting_config: StationSortingConfig,
    pub news_sorting_config: NewsSortingConfig,
    pub dark_theme_config: DarkThemeConfig,
    pub language_config: LanguageConfig,
    pub home_layout_order: Vec<HomeContentItem>,
    pub usage: UsageCounters,
    pub should_hide_onboarding: bool,
    pub review_requested: bool,
}

impl Default for UserData {
    fn default() -> Self {
        Self {
            favorite_station_codes: BTreeSet::new(),
            viewed_news_ids: BTreeSet::new(),
            station_sorting_config: StationSortingConfig::default(),
            news_sorting_config: NewsSortingConfig::default(),
            dark_theme_config: DarkThemeConfig::default(),
            language_config: LanguageConfig::default(),
            home_layout_order: HomeContentItem::default_order(),
            usage: UsageCounters::default(),
            should_hide_onboarding: false,
            review_requested: false,
        }
    }
}

impl UserData {
    pub fn is_favorite(&self, station_code: &str) -> bool {
        self.favorite_station_codes.contains(station_code)
    }

    pub fn has_viewed(&self, news_id: &str) -> bool {
        self.viewed_news_ids.contains(news_id)
    }
}

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info};

use fuelmap_api::{
    DarkThemeConfig, HomeContentItem, LanguageConfig, NewsSortingConfig, PreferenceError,
    StationSortingConfig, UsageCounter, UserData,
};
use fuelmap_core::Live;

use super::{MemoryPreferenceBackend, PreferenceBackend};

/// Owner of the single `UserData` record.
///
/// Every setter is one read-modify-write over the whole record, serialized by
/// a writer lock, persisted before the new record is published. Setters that
/// would not change anything neither persist nor publish.
pub struct PreferenceStore {
    backend: Arc<dyn PreferenceBackend>,
    writer: Mutex<()>,
    data_tx: watch::Sender<Arc<UserData>>,
}

impl PreferenceStore {
    pub async fn open(backend: Arc<dyn PreferenceBackend>) -> Result<Self, PreferenceError> {
        let data = backend.load().await?.unwrap_or_default();
        let (data_tx, _) = watch::channel(Arc::new(data));
        Ok(Self {
            backend,
            writer: Mutex::new(()),
            data_tx,
        })
    }

    pub fn in_memory() -> Self {
        let (data_tx, _) = watch::channel(Arc::new(UserData::default()));
        Self {
            backend: Arc::new(MemoryPreferenceBackend::new()),
            writer: Mutex::new(()),
            data_tx,
        }
    }

    pub fn current(&self) -> Arc<UserData> {
        self.data_tx.borrow().clone()
    }

    pub fn observe(&self) -> Live<Arc<UserData>> {
        Live::from(self.data_tx.subscribe())
    }

    /// Apply `change` to a copy of the current record and publish it.
    ///
    /// Returns whether the record changed.
    pub async fn update<F>(&self, operation: &str, change: F) -> Result<bool, PreferenceError>
    where
        F: FnOnce(&mut UserData),
    {
        let _guard = self.writer.lock().await;
        let current = self.current();
        let mut next = UserData::clone(&current);
        change(&mut next);

        if next == *current {
            debug!("[PreferenceStore] {} left user data unchanged", operation);
            return Ok(false);
        }

        self.backend.persist(&next).await?;
        self.data_tx.send_replace(Arc::new(next));
        info!("[PreferenceStore] Applied {}", operation);
        Ok(true)
    }

    pub async fn set_station_favorite(
        &self,
        code: &str,
        is_favorite: bool,
    ) -> Result<(), PreferenceError> {
        self.update("set_station_favorite", |data| {
            if is_favorite {
                data.favorite_station_codes.insert(code.to_string());
            } else {
                data.favorite_station_codes.remove(code);
            }
        })
        .await?;
        Ok(())
    }

    /// Flip favorite membership, returning the new state
    pub async fn toggle_station_favorite(&self, code: &str) -> Result<bool, PreferenceError> {
        let mut now_favorite = false;
        self.update("toggle_station_favorite", |data| {
            now_favorite = !data.favorite_station_codes.remove(code);
            if now_favorite {
                data.favorite_station_codes.insert(code.to_string());
            }
        })
        .await?;
        Ok(now_favorite)
    }

    pub async fn set_news_viewed(&self, id: &str, viewed: bool) -> Result<(), PreferenceError> {
        self.update("set_news_viewed", |data| {
            if viewed {
                data.viewed_news_ids.insert(id.to_string());
            } else {
                data.viewed_news_ids.remove(id);
            }
        })
        .await?;
        Ok(())
    }

    /// Mark several news items viewed in one write
    pub async fn set_news_viewed_many<I, V>(&self, ids: I) -> Result<(), PreferenceError>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.update("set_news_viewed_many", |data| {
            data.viewed_news_ids.extend(ids.into_iter().map(Into::into));
        })
        .await?;
        Ok(())
    }

    pub async fn set_station_sorting_config(
        &self,
        config: StationSortingConfig,
    ) -> Result<(), PreferenceError> {
        self.update("set_station_sorting_config", |data| {
            data.station_sorting_config = config;
        })
        .await?;
        Ok(())
    }

    pub async fn set_news_sorting_config(
        &self,
        config: NewsSortingConfig,
    ) -> Result<(), PreferenceError> {
        self.update("set_news_sorting_config", |data| {
            data.news_sorting_config = config;
        })
        .await?;
        Ok(())
    }

    pub async fn set_dark_theme_config(
        &self,
        config: DarkThemeConfig,
    ) -> Result<(), PreferenceError> {
        self.update("set_dark_theme_config", |data| {
            data.dark_theme_config = config;
        })
        .await?;
        Ok(())
    }

    pub async fn set_language_config(&self, config: LanguageConfig) -> Result<(), PreferenceError> {
        self.update("set_language_config", |data| {
            data.language_config = config;
        })
        .await?;
        Ok(())
    }

    /// Duplicates collapse onto their first occurrence.
    pub async fn set_home_layout_order(
        &self,
        order: Vec<HomeContentItem>,
    ) -> Result<(), PreferenceError> {
        let mut seen = HashSet::new();
        let order: Vec<HomeContentItem> = order.into_iter().filter(|item| seen.insert(*item)).collect();
        self.update("set_home_layout_order", |data| {
            data.home_layout_order = order;
        })
        .await?;
        Ok(())
    }

    pub async fn increment_usage(&self, counter: UsageCounter) -> Result<u64, PreferenceError> {
        let mut value = 0;
        self.update("increment_usage", |data| {
            data.usage.increment(counter);
            value = data.usage.get(counter);
        })
        .await?;
        Ok(value)
    }

    pub async fn set_onboarding_hidden(&self, hidden: bool) -> Result<(), PreferenceError> {
        self.update("set_onboarding_hidden", |data| {
            data.should_hide_onboarding = hidden;
        })
        .await?;
        Ok(())
    }

    pub async fn set_review_requested(&self, requested: bool) -> Result<(), PreferenceError> {
        self.update("set_review_requested", |data| {
            data.review_requested = requested;
        })
        .await?;
        Ok(())
    }

    /// Restore every preference to its default (app data reset)
    pub async fn reset(&self) -> Result<(), PreferenceError> {
        self.update("reset", |data| {
            *data = UserData::default();
        })
        .await?;
        Ok(())
    }
}

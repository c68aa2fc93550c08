//! Explicit construction of the whole data layer.
//!
//! One `PreferenceStore` and one `Synchronizer` are created here and shared by
//! reference with every repository that needs them.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use fuelmap_api::{Domain, Resource};
use fuelmap_core::{LocationProvider, RemoteSource, ResourceStore};
use fuelmap_remote::HttpRemoteSource;

use crate::config::DataLayerConfig;
use crate::preferences::{JsonPreferenceBackend, PreferenceStore};
use crate::repository::{
    CareersRepository, FaqRepository, NewsRepository, PricesRepository, StationsRepository,
};
use crate::storage::{JsonTableBackend, ResourceTable};
use crate::sync::Synchronizer;
use crate::user::{UserNewsRepository, UserStationsRepository};

pub struct DataLayer {
    pub preferences: Arc<PreferenceStore>,
    pub synchronizer: Arc<Synchronizer>,
    pub stations: StationsRepository,
    pub news: NewsRepository,
    pub prices: PricesRepository,
    pub careers: CareersRepository,
    pub faq: FaqRepository,
    pub user_stations: UserStationsRepository,
    pub user_news: UserNewsRepository,
}

async fn open_table<T: Resource>(data_dir: Option<&Path>) -> Result<Arc<dyn ResourceStore<T>>> {
    let table = match data_dir {
        Some(dir) => {
            let backend = Arc::new(JsonTableBackend::for_resource::<T>(dir));
            ResourceTable::<T>::open(backend)
                .await
                .with_context(|| format!("Failed to open {} table in {}", T::DOMAIN, dir.display()))?
        }
        None => ResourceTable::<T>::in_memory(),
    };
    Ok(Arc::new(table))
}

impl DataLayer {
    /// Open every store under `config.data_dir` (or in memory) and wire the
    /// repositories around them.
    pub async fn open(
        config: &DataLayerConfig,
        remote: Arc<dyn RemoteSource>,
        location: Arc<dyn LocationProvider>,
    ) -> Result<Self> {
        let data_dir = config.data_dir.as_deref();

        let preferences = match data_dir {
            Some(dir) => PreferenceStore::open(Arc::new(JsonPreferenceBackend::in_dir(dir)))
                .await
                .with_context(|| format!("Failed to open preferences in {}", dir.display()))?,
            None => PreferenceStore::in_memory(),
        };
        let preferences = Arc::new(preferences);

        let stations = StationsRepository::new(open_table(data_dir).await?);
        let news = NewsRepository::new(open_table(data_dir).await?);
        let prices = PricesRepository::new(open_table(data_dir).await?);
        let careers = CareersRepository::new(open_table(data_dir).await?);
        let faq = FaqRepository::new(open_table(data_dir).await?);

        info!(
            "[DataLayer] Opened data layer ({}, remote '{}', sync mode {:?})",
            match data_dir {
                Some(dir) => format!("data dir {}", dir.display()),
                None => "in memory".to_string(),
            },
            remote.source_id(),
            config.sync_mode
        );

        Ok(Self {
            synchronizer: Arc::new(Synchronizer::with_mode(remote, config.sync_mode)),
            user_stations: UserStationsRepository::new(
                stations.clone(),
                preferences.clone(),
                location,
            ),
            user_news: UserNewsRepository::new(news.clone(), preferences.clone()),
            preferences,
            stations,
            news,
            prices,
            careers,
            faq,
        })
    }

    /// Like [`open`](Self::open), fetching from the HTTP backend named in
    /// `config.remote`.
    pub async fn connect(
        config: &DataLayerConfig,
        location: Arc<dyn LocationProvider>,
    ) -> Result<Self> {
        let base_url = config
            .remote
            .base_url
            .as_deref()
            .context("No remote base_url configured")?;
        let remote = HttpRemoteSource::with_timeout(
            base_url,
            Duration::from_secs(config.remote.timeout_secs),
        )?;
        Self::open(config, Arc::new(remote), location).await
    }

    /// Fully in-memory data layer
    pub async fn in_memory(
        remote: Arc<dyn RemoteSource>,
        location: Arc<dyn LocationProvider>,
    ) -> Result<Self> {
        Self::open(&DataLayerConfig::default(), remote, location).await
    }

    /// Synchronize every domain concurrently
    pub async fn sync_all(&self) -> BTreeMap<Domain, bool> {
        let synchronizer = self.synchronizer.as_ref();
        let (stations, news, prices, careers, faq) = tokio::join!(
            self.stations.sync_with(synchronizer),
            self.news.sync_with(synchronizer),
            self.prices.sync_with(synchronizer),
            self.careers.sync_with(synchronizer),
            self.faq.sync_with(synchronizer),
        );

        let results = BTreeMap::from([
            (Domain::Stations, stations),
            (Domain::News, news),
            (Domain::Prices, prices),
            (Domain::Careers, careers),
            (Domain::Faq, faq),
        ]);
        info!("[DataLayer] sync_all finished: {:?}", results);
        results
    }
}

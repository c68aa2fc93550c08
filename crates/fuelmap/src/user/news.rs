use std::sync::Arc;

use fuelmap_api::{News, NewsQuery, UserData, UserNewsResource};
use fuelmap_core::Live;

use super::merge;
use crate::preferences::PreferenceStore;
use crate::repository::NewsRepository;

/// News joined with viewed state and the persisted news sorting.
#[derive(Clone)]
pub struct UserNewsRepository {
    news: NewsRepository,
    preferences: Arc<PreferenceStore>,
}

impl UserNewsRepository {
    pub fn new(news: NewsRepository, preferences: Arc<PreferenceStore>) -> Self {
        Self { news, preferences }
    }

    pub fn observe_all(&self, query: NewsQuery) -> Live<Arc<Vec<UserNewsResource>>> {
        self.observe_joined(query, false)
    }

    /// Only items not yet marked viewed
    pub fn observe_unread(&self, query: NewsQuery) -> Live<Arc<Vec<UserNewsResource>>> {
        self.observe_joined(query, true)
    }

    pub fn observe_one(&self, id: impl Into<String>) -> Live<UserNewsResource> {
        self.news
            .observe_one(id)
            .combine_with(&self.preferences.observe(), |news, data| UserNewsResource {
                news: news.clone(),
                has_been_viewed: !news.id.is_empty() && data.has_viewed(&news.id),
            })
            .distinct()
    }

    fn observe_joined(&self, query: NewsQuery, unread_only: bool) -> Live<Arc<Vec<UserNewsResource>>> {
        let user_data = self.preferences.observe();
        let news = self.news.clone();

        user_data
            .map(move |data| merge::effective_news_query(&query, &data.news_sorting_config))
            .distinct()
            .switch_map(move |query| news.observe(query.clone()))
            .combine_with(&user_data, move |records: &Arc<Vec<News>>, data: &Arc<UserData>| {
                Arc::new(merge::join_news(records, data, unread_only))
            })
            .distinct()
    }
}

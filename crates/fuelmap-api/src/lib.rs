pub mod domain;
pub mod error;
pub mod location;
pub mod query;
pub mod resource;
pub mod resources;
pub mod sorting;
pub mod user_data;
pub mod user_resource;

// Re-export record types
pub use resources::{Career, Faq, News, Price, Station};

// Re-export the record contract
pub use domain::Domain;
pub use resource::{Resource, SortingType};

// Re-export query types
pub use query::{CareerQuery, FaqQuery, NewsQuery, PriceQuery, ResourceQuery, StationQuery};
pub use sorting::{
    CareerSortingType, FaqSortingType, NewsSortingType, PriceSortingType, SortingOrder,
    StationSortingType,
};

// Re-export user overlay types
pub use location::Location;
pub use user_data::{
    DarkThemeConfig, HomeContentItem, LanguageConfig, NewsSortingConfig, StationSortingConfig,
    UsageCounter, UsageCounters, UserData, USER_DATA_VERSION,
};
pub use user_resource::{UserNewsResource, UserStationResource};

pub use error::{
    PreferenceError, RecordError, RejectedRecord, RemoteError, StoreError, SyncError,
};

//! User-flavored views joined on read from a record and [`UserData`](crate::UserData).
//!
//! They are never stored and have no identity of their own.

use serde::{Deserialize, Serialize};

use crate::{News, Resource, Station};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStationResource {
    pub station: Station,
    pub is_favorite: bool,
    /// Great-circle distance from the device in kilometers.
    /// `None` while either position is unknown.
    pub distance_km: Option<f64>,
}

impl UserStationResource {
    pub fn id(&self) -> &str {
        self.station.id()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNewsResource {
    pub news: News,
    pub has_been_viewed: bool,
}

impl UserNewsResource {
    pub fn id(&self) -> &str {
        self.news.id()
    }
}

//! Record types for each synchronized domain.
//!
//! Field names follow the backend's camelCase JSON. Missing fields fall back
//! to defaults so that an absent identifier surfaces as a validation
//! rejection at the store boundary instead of a parse failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Domain, Location, Resource};

/// A CNG filling station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Station {
    pub code: String,
    pub title: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Fuel category, e.g. `CNG` or `LNG`
    pub station_type: String,
    pub phone: Option<String>,
    pub working_hours: Option<String>,
    pub last_synced: Option<DateTime<Utc>>,
}

impl Station {
    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }
}

impl Resource for Station {
    const DOMAIN: Domain = Domain::Stations;

    fn id(&self) -> &str {
        &self.code
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.address.as_str(), self.code.as_str()]
    }

    fn type_tag(&self) -> Option<&str> {
        Some(self.station_type.as_str())
    }

    fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    fn mark_synced(&mut self, at: DateTime<Utc>) {
        self.last_synced = Some(at);
    }
}

/// Operator news item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct News {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub is_pinned: bool,
    pub last_synced: Option<DateTime<Utc>>,
}

impl Resource for News {
    const DOMAIN: Domain = Domain::News;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn is_pinned(&self) -> bool {
        self.is_pinned
    }

    fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    fn mark_synced(&mut self, at: DateTime<Utc>) {
        self.last_synced = Some(at);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Price {
    pub id: String,
    pub title: String,
    pub value: f64,
    pub currency: String,
    /// Billing unit, e.g. `m3`
    pub unit: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_synced: Option<DateTime<Utc>>,
}

impl Resource for Price {
    const DOMAIN: Domain = Domain::Prices;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }

    fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    fn mark_synced(&mut self, at: DateTime<Utc>) {
        self.last_synced = Some(at);
    }
}

/// Job vacancy published by the operator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Career {
    pub id: String,
    pub title: String,
    pub description: String,
    pub city: String,
    pub published_at: Option<DateTime<Utc>>,
    pub last_synced: Option<DateTime<Utc>>,
}

impl Resource for Career {
    const DOMAIN: Domain = Domain::Careers;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str(), self.city.as_str()]
    }

    fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    fn mark_synced(&mut self, at: DateTime<Utc>) {
        self.last_synced = Some(at);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    /// Editorial display position
    pub position: i64,
    pub last_synced: Option<DateTime<Utc>>,
}

impl Resource for Faq {
    const DOMAIN: Domain = Domain::Faq;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.question.as_str(), self.answer.as_str()]
    }

    fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    fn mark_synced(&mut self, at: DateTime<Utc>) {
        self.last_synced = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordError;

    #[test]
    fn test_station_deserializes_from_camel_case() {
        let json = serde_json::json!({
            "code": "17",
            "title": "AGNKS-1",
            "latitude": 53.9,
            "longitude": 27.5,
            "stationType": "CNG",
            "workingHours": "24/7"
        });

        let station: Station = serde_json::from_value(json).expect("Failed to deserialize");
        assert_eq!(station.id(), "17");
        assert_eq!(station.type_tag(), Some("CNG"));
        assert_eq!(station.working_hours.as_deref(), Some("24/7"));
        assert_eq!(station.last_synced, None);
    }

    #[test]
    fn test_missing_id_deserializes_but_fails_validation() {
        let news: News = serde_json::from_value(serde_json::json!({ "title": "Orphan" }))
            .expect("Failed to deserialize");
        assert_eq!(news.validate(), Err(RecordError::EmptyId));

        let blank = Faq {
            id: "   ".to_string(),
            ..Faq::default()
        };
        assert_eq!(blank.validate(), Err(RecordError::EmptyId));
    }

    #[test]
    fn test_type_mismatch_is_a_parse_error() {
        let result = serde_json::from_value::<Station>(serde_json::json!({
            "code": "1",
            "latitude": "north"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_is_placeholder() {
        assert!(Station::default().is_placeholder());
        assert!(!Price {
            id: "p1".to_string(),
            ..Price::default()
        }
        .is_placeholder());
    }
}

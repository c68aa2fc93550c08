use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info};

use fuelmap_api::{Domain, RemoteError};
use fuelmap_core::{RawRecord, RecordStream, RemoteSource};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches `GET {base_url}/{domain}` from the operator backend.
pub struct HttpRemoteSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Network {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url_for(&self, domain: Domain) -> String {
        format!("{}/{}", self.base_url, domain.as_str())
    }

    /// Helper to create better error messages from reqwest errors
    fn format_reqwest_error(e: &reqwest::Error, url: &str) -> String {
        if e.is_timeout() {
            format!("Failed to fetch {}: timeout - request took too long", url)
        } else if e.is_connect() {
            format!(
                "Failed to fetch {}: connection error - check network connectivity. Error: {}",
                url, e
            )
        } else if e.is_decode() {
            format!(
                "Failed to fetch {}: decode error - unexpected response format. Error: {}",
                url, e
            )
        } else {
            format!("Failed to fetch {}: {}", url, e)
        }
    }
}

/// Extract the record list from a response body.
///
/// Accepts a bare JSON array, or an object wrapping the array under `items` or
/// `data`.
pub fn parse_records(body: &str) -> Result<Vec<RawRecord>, RemoteError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| RemoteError::Decode {
        message: format!("Response is not JSON: {}", e),
    })?;

    match value {
        serde_json::Value::Array(records) => Ok(records),
        serde_json::Value::Object(mut map) => {
            for key in ["items", "data"] {
                if let Some(serde_json::Value::Array(records)) = map.remove(key) {
                    return Ok(records);
                }
            }
            Err(RemoteError::Decode {
                message: "Response object has no `items` or `data` array".to_string(),
            })
        }
        other => Err(RemoteError::Decode {
            message: format!("Expected a JSON array of records, got {}", other),
        }),
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    fn source_id(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, domain: Domain) -> Result<RecordStream, RemoteError> {
        let url = self.url_for(domain);
        debug!("[HttpRemoteSource] GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RemoteError::Network {
                message: Self::format_reqwest_error(&e, &url),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| RemoteError::Network {
            message: format!("Failed to read response body from {}: {}", url, e),
        })?;

        if !status.is_success() {
            return Err(RemoteError::Http {
                status: status.as_u16(),
                url,
                message: if body.chars().count() > 500 {
                    format!("{}... (truncated)", body.chars().take(500).collect::<String>())
                } else {
                    body
                },
            });
        }

        let records = parse_records(&body)?;
        info!(
            "[HttpRemoteSource] Fetched {} {} records",
            records.len(),
            domain
        );
        Ok(futures::stream::iter(records.into_iter().map(Ok)).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let records = parse_records(r#"[{"id": "1"}, {"id": "2"}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_wrapped_array() {
        assert_eq!(parse_records(r#"{"items": [{"id": "1"}]}"#).unwrap().len(), 1);
        assert_eq!(parse_records(r#"{"data": []}"#).unwrap().len(), 0);
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(matches!(
            parse_records(r#"{"count": 3}"#),
            Err(RemoteError::Decode { .. })
        ));
        assert!(matches!(parse_records("42"), Err(RemoteError::Decode { .. })));
        assert!(matches!(parse_records("<html>"), Err(RemoteError::Decode { .. })));
    }

    #[test]
    fn test_url_for_domain() {
        let source = HttpRemoteSource::new("https://example.org/api/").unwrap();
        assert_eq!(source.url_for(Domain::Faq), "https://example.org/api/faq");
        assert_eq!(source.source_id(), "https://example.org/api");
    }
}

//! HTTP manifest source backed by the public storage endpoint.

use super::wire::DayIndexDoc;
use super::{FetchError, ManifestSource, Result};
use crate::config::FetchConfig;
use crate::model::DayKey;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

/// Fetches day index documents over HTTP from the storage web endpoint.
pub struct HttpManifestSource {
    client: Client,
    base_url: Url,
}

impl HttpManifestSource {
    pub fn new(base_url: &str, fetch: &FetchConfig) -> Result<Self> {
        // A trailing slash keeps Url::join from eating the last path segment.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalized).map_err(|e| FetchError::Request(e.to_string()))?;

        let client = Client::builder()
            .connect_timeout(fetch.connect_timeout())
            .timeout(fetch.request_timeout())
            .user_agent(&fetch.user_agent)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// URL of the index document for one day.
    pub fn index_url(&self, day: DayKey) -> Url {
        self.base_url
            .join(&format!("{}/index.json", day.storage_prefix()))
            .expect("day prefix is a valid relative path")
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch(&self, day: DayKey) -> Result<DayIndexDoc> {
        let url = self.index_url(day);
        debug!(%day, %url, "Fetching day index");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // The blob host occasionally serves indexes with a stale content
        // type; that is worth a warning but not a failure.
        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<mime::Mime>().ok())
            .is_some_and(|m| m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON));
        if !is_json {
            warn!(%url, "Index served with a non-JSON content type");
        }

        response
            .json::<DayIndexDoc>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_url_layout() {
        let source = HttpManifestSource::new(
            "https://cams.example.net",
            &FetchConfig::default(),
        )
        .unwrap();

        let day: DayKey = "2026-08-05".parse().unwrap();
        assert_eq!(
            source.index_url(day).as_str(),
            "https://cams.example.net/2026/08/05/index.json"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let source = HttpManifestSource::new(
            "https://cams.example.net/snaps/",
            &FetchConfig::default(),
        )
        .unwrap();

        let day: DayKey = "2026-08-05".parse().unwrap();
        assert_eq!(
            source.index_url(day).as_str(),
            "https://cams.example.net/snaps/2026/08/05/index.json"
        );
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        assert!(HttpManifestSource::new("not a url", &FetchConfig::default()).is_err());
    }
}

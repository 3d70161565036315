//! Best-effort latest-snapshot state, used only for the staleness banner.
//!
//! The producer refreshes `latest/` aliases every 30 minutes and keeps a
//! small state document next to them. Navigation never reads any of this;
//! a missing or broken document simply means "staleness unknown".

use crate::config::{FetchConfig, LatestConfig};
use crate::fetcher::{FetchError, Result};
use crate::model::CameraId;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;
use url::Url;

/// The `latest/index.json` document as served by storage.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestStateDoc {
    /// Last producer run, RFC 3339.
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub snapshots: Vec<LatestSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestSnapshot {
    pub preset: String,
    pub path: String,
    #[serde(default)]
    pub time: Option<String>,
}

/// Parsed latest state: the newest snapshot path per camera plus the
/// producer's last-updated timestamp.
#[derive(Debug, Clone)]
pub struct LatestState {
    pub updated: Option<DateTime<Utc>>,
    per_camera: BTreeMap<CameraId, String>,
}

impl LatestState {
    pub fn from_doc(doc: LatestStateDoc) -> Self {
        let per_camera = doc
            .snapshots
            .into_iter()
            .map(|snapshot| (CameraId::new(snapshot.preset), snapshot.path))
            .collect();
        Self {
            updated: doc.updated,
            per_camera,
        }
    }

    pub fn path_for(&self, camera: &CameraId) -> Option<&str> {
        self.per_camera.get(camera).map(String::as_str)
    }

    pub fn cameras(&self) -> impl Iterator<Item = &CameraId> {
        self.per_camera.keys()
    }

    /// Time since the producer last ran, `None` when unknown (or when the
    /// clock reads before the update, which means skew, not freshness).
    pub fn staleness(&self, now: DateTime<Utc>) -> Option<Duration> {
        let updated = self.updated?;
        let age = now.signed_duration_since(updated);
        (age >= Duration::zero()).then_some(age)
    }

    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> Option<bool> {
        self.staleness(now).map(|age| age > threshold)
    }
}

/// Fetches the latest-state document from the storage endpoint.
pub struct LatestStateClient {
    client: Client,
    url: Url,
}

impl LatestStateClient {
    pub fn new(base_url: &str, fetch: &FetchConfig) -> Result<Self> {
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let url = Url::parse(&normalized)
            .and_then(|base| base.join("latest/index.json"))
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let client = Client::builder()
            .connect_timeout(fetch.connect_timeout())
            .timeout(fetch.request_timeout())
            .user_agent(&fetch.user_agent)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self { client, url })
    }

    pub async fn fetch(&self) -> Result<LatestState> {
        debug!(url = %self.url, "Fetching latest state");
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.url.to_string(),
            });
        }

        let doc = response
            .json::<LatestStateDoc>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(LatestState::from_doc(doc))
    }
}

/// Staleness threshold from configuration.
pub fn stale_after(config: &LatestConfig) -> Duration {
    Duration::minutes(config.stale_after_minutes as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(json: &str) -> LatestState {
        LatestState::from_doc(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_staleness_against_updated_timestamp() {
        let state = state(
            r#"{
                "updated": "2026-08-30T10:00:00Z",
                "snapshots": [
                    { "preset": "1", "path": "latest/snapshot_1.jpg", "time": "10:00" }
                ]
            }"#,
        );

        let now = "2026-08-30T11:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(state.staleness(now), Some(Duration::minutes(90)));
        assert_eq!(state.is_stale(now, Duration::minutes(75)), Some(true));
        assert_eq!(state.is_stale(now, Duration::minutes(120)), Some(false));
    }

    #[test]
    fn test_missing_updated_means_unknown() {
        let state = state(r#"{ "snapshots": [] }"#);
        let now = Utc::now();
        assert_eq!(state.staleness(now), None);
        assert_eq!(state.is_stale(now, Duration::minutes(75)), None);
    }

    #[test]
    fn test_clock_skew_reads_as_unknown() {
        let state = state(r#"{ "updated": "2026-08-30T12:00:00Z", "snapshots": [] }"#);
        let earlier = "2026-08-30T11:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(state.staleness(earlier), None);
    }

    #[test]
    fn test_per_camera_paths() {
        let state = state(
            r#"{
                "snapshots": [
                    { "preset": "2", "path": "latest/snapshot_2.jpg" },
                    { "preset": "1", "path": "latest/snapshot_1.jpg" }
                ]
            }"#,
        );

        assert_eq!(
            state.path_for(&CameraId::from("1")),
            Some("latest/snapshot_1.jpg")
        );
        assert_eq!(state.path_for(&CameraId::from("9")), None);

        let cameras: Vec<&str> = state.cameras().map(CameraId::as_str).collect();
        assert_eq!(cameras, vec!["1", "2"]);
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub cameras: CamerasConfig,
    #[serde(default)]
    pub latest: LatestConfig,
}

/// Storage endpoint configuration. The container layout itself is fixed:
/// `YYYY/MM/DD/index.json` per day and a `latest/` alias area.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://utivist5vhfj4cenlybqry2.z6.web.core.windows.net".to_string()
}

/// HTTP client tunables for index fetches.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl FetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "hutcam/0.1.0".to_string()
}

/// Navigation engine tunables.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NavigationConfig {
    /// How many adjacent calendar days a cross-day step may examine before
    /// giving up.
    #[serde(default = "default_max_scan_days")]
    pub max_scan_days: u32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_scan_days: default_max_scan_days(),
        }
    }
}

fn default_max_scan_days() -> u32 {
    7
}

/// The fixed camera line-up and its display labels.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CamerasConfig {
    #[serde(default = "default_camera_ids")]
    pub ids: Vec<String>,
    #[serde(default = "default_camera_labels")]
    pub labels: HashMap<String, String>,
}

impl CamerasConfig {
    /// Display label for a camera, falling back to the id itself.
    pub fn label(&self, id: &str) -> String {
        self.labels
            .get(id)
            .cloned()
            .unwrap_or_else(|| format!("camera {id}"))
    }
}

impl Default for CamerasConfig {
    fn default() -> Self {
        Self {
            ids: default_camera_ids(),
            labels: default_camera_labels(),
        }
    }
}

fn default_camera_ids() -> Vec<String> {
    vec!["1", "2", "3", "4"].into_iter().map(String::from).collect()
}

fn default_camera_labels() -> HashMap<String, String> {
    [
        ("1", "Suður"),
        ("2", "Suður að Baldvinsskála"),
        ("3", "Norður"),
        ("4", "Vestur"),
    ]
    .into_iter()
    .map(|(id, label)| (id.to_string(), label.to_string()))
    .collect()
}

/// Staleness banner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LatestConfig {
    /// The producer runs every 30 minutes; 75 minutes means two missed runs.
    #[serde(default = "default_stale_after_minutes")]
    pub stale_after_minutes: u64,
}

impl Default for LatestConfig {
    fn default() -> Self {
        Self {
            stale_after_minutes: default_stale_after_minutes(),
        }
    }
}

fn default_stale_after_minutes() -> u64 {
    75
}

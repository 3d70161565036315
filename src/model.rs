//! Core data model: calendar days, time-of-day periods, cameras and snapshots.
//!
//! A day's snapshots live in remote storage under `YYYY/MM/DD/`, one JPEG per
//! (period, camera) pair, described by a per-day `index.json` manifest. The
//! period a snapshot belongs to is encoded in its filename: the segment before
//! the first `_` is the period tag (`night_2026-08-30_snapshot_1.jpg`).

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid day key: {0}")]
    InvalidDayKey(String),

    #[error("unknown period tag: {0}")]
    UnknownPeriod(String),
}

/// One calendar day, the unit of manifest fetching and caching.
///
/// Canonical textual form is `YYYY-MM-DD`; ordering is calendar order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today in UTC; the producer timestamps everything in UTC.
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// The next calendar day, `None` at the end of the calendar.
    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// The previous calendar day, `None` at the start of the calendar.
    pub fn pred(self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// Storage path prefix for this day (`YYYY/MM/DD`).
    pub fn storage_prefix(self) -> String {
        self.0.format("%Y/%m/%d").to_string()
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| ModelError::InvalidDayKey(s.to_string()))
    }
}

/// Time-of-day bucket a snapshot is grouped under.
///
/// The order of the variants is the traversal order: stepping forward moves
/// night → early → midday → late, then on to the next day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Night,
    Early,
    Midday,
    Late,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Night, Period::Early, Period::Midday, Period::Late];
    pub const COUNT: usize = Self::ALL.len();

    /// Position in the traversal order.
    pub fn ordinal(self) -> usize {
        match self {
            Period::Night => 0,
            Period::Early => 1,
            Period::Midday => 2,
            Period::Late => 3,
        }
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// Parses the period tag the producer embeds in snapshot filenames.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "night" => Some(Period::Night),
            "early" => Some(Period::Early),
            "midday" => Some(Period::Midday),
            "late" => Some(Period::Late),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Night => "night",
            Period::Early => "early",
            Period::Midday => "midday",
            Period::Late => "late",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ModelError::UnknownPeriod(s.to_string()))
    }
}

/// Camera identifier. The producer calls these "presets" (`"1"`..`"4"`,
/// or `"current"` when the camera has no preset list configured).
///
/// Ordered ascending by string value; this is the within-period sort key.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CameraId(String);

impl CameraId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CameraId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One snapshot listed by a day manifest. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Storage-relative path of the JPEG (`YYYY/MM/DD/<period>_<date>_...jpg`).
    pub path: String,
    pub camera: CameraId,
    /// Capture time label (`HH:MM`) as written by the producer, carried opaquely.
    pub captured_at: Option<String>,
}

impl SnapshotEntry {
    /// The period tag encoded in the filename: the segment before the first `_`.
    pub fn period_tag(&self) -> Option<&str> {
        let filename = self.path.rsplit('/').next().unwrap_or(&self.path);
        filename
            .split_once('_')
            .map(|(tag, _)| tag)
            .filter(|tag| !tag.is_empty())
    }

    /// Full image URL on the storage host.
    pub fn image_url(&self, base_url: &str) -> String {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

/// One day's snapshots, bucketed by [`Period`] and sorted by camera id.
///
/// An empty bucket and an absent period are the same thing; there is no
/// "present but empty" distinction.
#[derive(Debug, Clone, PartialEq)]
pub struct DayManifest {
    buckets: [Vec<SnapshotEntry>; Period::COUNT],
}

impl Default for DayManifest {
    fn default() -> Self {
        Self {
            buckets: std::array::from_fn(|_| Vec::new()),
        }
    }
}

impl DayManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, period: Period, entry: SnapshotEntry) {
        self.buckets[period.ordinal()].push(entry);
    }

    /// Orders every bucket by camera id ascending. Called once after grouping.
    pub fn sort_by_camera(&mut self) {
        for bucket in &mut self.buckets {
            bucket.sort_by(|a, b| a.camera.cmp(&b.camera));
        }
    }

    pub fn entries(&self, period: Period) -> &[SnapshotEntry] {
        &self.buckets[period.ordinal()]
    }

    pub fn get(&self, period: Period, index: usize) -> Option<&SnapshotEntry> {
        self.buckets[period.ordinal()].get(index)
    }

    /// True when no period has any snapshot.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.is_empty())
    }

    /// Total snapshot count across all periods.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.len()).sum()
    }

    /// Non-empty periods in traversal order.
    pub fn periods(&self) -> impl Iterator<Item = Period> + '_ {
        Period::ALL
            .into_iter()
            .filter(|period| !self.entries(*period).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, camera: &str) -> SnapshotEntry {
        SnapshotEntry {
            path: path.to_string(),
            camera: CameraId::from(camera),
            captured_at: Some("10:30".to_string()),
        }
    }

    #[test]
    fn test_day_key_round_trip() {
        let day: DayKey = "2026-08-30".parse().unwrap();
        assert_eq!(day.to_string(), "2026-08-30");
        assert_eq!(day.storage_prefix(), "2026/08/30");
    }

    #[test]
    fn test_day_key_rejects_garbage() {
        assert!("2026-13-01".parse::<DayKey>().is_err());
        assert!("not-a-date".parse::<DayKey>().is_err());
    }

    #[test]
    fn test_day_key_calendar_stepping() {
        let day: DayKey = "2026-02-28".parse().unwrap();
        assert_eq!(day.succ().unwrap().to_string(), "2026-03-01");
        assert_eq!(day.pred().unwrap().to_string(), "2026-02-27");
    }

    #[test]
    fn test_period_order_is_traversal_order() {
        let ordinals: Vec<usize> = Period::ALL.iter().map(|p| p.ordinal()).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);
        assert_eq!(Period::from_ordinal(0), Some(Period::Night));
        assert_eq!(Period::from_ordinal(3), Some(Period::Late));
        assert_eq!(Period::from_ordinal(4), None);
    }

    #[test]
    fn test_period_tag_parsing() {
        assert_eq!(Period::from_tag("midday"), Some(Period::Midday));
        assert_eq!(Period::from_tag("dusk"), None);
        assert!("dusk".parse::<Period>().is_err());
    }

    #[test]
    fn test_entry_period_tag_from_filename() {
        let e = entry("2026/08/30/early_2026-08-30_snapshot_2.jpg", "2");
        assert_eq!(e.period_tag(), Some("early"));

        let bare = entry("snapshot.jpg", "1");
        assert_eq!(bare.period_tag(), None);
    }

    #[test]
    fn test_entry_image_url_joining() {
        let e = entry("2026/08/30/late_2026-08-30_snapshot_1.jpg", "1");
        assert_eq!(
            e.image_url("https://cams.example.net/"),
            "https://cams.example.net/2026/08/30/late_2026-08-30_snapshot_1.jpg"
        );
    }

    #[test]
    fn test_manifest_sorts_within_period_by_camera() {
        let mut manifest = DayManifest::new();
        manifest.push(Period::Early, entry("a", "3"));
        manifest.push(Period::Early, entry("b", "1"));
        manifest.push(Period::Early, entry("c", "2"));
        manifest.sort_by_camera();

        let cameras: Vec<&str> = manifest
            .entries(Period::Early)
            .iter()
            .map(|e| e.camera.as_str())
            .collect();
        assert_eq!(cameras, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_manifest_periods_skips_empty_buckets() {
        let mut manifest = DayManifest::new();
        manifest.push(Period::Early, entry("a", "1"));
        manifest.push(Period::Late, entry("b", "1"));

        let periods: Vec<Period> = manifest.periods().collect();
        assert_eq!(periods, vec![Period::Early, Period::Late]);
        assert!(!manifest.is_empty());
        assert_eq!(manifest.len(), 2);
        assert!(manifest.get(Period::Night, 0).is_none());
    }
}

//! Wire format of the per-day index document.
//!
//! The producer maintains one `index.json` per day at
//! `{base}/{YYYY}/{MM}/{DD}/index.json`:
//!
//! ```json
//! {
//!   "date": "2026-08-30",
//!   "snapshots": [
//!     { "time": "10:30", "preset": "1", "path": "2026/08/30/midday_2026-08-30_snapshot_1.jpg" }
//!   ]
//! }
//! ```
//!
//! `date` is optional but authoritative for the cache key when present. The
//! period of each snapshot is not a field of its own; it is recovered from
//! the filename tag (see [`SnapshotEntry::period_tag`]).

use crate::model::{CameraId, DayKey, DayManifest, Period, SnapshotEntry};
use serde::Deserialize;
use tracing::warn;

/// A day's index document as served by storage.
#[derive(Debug, Clone, Deserialize)]
pub struct DayIndexDoc {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub snapshots: Vec<RawSnapshot>,
}

/// One raw snapshot record inside the index.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSnapshot {
    pub path: String,
    pub preset: String,
    #[serde(default)]
    pub time: Option<String>,
}

impl DayIndexDoc {
    /// The day this document describes. The declared `date` field wins when
    /// it parses; otherwise the requested day is kept.
    pub fn authoritative_day(&self, requested: DayKey) -> DayKey {
        match self.date.as_deref().map(str::parse::<DayKey>) {
            Some(Ok(declared)) => declared,
            Some(Err(_)) => {
                warn!(
                    date = self.date.as_deref().unwrap_or_default(),
                    %requested,
                    "Index declares an unparseable date, keying under the requested day"
                );
                requested
            }
            None => requested,
        }
    }

    /// Groups the raw records into a [`DayManifest`], keyed by the period tag
    /// in each filename and sorted by camera id within each period. Records
    /// with an unrecognized period tag are dropped with a warning.
    pub fn into_manifest(self) -> DayManifest {
        let mut manifest = DayManifest::new();
        for raw in self.snapshots {
            let entry = SnapshotEntry {
                camera: CameraId::new(raw.preset),
                captured_at: raw.time,
                path: raw.path,
            };
            match entry.period_tag().and_then(Period::from_tag) {
                Some(period) => manifest.push(period, entry),
                None => {
                    warn!(path = %entry.path, "Snapshot has no recognizable period tag, skipping");
                }
            }
        }
        manifest.sort_by_camera();
        manifest
    }
}

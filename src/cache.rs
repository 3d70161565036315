//! Session-scoped day cache.
//!
//! Maps fetched days to their manifests and keeps the sorted index of known
//! days. Append-only: a day is fetched once per session and never refreshed
//! or evicted. Manifests are small (a handful of entries per day) and viewer
//! sessions are short-lived, so unbounded growth is fine here.

use crate::model::{DayKey, DayManifest};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct DayCache {
    days: BTreeMap<DayKey, DayManifest>,
}

impl DayCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, day: DayKey) -> bool {
        self.days.contains_key(&day)
    }

    pub fn get(&self, day: DayKey) -> Option<&DayManifest> {
        self.days.get(&day)
    }

    /// Stores a freshly fetched manifest. Returns `false` (and keeps the
    /// existing manifest) if the day is already known: fetch once per
    /// session, never refresh.
    pub fn insert(&mut self, day: DayKey, manifest: DayManifest) -> bool {
        if self.days.contains_key(&day) {
            return false;
        }
        self.days.insert(day, manifest);
        true
    }

    /// All fetched days in calendar order, including days whose manifest
    /// turned out to be empty.
    pub fn known_days(&self) -> impl Iterator<Item = DayKey> + '_ {
        self.days.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CameraId, Period, SnapshotEntry};

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn manifest_with(path: &str) -> DayManifest {
        let mut manifest = DayManifest::new();
        manifest.push(
            Period::Early,
            SnapshotEntry {
                path: path.to_string(),
                camera: CameraId::from("1"),
                captured_at: None,
            },
        );
        manifest
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut cache = DayCache::new();
        assert!(!cache.has(day("2026-08-30")));

        assert!(cache.insert(day("2026-08-30"), manifest_with("a")));
        assert!(cache.has(day("2026-08-30")));
        assert_eq!(cache.get(day("2026-08-30")).unwrap().len(), 1);
        assert!(cache.get(day("2026-08-29")).is_none());
    }

    #[test]
    fn test_insert_is_append_only() {
        let mut cache = DayCache::new();
        cache.insert(day("2026-08-30"), manifest_with("first"));

        // A second insert for the same day is a no-op.
        assert!(!cache.insert(day("2026-08-30"), manifest_with("second")));
        let kept = cache.get(day("2026-08-30")).unwrap();
        assert_eq!(kept.entries(Period::Early)[0].path, "first");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_known_days_sorted() {
        let mut cache = DayCache::new();
        cache.insert(day("2026-08-30"), DayManifest::new());
        cache.insert(day("2026-08-28"), DayManifest::new());
        cache.insert(day("2026-08-29"), DayManifest::new());

        let days: Vec<String> = cache.known_days().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2026-08-28", "2026-08-29", "2026-08-30"]);
    }
}

//! The navigator: cursor state machine over the day cache.

use super::cursor::{scan_ordinals, Cursor, Direction, OpenRequest, ViewMode};
use super::location::LocationQuery;
use super::{BlockReason, NavOutcome};
use crate::fetcher::DayFetcher;
use crate::model::{DayKey, DayManifest, Period, SnapshotEntry};
use crate::observability::Metrics;
use crate::surface::{Notice, ViewerSurface};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One viewer session: a fixed [`ViewMode`], the current cursor, and the
/// surface being driven.
///
/// Operations take `&mut self`, so calls are serialized by construction and
/// can never interleave. The cursor is only assigned after a search has
/// fully resolved; a call dropped while awaiting a fetch leaves the previous
/// cursor in place.
pub struct Navigator<S: ViewerSurface> {
    session: Uuid,
    mode: ViewMode,
    /// Cross-day search bound; the scan never loops indefinitely.
    max_scan_days: u32,
    fetcher: Arc<DayFetcher>,
    metrics: Arc<Metrics>,
    surface: S,
    cursor: Option<Cursor>,
}

impl<S: ViewerSurface> Navigator<S> {
    pub fn new(
        mode: ViewMode,
        fetcher: Arc<DayFetcher>,
        metrics: Arc<Metrics>,
        surface: S,
        max_scan_days: u32,
    ) -> Self {
        let session = Uuid::now_v7();
        info!(%session, ?mode, "Viewer session started");
        Self {
            session,
            mode,
            max_scan_days,
            fetcher,
            metrics,
            surface,
            cursor: None,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Opens the viewer at the requested triple. The day is fetched if
    /// needed; a fetch failure is tolerated and the cursor still lands where
    /// asked, with the surface showing the vacant state.
    pub async fn open(&mut self, request: OpenRequest) -> NavOutcome {
        let target = request.resolve(DayKey::today());
        debug!(
            session = %self.session,
            day = %target.day,
            period = %target.period,
            index = target.index,
            "Opening viewer"
        );

        let fetched = self.fetcher.ensure_day(target.day).await;
        if let Err(err) = &fetched {
            warn!(session = %self.session, day = %target.day, error = %err, "No data for day");
        }

        let entry = self
            .fetcher
            .entry_at(target.day, target.period, target.index)
            .await;
        self.finish_open(target, entry, fetched.is_err())
    }

    /// Restores a viewer from shareable location state, resolving the camera
    /// id back to an index within its period (index 0 when the camera is
    /// absent or unknown).
    pub async fn open_location(&mut self, query: &LocationQuery) -> NavOutcome {
        let fetched = self.fetcher.ensure_day(query.day).await;
        if let Err(err) = &fetched {
            warn!(session = %self.session, day = %query.day, error = %err, "No data for day");
        }

        let manifest = self.fetcher.manifest(query.day).await;
        let index = match (&query.camera, &manifest) {
            (Some(camera), Some(manifest)) => manifest
                .entries(query.period)
                .iter()
                .position(|entry| &entry.camera == camera)
                .unwrap_or(0),
            _ => 0,
        };

        let target = Cursor {
            day: query.day,
            period: query.period,
            index,
        };
        let entry = manifest.and_then(|m| m.get(query.period, index).cloned());
        self.finish_open(target, entry, fetched.is_err())
    }

    fn finish_open(
        &mut self,
        target: Cursor,
        entry: Option<SnapshotEntry>,
        day_unavailable: bool,
    ) -> NavOutcome {
        self.cursor = Some(target);
        self.publish(target, entry.as_ref());
        match entry {
            Some(entry) => {
                self.surface.show_entry(&target, &entry);
                NavOutcome::Moved(target)
            }
            None => {
                // A day without a manifest reads differently to the viewer
                // than a merely vacant triple on a fetched day.
                let notice = if day_unavailable {
                    Notice::NoDataForDay(target.day)
                } else {
                    Notice::NoImage
                };
                self.surface.show_notice(notice);
                NavOutcome::Vacant(target)
            }
        }
    }

    /// Closes the viewer: clears published location state (History) and
    /// hides the surface.
    pub fn close(&mut self) {
        debug!(session = %self.session, "Closing viewer");
        if self.mode == ViewMode::History {
            self.surface.publish_location(None);
        }
        self.surface.hide();
        self.cursor = None;
    }

    /// Steps the cursor one entry in `direction`, crossing period and day
    /// boundaries as needed.
    pub async fn step(&mut self, direction: Direction) -> NavOutcome {
        let Some(current) = self.cursor else {
            debug!(session = %self.session, "Step requested with nothing open");
            return NavOutcome::Blocked(BlockReason::NothingOpen);
        };

        if self.mode == ViewMode::Latest {
            return match direction {
                Direction::Forward => {
                    self.metrics.step_blocked();
                    self.surface.show_notice(Notice::AtNewest);
                    NavOutcome::Blocked(BlockReason::AtNewest)
                }
                Direction::Back => {
                    // A hand-off between browsing contexts, not an in-place
                    // step: history takes over anchored at the current day.
                    info!(session = %self.session, day = %current.day, "Handing off to history");
                    self.surface.redirect_to_history(current.day);
                    NavOutcome::HandedOff(current.day)
                }
            };
        }

        match self.search(current, direction).await {
            Some((next, entry)) => {
                self.cursor = Some(next);
                self.metrics.step_resolved();
                self.publish(next, Some(&entry));
                self.surface.show_entry(&next, &entry);
                NavOutcome::Moved(next)
            }
            None => {
                self.metrics.step_exhausted();
                self.surface.show_notice(Notice::NoFurther(direction));
                NavOutcome::Exhausted
            }
        }
    }

    /// Finds the next valid cursor in `direction`, or `None` when the
    /// sequence is exhausted. Never mutates session state.
    async fn search(
        &self,
        from: Cursor,
        direction: Direction,
    ) -> Option<(Cursor, SnapshotEntry)> {
        if let Some(manifest) = self.fetcher.manifest(from.day).await {
            // Neighbouring index within the same period.
            let neighbour = from.index as i64 + direction.signum();
            let entries = manifest.entries(from.period);
            if (0..entries.len() as i64).contains(&neighbour) {
                let index = neighbour as usize;
                let next = Cursor { index, ..from };
                return Some((next, entries[index].clone()));
            }

            // Remaining periods of the same day.
            let start = from.period.ordinal() as i64 + direction.signum();
            if let Some(found) = Self::land_in(from.day, &manifest, start, direction) {
                return Some(found);
            }
        }

        // Adjacent days, fetched on demand. A fetch failure ends the search
        // immediately; a day that fetched fine but holds no snapshots is
        // skipped and the scan continues.
        let mut day = from.day;
        for _ in 0..self.max_scan_days {
            day = match direction {
                Direction::Forward => day.succ()?,
                Direction::Back => day.pred()?,
            };
            let key = match self.fetcher.ensure_day(day).await {
                Ok(key) => key,
                Err(_) => return None,
            };
            if let Some(manifest) = self.fetcher.manifest(key).await {
                let arrival = match direction {
                    Direction::Forward => 0,
                    Direction::Back => Period::COUNT as i64 - 1,
                };
                if let Some(found) = Self::land_in(key, &manifest, arrival, direction) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// First non-empty period of `manifest` scanning from `start_ordinal` in
    /// `direction`; entered at index 0 going forward, last index going back.
    fn land_in(
        day: DayKey,
        manifest: &DayManifest,
        start_ordinal: i64,
        direction: Direction,
    ) -> Option<(Cursor, SnapshotEntry)> {
        for ordinal in scan_ordinals(start_ordinal, Period::COUNT, direction) {
            let period = Period::from_ordinal(ordinal)?;
            let entries = manifest.entries(period);
            if entries.is_empty() {
                continue;
            }
            let index = match direction {
                Direction::Forward => 0,
                Direction::Back => entries.len() - 1,
            };
            let cursor = Cursor { day, period, index };
            return Some((cursor, entries[index].clone()));
        }
        None
    }

    fn publish(&mut self, cursor: Cursor, entry: Option<&SnapshotEntry>) {
        if self.mode != ViewMode::History {
            return;
        }
        let query = LocationQuery {
            day: cursor.day,
            period: cursor.period,
            camera: entry.map(|e| e.camera.clone()),
        };
        self.surface.publish_location(Some(&query));
    }
}

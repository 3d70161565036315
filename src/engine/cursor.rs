//! Cursor, direction and open-request types for the navigation engine.

use crate::model::{DayKey, Period};

/// The currently selected (day, period, camera-index) triple.
///
/// A cursor is *valid* when the cached manifest for `day` has an entry at
/// `(period, index)`; the engine may deliberately hold an unresolvable
/// cursor after `open` so the surface can show a "no image" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub day: DayKey,
    pub period: Period,
    pub index: usize,
}

/// Step direction through the snapshot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

impl Direction {
    pub fn signum(self) -> i64 {
        match self {
            Direction::Back => -1,
            Direction::Forward => 1,
        }
    }
}

/// The two browsing contexts. Fixed for the lifetime of a session; the
/// Latest page only ever hands backward navigation off to a History session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Latest,
    History,
}

/// An explicit open request, resolved to a concrete day exactly once before
/// any state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenRequest {
    /// Open within today's manifest.
    AnchorToday { period: Period, index: usize },
    /// Open at an explicit day.
    AnchorDay {
        day: DayKey,
        period: Period,
        index: usize,
    },
}

impl OpenRequest {
    pub fn resolve(self, today: DayKey) -> Cursor {
        match self {
            OpenRequest::AnchorToday { period, index } => Cursor {
                day: today,
                period,
                index,
            },
            OpenRequest::AnchorDay { day, period, index } => Cursor { day, period, index },
        }
    }
}

/// Walks ordinals `[0, len)` starting at `start` (which may lie outside the
/// range, yielding nothing) in the given direction. This is the one
/// bidirectional scan used for both period traversal and day-arrival
/// scanning, so the off-by-one rules live in a single place.
pub(crate) fn scan_ordinals(
    start: i64,
    len: usize,
    direction: Direction,
) -> impl Iterator<Item = usize> {
    let len = len as i64;
    let step = direction.signum();
    std::iter::successors(Some(start), move |&ordinal| Some(ordinal + step))
        .take_while(move |&ordinal| (0..len).contains(&ordinal))
        .map(|ordinal| ordinal as usize)
}

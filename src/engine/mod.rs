//! Cursor navigation over the day cache.
//!
//! The engine owns one [`Cursor`] per viewer session and resolves `open`,
//! `step` and `close` requests against the cached manifests, fetching
//! adjacent days on demand when a step runs off the end of the local data.
//! Policy and exhaustion outcomes are ordinary [`NavOutcome`] values, never
//! errors; nothing in here is fatal to a session.

pub mod cursor;
pub mod location;
mod navigator;

pub use cursor::{Cursor, Direction, OpenRequest, ViewMode};
pub use location::{LocationError, LocationQuery};
pub use navigator::Navigator;

use crate::model::DayKey;

/// Why a navigation request was refused without moving the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// Latest mode has nothing newer than what is already shown.
    AtNewest,
    /// `step` with no open cursor.
    NothingOpen,
}

/// Tagged outcome of `open` and `step`. The surface chooses presentation
/// per tag; the engine guarantees the cursor is coherent in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Cursor moved and resolves to an entry.
    Moved(Cursor),
    /// Cursor was set as requested but no entry exists there (open only).
    Vacant(Cursor),
    /// Refused by mode policy; cursor unchanged.
    Blocked(BlockReason),
    /// Latest-mode back-step handed off to a History session at `day`.
    HandedOff(DayKey),
    /// No further entry exists in the requested direction; cursor unchanged.
    Exhausted,
}

impl NavOutcome {
    pub fn cursor(&self) -> Option<Cursor> {
        match self {
            NavOutcome::Moved(cursor) | NavOutcome::Vacant(cursor) => Some(*cursor),
            _ => None,
        }
    }
}

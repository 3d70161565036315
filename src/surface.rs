//! The viewer surface contract.
//!
//! The engine decides *what* is shown; a [`ViewerSurface`] decides *how*.
//! Markup, styling, focus management and input wiring all live behind this
//! trait; the engine only ever calls back with a resolved entry or a
//! notice to display.

use crate::engine::location::LocationQuery;
use crate::engine::{Cursor, Direction};
use crate::model::{DayKey, SnapshotEntry};

/// Non-image outcomes the surface has to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The open cursor does not resolve to an entry.
    NoImage,
    /// The opened day has no manifest at all (fetch failed).
    NoDataForDay(DayKey),
    /// Latest mode refused a forward step.
    AtNewest,
    /// The sequence is exhausted in the given direction.
    NoFurther(Direction),
}

impl Notice {
    /// Default message text; surfaces are free to localize instead.
    pub fn message(self) -> &'static str {
        match self {
            Notice::NoImage => "no image available",
            Notice::NoDataForDay(_) => "no data for this day",
            Notice::AtNewest => "already at the newest item",
            Notice::NoFurther(_) => "no further items",
        }
    }
}

/// Rendering collaborator driven by the navigation engine.
pub trait ViewerSurface: Send {
    /// Show the snapshot the cursor resolved to.
    fn show_entry(&mut self, cursor: &Cursor, entry: &SnapshotEntry);

    /// Show a textual state instead of an image.
    fn show_notice(&mut self, notice: Notice);

    /// Hide the viewer (close).
    fn hide(&mut self);

    /// Leave the Latest context for a History session anchored at `day`.
    fn redirect_to_history(&mut self, day: DayKey);

    /// Mirror the open selection into shareable location state; `None`
    /// clears it. Only History sessions receive this call.
    fn publish_location(&mut self, location: Option<&LocationQuery>);
}

/// Console surface used by the CLI: prints image URLs and notices.
pub struct ConsoleSurface {
    base_url: String,
}

impl ConsoleSurface {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl ViewerSurface for ConsoleSurface {
    fn show_entry(&mut self, cursor: &Cursor, entry: &SnapshotEntry) {
        let time = entry.captured_at.as_deref().unwrap_or("--:--");
        println!(
            "{} {:>6} [{}] camera {}  {}",
            cursor.day,
            cursor.period,
            time,
            entry.camera,
            entry.image_url(&self.base_url)
        );
    }

    fn show_notice(&mut self, notice: Notice) {
        match notice {
            Notice::NoDataForDay(day) => println!("-- no data for {day}"),
            other => println!("-- {}", other.message()),
        }
    }

    fn hide(&mut self) {
        println!("-- viewer closed");
    }

    fn redirect_to_history(&mut self, day: DayKey) {
        println!("-- switching to history view at {day}");
    }

    fn publish_location(&mut self, location: Option<&LocationQuery>) {
        if let Some(query) = location {
            let params: Vec<String> = query
                .to_pairs()
                .into_iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            println!("-- location: ?{}", params.join("&"));
        }
    }
}

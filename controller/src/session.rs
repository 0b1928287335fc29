//! Session state owned by the controller.

use life_canvas_core::{CellSize, GridSize, InteractionMode, StepInterval, Theme};
use serde::Serialize;

/// Mutable per-session values shown around the canvas.
///
/// `generation` and `alive_count` are derived by the controller; nothing
/// outside it writes them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub(crate) generation: u64,
    pub(crate) alive_count: usize,
    pub(crate) cell_size: CellSize,
    pub(crate) interval: StepInterval,
    pub(crate) mode: InteractionMode,
    pub(crate) theme: Theme,
}

impl Session {
    pub(crate) fn new(interval: StepInterval, theme: Theme) -> Self {
        Self {
            generation: 0,
            alive_count: 0,
            cell_size: CellSize::INITIAL,
            interval,
            mode: InteractionMode::Toggle,
            theme,
        }
    }

    /// Completed steps since the last restart or clear.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Living cells counted during the most recent render.
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Current cell edge length.
    #[must_use]
    pub const fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    /// Current step interval.
    #[must_use]
    pub const fn interval(&self) -> StepInterval {
        self.interval
    }

    /// Toggle or placement mode.
    #[must_use]
    pub const fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// Active theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }
}

/// Serializable summary of the session, used for status output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Whether an engine universe is available.
    pub ready: bool,
    /// Whether the scheduler is running.
    pub running: bool,
    /// Completed steps since the last reset.
    pub generation: u64,
    /// Living cells at the last render.
    pub alive: usize,
    /// Universe columns, zero while not ready.
    pub width: u32,
    /// Universe rows, zero while not ready.
    pub height: u32,
    /// Cell edge length in pixels.
    pub cell_size_px: u32,
    /// Step interval in milliseconds.
    pub interval_ms: u32,
    /// Steps per second label.
    pub rate: String,
    /// Active theme.
    pub theme: Theme,
    /// Name of the pattern selected for placement.
    pub selected_pattern: Option<String>,
}

impl SessionSnapshot {
    pub(crate) fn capture(session: &Session, running: bool, grid: Option<GridSize>) -> Self {
        let grid = grid.unwrap_or(GridSize::new(0, 0));
        Self {
            ready: !grid.is_empty(),
            running,
            generation: session.generation,
            alive: session.alive_count,
            width: grid.width(),
            height: grid.height(),
            cell_size_px: session.cell_size.get(),
            interval_ms: session.interval.millis(),
            rate: session.interval.rate_label(),
            theme: session.theme,
            selected_pattern: session
                .mode
                .selected_pattern()
                .map(|pattern| pattern.name().to_owned()),
        }
    }
}

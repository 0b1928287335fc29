#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across Life Canvas.
//!
//! This crate defines the vocabulary that connects the external simulation
//! engine, the pure controller systems and the rendering adapters. The engine
//! is reached exclusively through the narrow [`Engine`] capability trait and
//! its raw byte buffer is interpreted through [`CellStates`]. Systems consume
//! immutable views and respond with [`Command`] batches that the controller
//! applies to the engine and to its session state.

mod cells;

use std::{fmt, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cells::{CellStates, CellStatesIter};

/// Byte value the engine stores for a dead cell.
pub const DEAD_BYTE: u8 = 0;

/// Byte value the engine stores for a living cell.
pub const ALIVE_BYTE: u8 = 1;

/// Two-valued state of a single automaton cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// The cell is empty.
    Dead,
    /// The cell is populated.
    Alive,
}

impl CellState {
    /// Interprets a raw engine byte. Any nonzero value is alive.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        if byte == DEAD_BYTE {
            Self::Dead
        } else {
            Self::Alive
        }
    }

    /// Byte representation stored in the engine buffer.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Dead => DEAD_BYTE,
            Self::Alive => ALIVE_BYTE,
        }
    }

    /// Returns the opposite state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dead => Self::Alive,
            Self::Alive => Self::Dead,
        }
    }

    /// Whether the cell is alive.
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Offsets the coordinate by the provided row and column deltas.
    ///
    /// Returns `None` when the result does not fit in the coordinate space.
    #[must_use]
    pub fn checked_offset(self, rows: u32, columns: u32) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(rows)?,
            column: self.column.checked_add(columns)?,
        })
    }
}

/// Logical dimensions of a universe measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells, which is also the engine buffer length.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the grid contains no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the coordinate lies inside `[0, height) × [0, width)`.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row < self.height && cell.column < self.width
    }

    /// Row-major buffer index of the cell, `row * width + column`.
    #[must_use]
    pub const fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.row as usize * self.width as usize + cell.column as usize)
        } else {
            None
        }
    }

    /// Inverse of [`GridSize::index`].
    #[must_use]
    pub const fn coord(&self, index: usize) -> Option<CellCoord> {
        if self.width == 0 || index >= self.cell_count() {
            return None;
        }
        let width = self.width as usize;
        Some(CellCoord::new((index / width) as u32, (index % width) as u32))
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let width = self.width;
        (0..self.height)
            .flat_map(move |row| (0..width).map(move |column| CellCoord::new(row, column)))
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Edge length of a rendered cell in canvas pixels, excluding its 1px border.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellSize(u32);

impl CellSize {
    /// Smallest cell size the layout ever produces.
    pub const MIN: Self = Self(2);

    /// Cell size used before the first layout pass.
    pub const INITIAL: Self = Self(8);

    /// Creates a cell size, clamping to at least one pixel.
    #[must_use]
    pub const fn new(pixels: u32) -> Self {
        if pixels == 0 {
            Self(1)
        } else {
            Self(pixels)
        }
    }

    /// Cell edge length in pixels.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Distance between the origins of two adjacent cells.
    #[must_use]
    pub const fn pitch(&self) -> u32 {
        self.0 + 1
    }

    /// Canvas dimensions `(pitch * width + 1, pitch * height + 1)` for a grid.
    #[must_use]
    pub const fn canvas_extent(&self, grid: GridSize) -> (u32, u32) {
        (
            self.pitch() * grid.width() + 1,
            self.pitch() * grid.height() + 1,
        )
    }
}

/// Grouping label attached to every catalog pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    /// Patterns that never change.
    StillLife,
    /// Patterns that return to their initial state after a fixed period.
    Oscillator,
    /// Patterns that translate across the grid.
    Spaceship,
    /// Patterns that periodically emit spaceships.
    Gun,
    /// Small seeds that evolve for a long time before stabilising.
    Methuselah,
}

impl PatternCategory {
    /// Human readable label shown in the pattern picker.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::StillLife => "Still life",
            Self::Oscillator => "Oscillator",
            Self::Spaceship => "Spaceship",
            Self::Gun => "Gun",
            Self::Methuselah => "Methuselah",
        }
    }
}

/// Errors raised while constructing a [`Pattern`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    /// The matrix contained no rows or an empty first row.
    #[error("pattern '{name}' has no cells")]
    Empty {
        /// Name of the rejected pattern.
        name: String,
    },
    /// A row length differed from the first row.
    #[error("pattern '{name}' row {row} has {found} columns, expected {expected}")]
    Ragged {
        /// Name of the rejected pattern.
        name: String,
        /// Index of the offending row.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },
    /// A matrix entry was neither 0 nor 1.
    #[error("pattern '{name}' contains value {value} at ({row}, {column})")]
    InvalidValue {
        /// Name of the rejected pattern.
        name: String,
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        column: usize,
        /// The value that was found.
        value: u8,
    },
}

/// Named rectangular 0/1 stamp loaded from the pattern catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern {
    name: String,
    category: PatternCategory,
    rows: u32,
    columns: u32,
    cells: Vec<CellState>,
}

impl Pattern {
    /// Builds a pattern from a matrix of 0/1 rows.
    ///
    /// Every row must have the same length as the first.
    pub fn from_rows<N, R>(
        name: N,
        category: PatternCategory,
        rows: &[R],
    ) -> Result<Self, PatternError>
    where
        N: Into<String>,
        R: AsRef<[u8]>,
    {
        let name = name.into();
        let expected = match rows.first() {
            Some(first) if !first.as_ref().is_empty() => first.as_ref().len(),
            _ => return Err(PatternError::Empty { name }),
        };

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != expected {
                return Err(PatternError::Ragged {
                    name,
                    row: row_index,
                    expected,
                    found: row.len(),
                });
            }
            for (column_index, value) in row.iter().copied().enumerate() {
                let state = match value {
                    0 => CellState::Dead,
                    1 => CellState::Alive,
                    _ => {
                        return Err(PatternError::InvalidValue {
                            name,
                            row: row_index,
                            column: column_index,
                            value,
                        })
                    }
                };
                cells.push(state);
            }
        }

        Ok(Self {
            name,
            category,
            rows: rows.len() as u32,
            columns: expected as u32,
            cells,
        })
    }

    /// Display name of the pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category used to group the pattern.
    #[must_use]
    pub const fn category(&self) -> PatternCategory {
        self.category
    }

    /// Number of matrix rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of matrix columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// State of the matrix entry at `(row, column)`; dead when out of range.
    #[must_use]
    pub fn state(&self, row: u32, column: u32) -> CellState {
        if row >= self.rows || column >= self.columns {
            return CellState::Dead;
        }
        self.cells[(row * self.columns + column) as usize]
    }

    /// Iterates every matrix entry as `(row, column, state)` in row-major order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, u32, CellState)> + '_ {
        let columns = self.columns;
        self.cells.iter().enumerate().map(move |(index, state)| {
            let index = index as u32;
            (index / columns, index % columns, *state)
        })
    }

    /// Number of alive entries in the matrix.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|state| state.is_alive()).count()
    }
}

/// Colour scheme selected by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background with indigo cells.
    #[default]
    Light,
    /// Dark background with violet cells.
    Dark,
}

impl Theme {
    /// Builds a theme from the persisted dark-mode flag.
    #[must_use]
    pub const fn from_dark_flag(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// Whether this is the dark theme.
    #[must_use]
    pub const fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Returns the other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// How clicks on the canvas are interpreted.
///
/// Placement mode carries the selected pattern together with its optional
/// preview anchor, so a selection can never exist outside placement mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    /// Clicking a cell flips its state.
    #[default]
    Toggle,
    /// Clicking stamps the selected pattern once and returns to toggle mode.
    Placement {
        /// Pattern that will be stamped.
        pattern: Arc<Pattern>,
        /// Cell under the pointer, if the pointer is over the canvas.
        preview: Option<CellCoord>,
    },
}

impl InteractionMode {
    /// Enters placement mode for the pattern with no preview yet.
    #[must_use]
    pub fn placing(pattern: Arc<Pattern>) -> Self {
        Self::Placement {
            pattern,
            preview: None,
        }
    }

    /// Pattern selected for placement, if any.
    #[must_use]
    pub fn selected_pattern(&self) -> Option<&Arc<Pattern>> {
        match self {
            Self::Toggle => None,
            Self::Placement { pattern, .. } => Some(pattern),
        }
    }

    /// Preview anchor while a pattern is selected and hovered.
    #[must_use]
    pub fn preview(&self) -> Option<CellCoord> {
        match self {
            Self::Toggle => None,
            Self::Placement { preview, .. } => *preview,
        }
    }

    /// Whether a pattern is selected.
    #[must_use]
    pub const fn is_placement(&self) -> bool {
        matches!(self, Self::Placement { .. })
    }
}

/// Inclusive range the step interval may be adjusted within.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalBounds {
    min_ms: u32,
    max_ms: u32,
    step_ms: u32,
}

impl IntervalBounds {
    /// Creates bounds, returning `None` when `min_ms` is zero or exceeds `max_ms`.
    #[must_use]
    pub const fn new(min_ms: u32, max_ms: u32, step_ms: u32) -> Option<Self> {
        if min_ms == 0 || min_ms > max_ms {
            return None;
        }
        let step_ms = if step_ms == 0 { 1 } else { step_ms };
        Some(Self {
            min_ms,
            max_ms,
            step_ms,
        })
    }

    /// Fastest permitted interval in milliseconds.
    #[must_use]
    pub const fn min_ms(&self) -> u32 {
        self.min_ms
    }

    /// Slowest permitted interval in milliseconds.
    #[must_use]
    pub const fn max_ms(&self) -> u32 {
        self.max_ms
    }

    /// Slider granularity in milliseconds.
    #[must_use]
    pub const fn step_ms(&self) -> u32 {
        self.step_ms
    }

    /// Clamps a requested interval into the bounds.
    #[must_use]
    pub const fn clamp(&self, millis: u32) -> StepInterval {
        let millis = if millis < self.min_ms {
            self.min_ms
        } else if millis > self.max_ms {
            self.max_ms
        } else {
            millis
        };
        StepInterval(millis)
    }

    /// Snaps a slider position to the step grid anchored at `min_ms`, then clamps.
    #[must_use]
    pub fn snap(&self, millis: f32) -> StepInterval {
        let offset = (millis - self.min_ms as f32).max(0.0);
        let steps = (offset / self.step_ms as f32).round() as u32;
        self.clamp(self.min_ms.saturating_add(steps.saturating_mul(self.step_ms)))
    }
}

impl Default for IntervalBounds {
    fn default() -> Self {
        Self {
            min_ms: 20,
            max_ms: 1_000,
            step_ms: 10,
        }
    }
}

/// Minimum wall-clock time between two accepted simulation steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StepInterval(u32);

impl StepInterval {
    /// Interval applied when no configuration overrides it.
    pub const DEFAULT: Self = Self(100);

    /// Interval length in milliseconds.
    #[must_use]
    pub const fn millis(&self) -> u32 {
        self.0
    }

    /// Interval length as a [`Duration`].
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0 as u64)
    }

    /// Steps per second implied by the interval, `1000 / interval`.
    #[must_use]
    pub fn steps_per_second(&self) -> f64 {
        1_000.0 / f64::from(self.0.max(1))
    }

    /// Rate label shown next to the speed slider, rounded to one decimal.
    #[must_use]
    pub fn rate_label(&self) -> String {
        format!("{:.1}/s", self.steps_per_second())
    }
}

impl Default for StepInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Commands emitted by systems and applied by the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Writes a single cell through the engine.
    SetCell {
        /// Target cell, always inside the current grid.
        cell: CellCoord,
        /// State to store.
        state: CellState,
    },
    /// Moves or hides the placement preview.
    SetPreview {
        /// New anchor, or `None` to hide the preview.
        cell: Option<CellCoord>,
    },
    /// Drops the selected pattern and returns to toggle mode.
    ExitPlacement,
    /// Requests an immediate out-of-cycle render.
    Render,
}

/// Errors reported by an engine implementation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine module could not be loaded or initialised.
    #[error("engine unavailable: {reason}")]
    Unavailable {
        /// Human readable cause.
        reason: String,
    },
    /// The engine refused to allocate a universe.
    #[error("engine could not allocate a {grid} universe")]
    Allocation {
        /// Requested dimensions.
        grid: GridSize,
    },
}

/// Narrow capability interface onto the external simulation engine.
///
/// Universes are addressed through opaque handles. Cell contents are only
/// observable through [`Engine::memory`] at [`Engine::cells_offset`]; any view
/// obtained that way is invalidated by the next `set_cell` or `tick`.
pub trait Engine {
    /// Opaque universe handle.
    type Handle: Copy + Eq + fmt::Debug;

    /// Allocates a new universe with engine-default dimensions and contents.
    fn create(&mut self) -> Result<Self::Handle, EngineError>;

    /// Discards a universe. The handle must not be used afterwards.
    fn release(&mut self, handle: Self::Handle);

    /// Number of columns; fixed for the handle's lifetime.
    fn width(&self, handle: Self::Handle) -> u32;

    /// Number of rows; fixed for the handle's lifetime.
    fn height(&self, handle: Self::Handle) -> u32;

    /// Byte offset into [`Engine::memory`] where the `width * height` cell array begins.
    fn cells_offset(&self, handle: Self::Handle) -> usize;

    /// Raw linear memory, or `None` while the engine memory is unavailable.
    fn memory(&self) -> Option<&[u8]>;

    /// Writes one cell. Out-of-range coordinates violate the contract.
    fn set_cell(&mut self, handle: Self::Handle, cell: CellCoord, state: CellState);

    /// Advances the universe exactly one generation in place.
    fn tick(&mut self, handle: Self::Handle);

    /// Dimensions of the universe.
    fn grid(&self, handle: Self::Handle) -> GridSize {
        GridSize::new(self.width(handle), self.height(handle))
    }
}

/// Identifier of an outstanding per-frame callback request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequestId(u64);

impl FrameRequestId {
    /// Wraps a raw request identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Host facility that delivers one callback per presented frame on request.
pub trait FrameHost {
    /// Schedules a callback for the next presented frame.
    fn request_frame(&mut self) -> FrameRequestId;

    /// Cancels a previously requested callback. Unknown ids are ignored.
    fn cancel_frame(&mut self, request: FrameRequestId);
}

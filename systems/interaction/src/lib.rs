#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system translating pointer input into cell mutation commands.

use glam::Vec2;
use life_canvas_core::{
    CellCoord, CellSize, CellStates, Command, GridSize, InteractionMode, Pattern,
};

/// Pointer position as reported by the host, before scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Position relative to the displayed canvas' top-left corner.
    pub position: Vec2,
    /// Size the canvas is displayed at.
    pub display_size: Vec2,
    /// Size of the canvas' backing pixel buffer.
    pub canvas_size: Vec2,
}

impl PointerSample {
    /// Creates a sample for a canvas displayed at its backing resolution.
    #[must_use]
    pub fn unscaled(position: Vec2, canvas_size: Vec2) -> Self {
        Self {
            position,
            display_size: canvas_size,
            canvas_size,
        }
    }

    /// Position converted to canvas pixels.
    #[must_use]
    pub fn canvas_position(&self) -> Vec2 {
        let scale = Vec2::new(
            scale_axis(self.canvas_size.x, self.display_size.x),
            scale_axis(self.canvas_size.y, self.display_size.y),
        );
        self.position * scale
    }
}

fn scale_axis(canvas: f32, display: f32) -> f32 {
    if display > 0.0 {
        canvas / display
    } else {
        1.0
    }
}

/// Maps a pointer sample onto the grid cell beneath it.
///
/// Coordinates are clamped into `[0, height) × [0, width)`. Returns `None`
/// for an empty grid.
#[must_use]
pub fn pointer_to_cell(
    sample: &PointerSample,
    cell_size: CellSize,
    grid: GridSize,
) -> Option<CellCoord> {
    if grid.is_empty() {
        return None;
    }

    let position = sample.canvas_position();
    let pitch = cell_size.pitch() as f32;
    let column = clamp_axis(position.x / pitch, grid.width());
    let row = clamp_axis(position.y / pitch, grid.height());
    Some(CellCoord::new(row, column))
}

fn clamp_axis(cells: f32, extent: u32) -> u32 {
    let floored = cells.floor();
    if floored.is_nan() || floored <= 0.0 {
        0
    } else {
        (floored as u32).min(extent - 1)
    }
}

/// Pointer event delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    /// The pointer moved over the canvas.
    Move(PointerSample),
    /// The pointer left the canvas.
    Leave,
    /// The primary button was clicked on the canvas.
    Click(PointerSample),
}

/// Emits `SetCell` commands stamping `pattern` with its top-left at `anchor`.
///
/// Pattern cells falling outside the grid are skipped.
pub fn stamp(pattern: &Pattern, anchor: CellCoord, grid: GridSize, out: &mut Vec<Command>) {
    for (row, column, state) in pattern.entries() {
        let Some(cell) = anchor.checked_offset(row, column) else {
            continue;
        };
        if grid.contains(cell) {
            out.push(Command::SetCell { cell, state });
        }
    }
}

/// Interaction system for the toggle and placement modes.
#[derive(Debug, Default, Clone)]
pub struct Interaction;

impl Interaction {
    /// Creates a new interaction system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Translates one pointer event into commands.
    ///
    /// `cells` must be a view read after the most recent engine mutation.
    /// Without a view the engine is not ready and nothing is emitted.
    pub fn handle(
        &self,
        mode: &InteractionMode,
        input: PointerInput,
        cell_size: CellSize,
        cells: Option<&CellStates<'_>>,
        out: &mut Vec<Command>,
    ) {
        let Some(cells) = cells else {
            return;
        };
        let grid = cells.grid();

        match (mode, input) {
            (InteractionMode::Toggle, PointerInput::Move(_) | PointerInput::Leave) => {}
            (InteractionMode::Placement { preview, .. }, PointerInput::Move(sample)) => {
                let hovered = pointer_to_cell(&sample, cell_size, grid);
                if hovered != *preview {
                    out.push(Command::SetPreview { cell: hovered });
                    out.push(Command::Render);
                }
            }
            (InteractionMode::Placement { preview, .. }, PointerInput::Leave) => {
                if preview.is_some() {
                    out.push(Command::SetPreview { cell: None });
                    out.push(Command::Render);
                }
            }
            (InteractionMode::Placement { pattern, preview }, PointerInput::Click(sample)) => {
                let Some(anchor) = preview.or_else(|| pointer_to_cell(&sample, cell_size, grid))
                else {
                    return;
                };
                stamp(pattern, anchor, grid, out);
                out.push(Command::ExitPlacement);
                out.push(Command::Render);
            }
            (InteractionMode::Toggle, PointerInput::Click(sample)) => {
                let Some(cell) = pointer_to_cell(&sample, cell_size, grid) else {
                    return;
                };
                out.push(Command::SetCell {
                    cell,
                    state: cells.get(cell).toggled(),
                });
                out.push(Command::Render);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_maps_through_cell_pitch() {
        let sample = PointerSample::unscaled(Vec2::new(19.5, 9.0), Vec2::new(577.0, 577.0));
        let cell = pointer_to_cell(&sample, CellSize::new(8), GridSize::new(64, 64));

        assert_eq!(cell, Some(CellCoord::new(1, 2)));
    }

    #[test]
    fn pointer_is_clamped_into_grid() {
        let grid = GridSize::new(4, 3);
        let far = PointerSample::unscaled(Vec2::new(10_000.0, 10_000.0), Vec2::new(37.0, 28.0));
        let negative = PointerSample::unscaled(Vec2::new(-5.0, -1.0), Vec2::new(37.0, 28.0));

        assert_eq!(pointer_to_cell(&far, CellSize::new(8), grid), Some(CellCoord::new(2, 3)));
        assert_eq!(pointer_to_cell(&negative, CellSize::new(8), grid), Some(CellCoord::new(0, 0)));
    }

    #[test]
    fn display_scale_is_applied() {
        // canvas shown at half its backing size
        let sample = PointerSample {
            position: Vec2::new(10.0, 5.0),
            display_size: Vec2::new(288.5, 288.5),
            canvas_size: Vec2::new(577.0, 577.0),
        };

        assert_eq!(
            pointer_to_cell(&sample, CellSize::new(8), GridSize::new(64, 64)),
            Some(CellCoord::new(1, 2)),
        );
    }
}

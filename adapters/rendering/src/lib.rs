#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Canvas renderer and pattern overlay for Life Canvas adapters.
//!
//! Drawing happens against the [`Surface`] trait so the same routines feed an
//! interactive window and the retained [`DisplayList`] used by tests and the
//! headless runner. Every routine takes the palette explicitly; nothing here
//! reads ambient theme state or calls into the engine.

mod display_list;

use glam::Vec2;
use life_canvas_core::{CellCoord, CellSize, CellStates, GridSize, Pattern, Theme};
use std::{error::Error, fmt};

pub use display_list::{DisplayList, DrawOp};

/// Opacity applied to the pattern placement preview.
pub const PREVIEW_ALPHA: f32 = 0.4;

/// Stroke width of grid lines in pixels.
pub const GRID_LINE_WIDTH: f32 = 0.5;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Colors used to draw the canvas for one theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Grid line color.
    pub grid: Color,
    /// Fill of dead cells and the canvas background.
    pub dead: Color,
    /// Fill of living cells and of the placement preview.
    pub alive: Color,
}

impl Palette {
    /// Palette for the light theme.
    pub const LIGHT: Self = Self {
        grid: Color::from_rgb_u8(0xE5, 0xE7, 0xEB),
        dead: Color::from_rgb_u8(0xFF, 0xFF, 0xFF),
        alive: Color::from_rgb_u8(0x66, 0x7E, 0xEA),
    };

    /// Palette for the dark theme.
    pub const DARK: Self = Self {
        grid: Color::from_rgb_u8(0x37, 0x41, 0x51),
        dead: Color::from_rgb_u8(0x1F, 0x29, 0x37),
        alive: Color::from_rgb_u8(0x8B, 0x5C, 0xF6),
    };

    /// Selects the palette of a theme.
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::LIGHT,
            Theme::Dark => Self::DARK,
        }
    }
}

/// Pixel target the renderer draws into.
pub trait Surface {
    /// Sets the backing pixel dimensions of the canvas.
    fn resize(&mut self, width: u32, height: u32);

    /// Fills the whole canvas, discarding everything drawn before.
    fn clear(&mut self, color: Color);

    /// Strokes a straight line.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);

    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);
}

/// Pixel geometry of a grid drawn at a given cell size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasLayout {
    grid: GridSize,
    cell_size: CellSize,
}

impl CanvasLayout {
    /// Creates a layout, rejecting grids without cells.
    pub fn new(grid: GridSize, cell_size: CellSize) -> Result<Self, RenderingError> {
        if grid.is_empty() {
            return Err(RenderingError::EmptyGrid { grid });
        }
        Ok(Self { grid, cell_size })
    }

    /// Logical grid dimensions.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Cell edge length in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    /// Canvas dimensions in pixels.
    #[must_use]
    pub const fn extent(&self) -> (u32, u32) {
        self.cell_size.canvas_extent(self.grid)
    }

    fn pitch(&self) -> f32 {
        self.cell_size.pitch() as f32
    }

    /// Top-left pixel of a cell's fill, inside its one pixel border.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.pitch() + 1.0,
            cell.row() as f32 * self.pitch() + 1.0,
        )
    }

    fn cell_extent(&self) -> Vec2 {
        Vec2::splat(self.cell_size.get() as f32)
    }
}

/// Strokes the grid lines bounding every cell.
pub fn draw_grid(surface: &mut dyn Surface, layout: &CanvasLayout, palette: &Palette) {
    let (width, height) = layout.extent();
    let pitch = layout.pitch();

    for column in 0..=layout.grid.width() {
        let x = column as f32 * pitch + 1.0;
        surface.stroke_line(
            Vec2::new(x, 0.0),
            Vec2::new(x, height as f32),
            GRID_LINE_WIDTH,
            palette.grid,
        );
    }
    for row in 0..=layout.grid.height() {
        let y = row as f32 * pitch + 1.0;
        surface.stroke_line(
            Vec2::new(0.0, y),
            Vec2::new(width as f32, y),
            GRID_LINE_WIDTH,
            palette.grid,
        );
    }
}

/// Fills every cell with its state color.
///
/// Cells beyond the view's own dimensions are not drawn.
pub fn draw_cells(
    surface: &mut dyn Surface,
    layout: &CanvasLayout,
    cells: &CellStates<'_>,
    palette: &Palette,
) {
    let size = layout.cell_extent();
    for (cell, state) in cells.iter() {
        if !layout.grid.contains(cell) {
            continue;
        }
        let color = if state.is_alive() {
            palette.alive
        } else {
            palette.dead
        };
        surface.fill_rect(layout.cell_origin(cell), size, color);
    }
}

/// Draws the living cells of `pattern` translucently with its top-left at `anchor`.
///
/// Pattern cells outside the grid are clipped.
pub fn draw_pattern_preview(
    surface: &mut dyn Surface,
    layout: &CanvasLayout,
    pattern: &Pattern,
    anchor: CellCoord,
    palette: &Palette,
) {
    let size = layout.cell_extent();
    let color = palette.alive.with_alpha(PREVIEW_ALPHA);
    for (row, column, state) in pattern.entries() {
        if !state.is_alive() {
            continue;
        }
        let Some(cell) = anchor.checked_offset(row, column) else {
            continue;
        };
        if layout.grid.contains(cell) {
            surface.fill_rect(layout.cell_origin(cell), size, color);
        }
    }
}

/// Pattern preview requested on top of a frame.
#[derive(Clone, Copy, Debug)]
pub struct Overlay<'a> {
    /// Pattern selected for placement.
    pub pattern: &'a Pattern,
    /// Cell under the pointer.
    pub anchor: CellCoord,
}

/// Draws a complete frame: background, grid, cells and the optional overlay.
///
/// The overlay is always drawn last so the base pass never hides it.
pub fn render_frame(
    surface: &mut dyn Surface,
    layout: &CanvasLayout,
    cells: &CellStates<'_>,
    overlay: Option<Overlay<'_>>,
    palette: &Palette,
) {
    let (width, height) = layout.extent();
    surface.resize(width, height);
    surface.clear(palette.dead);
    draw_grid(surface, layout, palette);
    draw_cells(surface, layout, cells, palette);
    if let Some(overlay) = overlay {
        draw_pattern_preview(surface, layout, overlay.pattern, overlay.anchor, palette);
    }
}

/// Errors that can occur while preparing a canvas layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderingError {
    /// The grid has no cells to draw.
    EmptyGrid {
        /// Dimensions that failed validation.
        grid: GridSize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { grid } => {
                write!(f, "cannot lay out a canvas for an empty {grid} grid")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_rejects_empty_grid_without_panicking() {
        let error = CanvasLayout::new(GridSize::new(0, 5), CellSize::new(8))
            .expect_err("empty grid must be rejected");

        assert!(matches!(error, RenderingError::EmptyGrid { .. }));
    }

    #[test]
    fn cell_origin_skips_one_pixel_border() {
        let layout = CanvasLayout::new(GridSize::new(4, 4), CellSize::new(8)).expect("valid grid");

        assert_eq!(layout.cell_origin(CellCoord::new(0, 0)), Vec2::new(1.0, 1.0));
        assert_eq!(layout.cell_origin(CellCoord::new(2, 3)), Vec2::new(28.0, 19.0));
        assert_eq!(layout.extent(), (37, 37));
    }

    #[test]
    fn palettes_match_theme() {
        assert_eq!(Palette::for_theme(Theme::Light), Palette::LIGHT);
        assert_eq!(Palette::for_theme(Theme::Dark), Palette::DARK);
        assert_eq!(Palette::LIGHT.dead, Color::new(1.0, 1.0, 1.0, 1.0));
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system deriving the cell pixel size from the space around the canvas.

use life_canvas_core::{CellSize, GridSize};
use serde::{Deserialize, Serialize};

/// Space inside the container that is never available to the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeReserve {
    /// Padding subtracted from both container dimensions.
    pub padding_px: u32,
    /// Height taken by the controls and statistics rows.
    pub controls_height_px: u32,
}

impl Default for ChromeReserve {
    fn default() -> Self {
        Self {
            padding_px: 32,
            controls_height_px: 120,
        }
    }
}

/// Outer dimensions of the element hosting the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerBox {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ContainerBox {
    /// Creates a new container descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Computes the largest cell size whose canvas fits inside the available space.
///
/// Each axis allows `floor((available - 1) / cells) - 1` pixels per cell, the
/// smaller axis wins and the result never drops below `minimum`.
#[must_use]
pub fn cell_size_for(
    container: ContainerBox,
    reserve: ChromeReserve,
    grid: GridSize,
    minimum: CellSize,
) -> CellSize {
    let available_width = i64::from(container.width) - i64::from(reserve.padding_px);
    let available_height = i64::from(container.height)
        - i64::from(reserve.padding_px)
        - i64::from(reserve.controls_height_px);

    let fit = |available: i64, cells: u32| -> Option<i64> {
        if cells == 0 {
            return None;
        }
        Some((available - 1).div_euclid(i64::from(cells)) - 1)
    };

    let candidate = match (
        fit(available_width, grid.width()),
        fit(available_height, grid.height()),
    ) {
        (Some(width), Some(height)) => width.min(height),
        (Some(size), None) | (None, Some(size)) => size,
        (None, None) => i64::from(minimum.get()),
    };

    let pixels = candidate.max(i64::from(minimum.get()));
    CellSize::new(u32::try_from(pixels).unwrap_or(u32::MAX))
}

/// Stateful sizing system that reports cell size changes.
#[derive(Debug, Clone)]
pub struct Sizing {
    reserve: ChromeReserve,
    minimum: CellSize,
    current: CellSize,
}

impl Default for Sizing {
    fn default() -> Self {
        Self::new(ChromeReserve::default(), CellSize::MIN)
    }
}

impl Sizing {
    /// Creates a sizing system starting at [`CellSize::INITIAL`].
    #[must_use]
    pub const fn new(reserve: ChromeReserve, minimum: CellSize) -> Self {
        Self {
            reserve,
            minimum,
            current: CellSize::INITIAL,
        }
    }

    /// Cell size produced by the most recent layout pass.
    #[must_use]
    pub const fn current(&self) -> CellSize {
        self.current
    }

    /// Chrome reserved around the canvas.
    #[must_use]
    pub const fn reserve(&self) -> ChromeReserve {
        self.reserve
    }

    /// Recomputes the cell size, returning it only when it changed.
    pub fn resize(&mut self, container: ContainerBox, grid: GridSize) -> Option<CellSize> {
        let next = cell_size_for(container, self.reserve, grid, self.minimum);
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrower_axis_constrains_cell_size() {
        let size = cell_size_for(
            ContainerBox::new(1_000, 600),
            ChromeReserve::default(),
            GridSize::new(64, 64),
            CellSize::MIN,
        );

        // width: floor((968 - 1) / 64) - 1 = 14, height: floor((448 - 1) / 64) - 1 = 5
        assert_eq!(size, CellSize::new(5));
    }

    #[test]
    fn tiny_containers_clamp_to_minimum() {
        let size = cell_size_for(
            ContainerBox::new(10, 10),
            ChromeReserve::default(),
            GridSize::new(64, 64),
            CellSize::MIN,
        );

        assert_eq!(size, CellSize::MIN);
    }
}

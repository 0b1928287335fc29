//! Read-only interpretation of the engine's linear cell buffer.

use crate::{CellCoord, CellState, Engine, GridSize};

/// Borrowed view of a universe's `width * height` state bytes.
///
/// The view borrows the engine immutably, so it cannot survive a call to
/// `set_cell` or `tick`. Re-read it after every mutation.
#[derive(Clone, Copy, Debug)]
pub struct CellStates<'a> {
    bytes: &'a [u8],
    grid: GridSize,
}

impl<'a> CellStates<'a> {
    /// Views the engine memory at the universe's cell offset.
    ///
    /// Returns `None` while the engine memory is unavailable or when the
    /// advertised region does not fit inside it.
    #[must_use]
    pub fn read<E: Engine>(engine: &'a E, handle: E::Handle) -> Option<Self> {
        let memory = engine.memory()?;
        let grid = engine.grid(handle);
        let start = engine.cells_offset(handle);
        let end = start.checked_add(grid.cell_count())?;
        let bytes = memory.get(start..end)?;
        Some(Self { bytes, grid })
    }

    /// Wraps an already extracted byte slice. Returns `None` on a length mismatch.
    #[must_use]
    pub fn from_bytes(bytes: &'a [u8], grid: GridSize) -> Option<Self> {
        if bytes.len() == grid.cell_count() {
            Some(Self { bytes, grid })
        } else {
            None
        }
    }

    /// Dimensions of the viewed universe.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// State of a cell; cells outside the grid read as dead.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> CellState {
        self.grid
            .index(cell)
            .map_or(CellState::Dead, |index| CellState::from_byte(self.bytes[index]))
    }

    /// Number of living cells.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.bytes
            .iter()
            .filter(|byte| CellState::from_byte(**byte).is_alive())
            .count()
    }

    /// Raw state bytes in row-major order.
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Iterates every cell with its state in row-major order.
    #[must_use]
    pub fn iter(&self) -> CellStatesIter<'a> {
        CellStatesIter {
            bytes: self.bytes,
            grid: self.grid,
            index: 0,
        }
    }
}

impl<'a> IntoIterator for CellStates<'a> {
    type Item = (CellCoord, CellState);
    type IntoIter = CellStatesIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Row-major iterator over a [`CellStates`] view.
#[derive(Clone, Debug)]
pub struct CellStatesIter<'a> {
    bytes: &'a [u8],
    grid: GridSize,
    index: usize,
}

impl Iterator for CellStatesIter<'_> {
    type Item = (CellCoord, CellState);

    fn next(&mut self) -> Option<Self::Item> {
        let byte = *self.bytes.get(self.index)?;
        let cell = self.grid.coord(self.index)?;
        self.index += 1;
        Some((cell, CellState::from_byte(byte)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_rejects_length_mismatch() {
        let bytes = [0u8; 5];

        assert!(CellStates::from_bytes(&bytes, GridSize::new(2, 2)).is_none());
        assert!(CellStates::from_bytes(&bytes[..4], GridSize::new(2, 2)).is_some());
    }

    #[test]
    fn view_reads_row_major_states() {
        let bytes = [0u8, 1, 0, 0, 0, 1];
        let view = CellStates::from_bytes(&bytes, GridSize::new(3, 2)).expect("matching length");

        assert_eq!(view.get(CellCoord::new(0, 1)), CellState::Alive);
        assert_eq!(view.get(CellCoord::new(1, 2)), CellState::Alive);
        assert_eq!(view.get(CellCoord::new(1, 0)), CellState::Dead);
        assert_eq!(view.get(CellCoord::new(2, 0)), CellState::Dead);
        assert_eq!(view.alive_count(), 2);

        let alive: Vec<CellCoord> = view
            .iter()
            .filter(|(_, state)| state.is_alive())
            .map(|(cell, _)| cell)
            .collect();
        assert_eq!(alive, vec![CellCoord::new(0, 1), CellCoord::new(1, 2)]);
    }
}

//! Conway's B3/S23 transition on a toroidal grid.

use life_canvas_core::{CellCoord, CellState, GridSize};

/// Initial state of the classic layout: every second cell and every seventh cell alive.
pub(crate) fn classic_seed(index: usize) -> CellState {
    if index % 2 == 0 || index % 7 == 0 {
        CellState::Alive
    } else {
        CellState::Dead
    }
}

/// Writes the generation following `cells` into `out`, resizing it to match.
pub(crate) fn next_generation(cells: &[u8], grid: GridSize, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(cells.len());

    for cell in grid.cells() {
        let Some(index) = grid.index(cell) else {
            continue;
        };
        let current = CellState::from_byte(cells[index]);
        let neighbours = live_neighbour_count(cells, grid, cell);
        let next = match (current, neighbours) {
            (CellState::Alive, 2) | (CellState::Alive, 3) => CellState::Alive,
            (CellState::Alive, _) => CellState::Dead,
            (CellState::Dead, 3) => CellState::Alive,
            (state, _) => state,
        };
        out.push(next.to_byte());
    }
}

fn live_neighbour_count(cells: &[u8], grid: GridSize, cell: CellCoord) -> u8 {
    let width = grid.width();
    let height = grid.height();
    let mut count = 0;

    for row_delta in [height - 1, 0, 1] {
        for column_delta in [width - 1, 0, 1] {
            if row_delta == 0 && column_delta == 0 {
                continue;
            }

            let row = (cell.row() + row_delta) % height;
            let column = (cell.column() + column_delta) % width;
            if let Some(index) = grid.index(CellCoord::new(row, column)) {
                if CellState::from_byte(cells[index]).is_alive() {
                    count += 1;
                }
            }
        }
    }

    count
}

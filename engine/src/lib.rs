#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reference simulation engine for Life Canvas.
//!
//! The engine mirrors the shape of a WebAssembly module: every universe lives
//! inside one contiguous linear memory and is addressed by an opaque handle.
//! Adapters never see the universe structure; they read cell bytes at the
//! offset the engine reports and request mutations through
//! [`life_canvas_core::Engine`].

mod memory;
mod rule;

use std::collections::BTreeMap;

use life_canvas_core::{CellCoord, CellState, Engine, EngineError, GridSize};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use self::memory::{LinearMemory, Region};

const DEFAULT_WIDTH: u32 = 64;
const DEFAULT_HEIGHT: u32 = 64;

/// Parameters applied to every universe the engine creates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of columns in new universes.
    pub width: u32,
    /// Number of rows in new universes.
    pub height: u32,
    /// Seed for a random initial soup. `None` selects the classic layout.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: None,
        }
    }
}

/// Opaque identifier of a universe allocated by [`LifeEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniverseHandle(u32);

#[derive(Clone, Copy, Debug)]
struct UniverseSlot {
    grid: GridSize,
    region: Region,
}

/// Conway's Game of Life on a torus, backed by a linear byte memory.
#[derive(Debug)]
pub struct LifeEngine {
    config: EngineConfig,
    memory: LinearMemory,
    universes: BTreeMap<UniverseHandle, UniverseSlot>,
    next_handle: u32,
    rng: Option<ChaCha8Rng>,
    scratch: Vec<u8>,
}

impl LifeEngine {
    /// Initialises the engine.
    ///
    /// Fails when the configured dimensions describe an empty grid.
    pub fn load(config: EngineConfig) -> Result<Self, EngineError> {
        let grid = GridSize::new(config.width, config.height);
        if grid.is_empty() {
            return Err(EngineError::Unavailable {
                reason: format!("universe dimensions {grid} contain no cells"),
            });
        }

        Ok(Self {
            config,
            memory: LinearMemory::new(),
            universes: BTreeMap::new(),
            next_handle: 0,
            rng: config.seed.map(ChaCha8Rng::seed_from_u64),
            scratch: Vec::new(),
        })
    }

    /// Number of universes currently allocated.
    #[must_use]
    pub fn universe_count(&self) -> usize {
        self.universes.len()
    }

    fn slot(&self, handle: UniverseHandle) -> Option<&UniverseSlot> {
        self.universes.get(&handle)
    }

    fn seed_cells(&mut self, region: Region) {
        let mut rng = self.rng.as_mut();
        let cells = self.memory.slice_mut(region);
        for (index, byte) in cells.iter_mut().enumerate() {
            let state = match rng.as_deref_mut() {
                Some(rng) => {
                    if rng.gen_bool(0.5) {
                        CellState::Alive
                    } else {
                        CellState::Dead
                    }
                }
                None => rule::classic_seed(index),
            };
            *byte = state.to_byte();
        }
    }
}

impl Engine for LifeEngine {
    type Handle = UniverseHandle;

    fn create(&mut self) -> Result<Self::Handle, EngineError> {
        let grid = GridSize::new(self.config.width, self.config.height);
        let region = self
            .memory
            .allocate(grid.cell_count())
            .ok_or(EngineError::Allocation { grid })?;
        self.seed_cells(region);

        let handle = UniverseHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        let _ = self.universes.insert(handle, UniverseSlot { grid, region });
        Ok(handle)
    }

    fn release(&mut self, handle: Self::Handle) {
        if let Some(slot) = self.universes.remove(&handle) {
            self.memory.release(slot.region);
        }
    }

    fn width(&self, handle: Self::Handle) -> u32 {
        self.slot(handle).map_or(0, |slot| slot.grid.width())
    }

    fn height(&self, handle: Self::Handle) -> u32 {
        self.slot(handle).map_or(0, |slot| slot.grid.height())
    }

    fn cells_offset(&self, handle: Self::Handle) -> usize {
        self.slot(handle).map_or(0, |slot| slot.region.offset())
    }

    fn memory(&self) -> Option<&[u8]> {
        Some(self.memory.bytes())
    }

    fn set_cell(&mut self, handle: Self::Handle, cell: CellCoord, state: CellState) {
        let Some(slot) = self.slot(handle).copied() else {
            return;
        };
        let Some(index) = slot.grid.index(cell) else {
            debug_assert!(false, "set_cell called outside the {} universe", slot.grid);
            return;
        };
        self.memory.slice_mut(slot.region)[index] = state.to_byte();
    }

    fn tick(&mut self, handle: Self::Handle) {
        let Some(slot) = self.slot(handle).copied() else {
            return;
        };
        rule::next_generation(self.memory.slice(slot.region), slot.grid, &mut self.scratch);
        self.memory.slice_mut(slot.region).copy_from_slice(&self.scratch);
    }
}

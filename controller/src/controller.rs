//! Render and interaction controller.

use std::{sync::Arc, time::Duration};

use life_canvas_catalog::Catalog;
use life_canvas_core::{
    CellCoord, CellState, CellStates, Command, Engine, EngineError, FrameHost, FrameRequestId,
    GridSize, IntervalBounds, InteractionMode, Pattern, StepInterval, Theme,
};
use life_canvas_rendering::{render_frame, CanvasLayout, DisplayList, Overlay, Palette};
use life_canvas_system_interaction::{stamp, Interaction, PointerInput};
use life_canvas_system_scheduler::{FrameOutcome, RunState, Scheduler};
use life_canvas_system_sizing::{ChromeReserve, ContainerBox, Sizing};

use crate::{
    config::{Config, ConfigError},
    session::{Session, SessionSnapshot},
};

struct Live<E: Engine> {
    engine: E,
    universe: E::Handle,
}

/// Owns the engine universe, the session state and the retained canvas.
///
/// The controller is single threaded. Every operation runs to completion,
/// and within a scheduler step the engine tick always precedes the buffer
/// read, which always precedes the render.
pub struct Controller<E: Engine> {
    live: Option<Live<E>>,
    failure: Option<String>,
    catalog: Catalog,
    session: Session,
    scheduler: Scheduler,
    sizing: Sizing,
    interaction: Interaction,
    bounds: IntervalBounds,
    container: Option<ContainerBox>,
    surface: DisplayList,
    commands: Vec<Command>,
}

impl<E: Engine> Controller<E> {
    /// Creates a controller, making a single attempt to load the engine.
    ///
    /// A failing loader leaves the controller in the not-ready state for its
    /// whole lifetime; every operation then becomes a no-op.
    pub fn new<F>(config: &Config, catalog: Catalog, load: F) -> Result<Self, ConfigError>
    where
        F: FnOnce() -> Result<E, EngineError>,
    {
        let bounds = config.interval_bounds()?;
        let interval = bounds.clamp(config.timing.interval_ms);
        let (live, failure) = match load().and_then(|mut engine| {
            let universe = engine.create()?;
            Ok(Live { engine, universe })
        }) {
            Ok(live) => {
                tracing::info!(grid = %live.engine.grid(live.universe), "engine ready");
                (Some(live), None)
            }
            Err(error) => {
                tracing::error!(%error, "engine failed to initialise");
                (None, Some(error.to_string()))
            }
        };

        Ok(Self {
            live,
            failure,
            catalog,
            session: Session::new(interval, config.appearance.theme),
            scheduler: Scheduler::new(
                interval,
                RunState::from_running(config.appearance.start_running),
            ),
            sizing: Sizing::new(config.chrome_reserve(), config.min_cell_size()),
            interaction: Interaction::new(),
            bounds,
            container: None,
            surface: DisplayList::new(),
            commands: Vec::new(),
        })
    }

    /// Whether the engine loaded and a universe exists.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.live.is_some()
    }

    /// Reason the engine is unavailable, if it failed to load.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Session values shown around the canvas.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Patterns available for placement.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Range of the speed slider.
    #[must_use]
    pub const fn interval_bounds(&self) -> IntervalBounds {
        self.bounds
    }

    /// Current run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.scheduler.state()
    }

    /// Whether the simulation is running. Never true without a universe.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.live.is_some() && self.scheduler.is_running()
    }

    /// Space around the canvas kept free for controls.
    #[must_use]
    pub const fn chrome_reserve(&self) -> ChromeReserve {
        self.sizing.reserve()
    }

    /// Canvas drawn by the most recent render.
    #[must_use]
    pub const fn surface(&self) -> &DisplayList {
        &self.surface
    }

    /// Dimensions of the current universe.
    #[must_use]
    pub fn grid(&self) -> Option<GridSize> {
        self.live
            .as_ref()
            .map(|live| live.engine.grid(live.universe))
    }

    /// Pixel geometry of the canvas.
    #[must_use]
    pub fn layout(&self) -> Option<CanvasLayout> {
        CanvasLayout::new(self.grid()?, self.session.cell_size).ok()
    }

    /// Fresh view of the universe's cells.
    ///
    /// The view borrows the controller, so it cannot outlive the next mutation.
    #[must_use]
    pub fn cell_states(&self) -> Option<CellStates<'_>> {
        let live = self.live.as_ref()?;
        CellStates::read(&live.engine, live.universe)
    }

    /// Serializable summary of the session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.session, self.is_running(), self.grid())
    }

    /// Attaches the controller to a host: lays out the canvas, renders and
    /// arms the scheduler when running.
    pub fn mount(&mut self, host: &mut dyn FrameHost, container: ContainerBox) {
        self.container = Some(container);
        let _ = self.relayout();
        self.render();
        if self.is_ready() {
            self.scheduler.arm(host);
        }
        tracing::debug!(?container, "controller mounted");
    }

    /// Detaches from the host, cancelling any outstanding frame request.
    pub fn unmount(&mut self, host: &mut dyn FrameHost) {
        self.scheduler.disarm(host);
        self.container = None;
        tracing::debug!("controller unmounted");
    }

    /// Delivers a host frame callback.
    ///
    /// On an accepted step the universe advances exactly one generation and
    /// the canvas is redrawn from a fresh buffer read. Once the universe is
    /// gone the scheduler is paused and no further frames are requested.
    pub fn on_frame(
        &mut self,
        host: &mut dyn FrameHost,
        request: FrameRequestId,
        now: Duration,
    ) -> FrameOutcome {
        if self.live.is_none() {
            if self.scheduler.pause(host) {
                tracing::warn!("no universe to step, scheduler paused");
            }
            return FrameOutcome::Stale;
        }

        let outcome = self.scheduler.on_frame(host, request, now);
        if outcome != FrameOutcome::Step {
            return outcome;
        }
        let Some(live) = self.live.as_mut() else {
            return FrameOutcome::Idle;
        };

        live.engine.tick(live.universe);
        self.session.generation += 1;
        self.render();
        tracing::debug!(
            generation = self.session.generation,
            alive = self.session.alive_count,
            "step"
        );
        outcome
    }

    /// Flips between running and paused without touching the universe.
    pub fn toggle_running(&mut self, host: &mut dyn FrameHost) -> RunState {
        if self.is_ready() {
            let state = self.scheduler.toggle(host);
            tracing::info!(?state, generation = self.session.generation, "run state changed");
        }
        self.scheduler.state()
    }

    /// Starts the simulation.
    pub fn start(&mut self, host: &mut dyn FrameHost) {
        if self.is_ready() && self.scheduler.start(host) {
            tracing::info!(generation = self.session.generation, "started");
        }
    }

    /// Pauses the simulation.
    pub fn pause(&mut self, host: &mut dyn FrameHost) {
        if self.scheduler.pause(host) {
            tracing::info!(generation = self.session.generation, "paused");
        }
    }

    /// Replaces the universe with a freshly created one and resets the generation.
    ///
    /// The old universe is released only after the new one exists. A failing
    /// allocation leaves the controller not ready.
    pub fn restart(&mut self) {
        let Some(live) = self.live.as_mut() else {
            return;
        };

        match live.engine.create() {
            Ok(universe) => {
                let previous = std::mem::replace(&mut live.universe, universe);
                live.engine.release(previous);
                tracing::info!(grid = %live.engine.grid(universe), "universe restarted");
            }
            Err(error) => {
                tracing::error!(%error, "restart failed to allocate a universe");
                if let Some(live) = self.live.take() {
                    let Live {
                        mut engine,
                        universe,
                    } = live;
                    engine.release(universe);
                }
                self.failure = Some(error.to_string());
                return;
            }
        }

        self.session.generation = 0;
        let _ = self.relayout();
        self.render();
    }

    /// Sets every cell of the current universe dead and resets the generation.
    pub fn clear(&mut self) {
        let Some(live) = self.live.as_mut() else {
            return;
        };

        let grid = live.engine.grid(live.universe);
        for cell in grid.cells() {
            live.engine.set_cell(live.universe, cell, CellState::Dead);
        }
        self.session.generation = 0;
        self.render();
        tracing::info!(%grid, "universe cleared");
    }

    /// Enters placement mode for the named pattern.
    ///
    /// Selecting the pattern that is already selected returns to toggle mode.
    /// Returns `false` when the catalog has no such pattern.
    pub fn select_pattern(&mut self, name: &str) -> bool {
        let Some(pattern) = self.catalog.find(name).cloned() else {
            tracing::warn!(name, "unknown pattern");
            return false;
        };

        let reselected = self
            .session
            .mode
            .selected_pattern()
            .is_some_and(|selected| selected.name() == pattern.name());
        if reselected {
            self.deselect_pattern();
        } else {
            tracing::info!(pattern = pattern.name(), "pattern selected");
            self.session.mode = InteractionMode::placing(pattern);
            self.render();
        }
        true
    }

    /// Returns to toggle mode, dropping the selection and its preview.
    pub fn deselect_pattern(&mut self) {
        if self.session.mode.is_placement() {
            self.session.mode = InteractionMode::Toggle;
            self.render();
        }
    }

    /// Stamps a pattern with its top-left cell at `anchor`, clipping at the edges.
    pub fn place(&mut self, pattern: &Arc<Pattern>, anchor: CellCoord) {
        let Some(grid) = self.grid() else {
            return;
        };
        let mut commands = std::mem::take(&mut self.commands);
        stamp(pattern, anchor, grid, &mut commands);
        commands.push(Command::Render);
        tracing::info!(pattern = pattern.name(), ?anchor, "pattern placed");
        self.apply(&mut commands);
        self.commands = commands;
    }

    /// Routes a pointer event through the interaction system.
    pub fn pointer(&mut self, input: PointerInput) {
        let mut commands = std::mem::take(&mut self.commands);
        {
            let cells = self
                .live
                .as_ref()
                .and_then(|live| CellStates::read(&live.engine, live.universe));
            self.interaction.handle(
                &self.session.mode,
                input,
                self.session.cell_size,
                cells.as_ref(),
                &mut commands,
            );
        }
        if commands
            .iter()
            .any(|command| matches!(command, Command::ExitPlacement))
        {
            if let Some(pattern) = self.session.mode.selected_pattern() {
                tracing::info!(pattern = pattern.name(), "pattern placed");
            }
        }
        self.apply(&mut commands);
        self.commands = commands;
    }

    /// Switches between the light and dark theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.session.theme.toggled());
        self.session.theme
    }

    /// Applies a theme and redraws.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.session.theme != theme {
            self.session.theme = theme;
            self.render();
        }
    }

    /// Sets the step interval, clamped to the configured range.
    ///
    /// The generation and the time of the last step are kept.
    pub fn set_interval(&mut self, millis: u32) -> StepInterval {
        self.apply_interval(self.bounds.clamp(millis))
    }

    /// Sets the step interval from a continuous slider position.
    pub fn set_interval_from_slider(&mut self, millis: f32) -> StepInterval {
        self.apply_interval(self.bounds.snap(millis))
    }

    fn apply_interval(&mut self, interval: StepInterval) -> StepInterval {
        if interval != self.session.interval {
            self.session.interval = interval;
            self.scheduler.set_interval(interval);
            tracing::debug!(interval_ms = interval.millis(), "interval changed");
        }
        interval
    }

    /// Recomputes the cell size for a resized container and redraws on change.
    pub fn resize_container(&mut self, container: ContainerBox) {
        self.container = Some(container);
        if self.relayout() {
            self.render();
        }
    }

    fn relayout(&mut self) -> bool {
        let (Some(container), Some(grid)) = (self.container, self.grid()) else {
            return false;
        };
        match self.sizing.resize(container, grid) {
            Some(cell_size) => {
                self.session.cell_size = cell_size;
                tracing::debug!(cell_size = cell_size.get(), "cell size changed");
                true
            }
            None => false,
        }
    }

    /// Draws grid, cells and the placement preview from a fresh buffer read.
    ///
    /// Does nothing while the engine or its memory is unavailable.
    pub fn render(&mut self) {
        let Some(live) = self.live.as_ref() else {
            return;
        };
        let Some(cells) = CellStates::read(&live.engine, live.universe) else {
            return;
        };
        let Ok(layout) = CanvasLayout::new(cells.grid(), self.session.cell_size) else {
            return;
        };

        let overlay = match &self.session.mode {
            InteractionMode::Placement {
                pattern,
                preview: Some(anchor),
            } => Some(Overlay {
                pattern,
                anchor: *anchor,
            }),
            _ => None,
        };
        render_frame(
            &mut self.surface,
            &layout,
            &cells,
            overlay,
            &Palette::for_theme(self.session.theme),
        );
        self.session.alive_count = cells.alive_count();
    }

    fn apply(&mut self, commands: &mut Vec<Command>) {
        let mut needs_render = false;
        for command in commands.drain(..) {
            match command {
                Command::SetCell { cell, state } => {
                    if let Some(live) = self.live.as_mut() {
                        live.engine.set_cell(live.universe, cell, state);
                    }
                }
                Command::SetPreview { cell } => {
                    if let InteractionMode::Placement { preview, .. } = &mut self.session.mode {
                        *preview = cell;
                    }
                }
                Command::ExitPlacement => self.session.mode = InteractionMode::Toggle,
                Command::Render => needs_render = true,
            }
        }
        if needs_render {
            self.render();
        }
    }
}

impl<E: Engine> Drop for Controller<E> {
    fn drop(&mut self) {
        if let Some(live) = self.live.as_mut() {
            live.engine.release(live.universe);
        }
    }
}

impl<E: Engine> std::fmt::Debug for Controller<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("ready", &self.is_ready())
            .field("failure", &self.failure)
            .field("session", &self.session)
            .field("run_state", &self.scheduler.state())
            .finish_non_exhaustive()
    }
}

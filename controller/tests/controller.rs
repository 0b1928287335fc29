use std::time::Duration;

use glam::Vec2;
use life_canvas_catalog::Catalog;
use life_canvas_controller::{Config, Controller};
use life_canvas_core::{
    CellCoord, CellState, Engine, EngineError, GridSize, InteractionMode, Theme,
};
use life_canvas_engine::{EngineConfig, LifeEngine, UniverseHandle};
use life_canvas_system_interaction::{PointerInput, PointerSample};
use life_canvas_system_scheduler::{FrameOutcome, FrameQueue, RunState};
use life_canvas_system_sizing::ContainerBox;

const CONTAINER: ContainerBox = ContainerBox::new(1_200, 900);

fn paused_config() -> Config {
    let mut config = Config::default();
    config.appearance.start_running = false;
    config
}

fn controller_with(config: &Config) -> Controller<LifeEngine> {
    let engine_config = config.engine;
    Controller::new(
        config,
        Catalog::builtin().expect("built-in catalog is valid"),
        move || LifeEngine::load(engine_config),
    )
    .expect("configuration is valid")
}

fn deliver(
    controller: &mut Controller<LifeEngine>,
    host: &mut FrameQueue,
    now: Duration,
) -> Vec<FrameOutcome> {
    host.take_pending()
        .into_iter()
        .map(|request| controller.on_frame(&mut *host, request, now))
        .collect()
}

fn sample_at(controller: &Controller<LifeEngine>, cell: CellCoord) -> PointerSample {
    let layout = controller.layout().expect("controller is ready");
    let (width, height) = layout.extent();
    let origin = layout.cell_origin(cell);
    PointerSample::unscaled(
        origin + Vec2::splat(1.0),
        Vec2::new(width as f32, height as f32),
    )
}

fn alive_cells(controller: &Controller<LifeEngine>) -> Vec<CellCoord> {
    controller
        .cell_states()
        .expect("engine memory is available")
        .iter()
        .filter(|(_, state)| state.is_alive())
        .map(|(cell, _)| cell)
        .collect()
}

#[test]
fn mounting_sizes_the_canvas_to_the_container() {
    let mut host = FrameQueue::new();
    let mut controller = controller_with(&paused_config());

    controller.mount(&mut host, CONTAINER);

    assert_eq!(controller.session().cell_size().get(), 10);
    assert_eq!(controller.surface().size(), (705, 705));
    assert!(host.pending().is_empty(), "paused controllers request no frames");
    assert!(controller.session().alive_count() > 0, "classic layout has living cells");
}

#[test]
fn glider_stamped_at_origin_produces_five_cells() {
    let mut host = FrameQueue::new();
    let mut controller = controller_with(&paused_config());
    controller.mount(&mut host, CONTAINER);
    controller.clear();

    assert!(controller.select_pattern("Glider"));
    let origin = sample_at(&controller, CellCoord::new(0, 0));
    controller.pointer(PointerInput::Move(origin));
    assert_eq!(controller.session().mode().preview(), Some(CellCoord::new(0, 0)));

    controller.pointer(PointerInput::Click(origin));

    assert_eq!(
        alive_cells(&controller),
        vec![
            CellCoord::new(0, 1),
            CellCoord::new(1, 2),
            CellCoord::new(2, 0),
            CellCoord::new(2, 1),
            CellCoord::new(2, 2),
        ],
    );
    assert_eq!(controller.session().alive_count(), 5);
    assert_eq!(
        controller.session().mode(),
        &InteractionMode::Toggle,
        "placement is one-shot",
    );
}

#[test]
fn clear_kills_every_cell_and_resets_generation() {
    let mut host = FrameQueue::new();
    let mut controller = controller_with(&Config::default());
    controller.mount(&mut host, CONTAINER);
    for frame in 0..20 {
        let _ = deliver(&mut controller, &mut host, Duration::from_millis(frame * 100));
    }
    assert!(controller.session().generation() > 0);
    assert!(controller.session().alive_count() > 0);

    controller.clear();

    assert_eq!(controller.session().generation(), 0);
    assert_eq!(controller.session().alive_count(), 0);
    assert_eq!(controller.grid(), Some(GridSize::new(64, 64)));
}

#[test]
fn generation_advances_once_per_accepted_step() {
    let mut host = FrameQueue::new();
    let mut controller = controller_with(&Config::default());
    controller.mount(&mut host, CONTAINER);

    let mut previous = controller.session().generation();
    for frame in 0..50 {
        let outcomes = deliver(&mut controller, &mut host, Duration::from_millis(frame * 16));
        let stepped = outcomes.contains(&FrameOutcome::Step);
        let generation = controller.session().generation();
        if stepped {
            assert_eq!(generation, previous + 1);
        } else {
            assert_eq!(generation, previous);
        }
        previous = generation;
    }
    assert_eq!(previous, 8, "100ms interval over 800ms of 16ms frames");
}

#[test]
fn pausing_stops_ticks_until_resumed() {
    let mut host = FrameQueue::new();
    let mut controller = controller_with(&Config::default());
    controller.mount(&mut host, CONTAINER);
    for frame in 0..5 {
        let _ = deliver(&mut controller, &mut host, Duration::from_millis(frame * 100));
    }
    let paused_at = controller.session().generation();

    assert_eq!(controller.toggle_running(&mut host), RunState::Paused);
    for frame in 5..500 {
        assert!(deliver(&mut controller, &mut host, Duration::from_millis(frame * 100)).is_empty());
    }
    assert_eq!(controller.session().generation(), paused_at);

    assert_eq!(controller.toggle_running(&mut host), RunState::Running);
    assert_eq!(
        controller.session().generation(),
        paused_at,
        "resuming alone does not step",
    );
    assert_eq!(
        deliver(&mut controller, &mut host, Duration::from_millis(60_000)),
        vec![FrameOutcome::Step],
    );
    assert_eq!(controller.session().generation(), paused_at + 1);
}

#[test]
fn unmount_cancels_outstanding_frames() {
    let mut host = FrameQueue::new();
    let mut controller = controller_with(&Config::default());
    controller.mount(&mut host, CONTAINER);
    let in_flight = host.pending().to_vec();

    controller.unmount(&mut host);

    assert!(host.pending().is_empty());
    for request in in_flight {
        assert_eq!(
            controller.on_frame(&mut host, request, Duration::from_secs(10)),
            FrameOutcome::Stale,
        );
    }
    assert_eq!(controller.session().generation(), 0);
}

#[test]
fn restart_allocates_a_fresh_universe() {
    let mut host = FrameQueue::new();
    let mut controller = controller_with(&Config::default());
    controller.mount(&mut host, CONTAINER);
    for frame in 0..10 {
        let _ = deliver(&mut controller, &mut host, Duration::from_millis(frame * 100));
    }
    controller.clear();

    controller.restart();

    assert_eq!(controller.session().generation(), 0);
    let states = controller.cell_states().expect("new universe is readable");
    assert_eq!(states.grid(), GridSize::new(64, 64));
    assert!(
        states.get(CellCoord::new(0, 0)).is_alive(),
        "fresh universe uses the default layout",
    );
    assert_eq!(controller.session().alive_count(), states.alive_count());
}

#[test]
fn speed_theme_and_size_changes_keep_the_generation() {
    let mut host = FrameQueue::new();
    let mut controller = controller_with(&Config::default());
    controller.mount(&mut host, CONTAINER);
    for frame in 0..4 {
        let _ = deliver(&mut controller, &mut host, Duration::from_millis(frame * 100));
    }
    let generation = controller.session().generation();

    assert_eq!(controller.set_interval(5).millis(), 20, "clamped to the minimum");
    assert_eq!(controller.set_interval(5_000).millis(), 1_000, "clamped to the maximum");
    assert_eq!(controller.set_interval_from_slider(333.0).millis(), 330);
    assert_eq!(controller.snapshot().rate, "3.0/s");
    assert_eq!(controller.toggle_theme(), Theme::Dark);
    controller.resize_container(ContainerBox::new(600, 600));

    assert_eq!(controller.session().generation(), generation);
    assert_eq!(controller.session().cell_size().get(), 5);
}

#[test]
fn reselecting_a_pattern_returns_to_toggle_mode() {
    let mut controller = controller_with(&paused_config());

    assert!(controller.select_pattern("Acorn"));
    assert!(controller.session().mode().is_placement());
    assert!(controller.select_pattern("Acorn"));
    assert!(!controller.session().mode().is_placement());
    assert!(!controller.select_pattern("No such pattern"));
}

#[test]
fn pointer_leave_hides_the_preview() {
    let mut host = FrameQueue::new();
    let mut controller = controller_with(&paused_config());
    controller.mount(&mut host, CONTAINER);
    assert!(controller.select_pattern("Blinker"));

    controller.pointer(PointerInput::Move(sample_at(&controller, CellCoord::new(3, 3))));
    let with_preview = controller.surface().ops().len();
    controller.pointer(PointerInput::Leave);

    assert_eq!(controller.session().mode().preview(), None);
    assert!(controller.session().mode().is_placement());
    assert_eq!(
        controller.surface().ops().len(),
        with_preview - 3,
        "the three preview cells are no longer drawn",
    );
}

#[test]
fn failed_engine_leaves_controller_not_ready() {
    let mut host = FrameQueue::new();
    let mut controller: Controller<LifeEngine> = Controller::new(
        &Config::default(),
        Catalog::builtin().expect("built-in catalog is valid"),
        || {
            Err(EngineError::Unavailable {
                reason: "module missing".to_owned(),
            })
        },
    )
    .expect("configuration is valid");

    controller.mount(&mut host, CONTAINER);
    controller.pointer(PointerInput::Leave);
    controller.clear();
    controller.restart();

    assert!(!controller.is_ready());
    assert_eq!(controller.failure(), Some("engine unavailable: module missing"));
    assert!(host.pending().is_empty(), "no frames are requested before the engine is ready");
    assert!(controller.surface().ops().is_empty(), "nothing is rendered");
    assert!(!controller.snapshot().ready);
}

/// Engine whose allocations succeed only a fixed number of times.
#[derive(Debug)]
struct ExhaustibleEngine {
    inner: LifeEngine,
    allocations_left: u32,
}

impl Engine for ExhaustibleEngine {
    type Handle = UniverseHandle;

    fn create(&mut self) -> Result<UniverseHandle, EngineError> {
        if self.allocations_left == 0 {
            return Err(EngineError::Allocation {
                grid: GridSize::new(64, 64),
            });
        }
        self.allocations_left -= 1;
        self.inner.create()
    }

    fn release(&mut self, handle: UniverseHandle) {
        self.inner.release(handle);
    }

    fn width(&self, handle: UniverseHandle) -> u32 {
        self.inner.width(handle)
    }

    fn height(&self, handle: UniverseHandle) -> u32 {
        self.inner.height(handle)
    }

    fn cells_offset(&self, handle: UniverseHandle) -> usize {
        self.inner.cells_offset(handle)
    }

    fn memory(&self) -> Option<&[u8]> {
        self.inner.memory()
    }

    fn set_cell(&mut self, handle: UniverseHandle, cell: CellCoord, state: CellState) {
        self.inner.set_cell(handle, cell, state);
    }

    fn tick(&mut self, handle: UniverseHandle) {
        self.inner.tick(handle);
    }
}

#[test]
fn failed_restart_while_running_stops_requesting_frames() {
    let mut host = FrameQueue::new();
    let mut controller = Controller::new(
        &Config::default(),
        Catalog::builtin().expect("built-in catalog is valid"),
        || {
            Ok(ExhaustibleEngine {
                inner: LifeEngine::load(EngineConfig::default())?,
                allocations_left: 1,
            })
        },
    )
    .expect("configuration is valid");
    controller.mount(&mut host, CONTAINER);
    assert!(controller.is_running());
    assert_eq!(host.pending().len(), 1);

    controller.restart();

    assert!(!controller.is_ready());
    assert!(!controller.is_running(), "a controller without a universe is not running");
    assert!(!controller.snapshot().running);

    let outcomes: Vec<FrameOutcome> = host
        .take_pending()
        .into_iter()
        .map(|request| controller.on_frame(&mut host, request, Duration::ZERO))
        .collect();

    assert_eq!(outcomes, vec![FrameOutcome::Stale]);
    assert_eq!(controller.run_state(), RunState::Paused);
    assert!(host.pending().is_empty(), "no frame is re-requested after the failure");
    assert_eq!(controller.session().generation(), 0);
}

#[test]
fn snapshot_serializes_session_state() {
    let mut controller = controller_with(&paused_config());
    assert!(controller.select_pattern("Glider"));

    let json = serde_json::to_value(controller.snapshot()).expect("snapshot serializes");

    assert_eq!(json["generation"], 0);
    assert_eq!(json["running"], false);
    assert_eq!(json["width"], 64);
    assert_eq!(json["theme"], "light");
    assert_eq!(json["selected_pattern"], "Glider");
    assert_eq!(json["rate"], "10.0/s");
}

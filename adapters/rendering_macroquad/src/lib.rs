#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed window adapter for Life Canvas.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! We therefore depend on macroquad without its default `audio` feature.
//!
//! The adapter owns the window, the frame clock and raw input. It forwards
//! frame callbacks, pointer events and control actions to the
//! [`Controller`] and replays the controller's retained display list onto
//! the screen. All `macroquad::ui` calls live inside the local `ui` module.

mod ui;

use self::ui::{
    draw_control_bar, draw_pattern_picker, draw_rules_panel, ControlBarContext, PickerContext,
    PickerEntry, PickerGroup, UiTheme,
};
use anyhow::Result;
use glam::Vec2;
use life_canvas_controller::{Controller, RenderingBackend};
use life_canvas_core::{Engine, GridSize, Pattern, Theme};
use life_canvas_rendering::{
    Color, DisplayList, DrawOp, Palette, RenderingError, Surface, GRID_LINE_WIDTH,
};
use life_canvas_system_interaction::{PointerInput, PointerSample};
use life_canvas_system_scheduler::FrameQueue;
use life_canvas_system_sizing::{ChromeReserve, ContainerBox};
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

/// Edge length in pixels of the square a pattern thumbnail is fitted into.
const THUMBNAIL_EXTENT_PX: f32 = 60.0;
/// Largest cell size used when drawing a thumbnail.
const THUMBNAIL_MAX_CELL_PX: f32 = 8.0;

/// User-facing action requested through the control bar, a modal panel or
/// the keyboard.
#[doc(hidden)]
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    /// Start or pause the simulation.
    ToggleRunning,
    /// Replace the universe with a freshly seeded one.
    Restart,
    /// Kill every cell.
    Clear,
    /// Open or close the pattern picker.
    TogglePicker,
    /// Open or close the rules panel.
    ToggleRules,
    /// Switch between the light and dark theme.
    ToggleTheme,
    /// Select a catalogue pattern by name and close the picker.
    SelectPattern(String),
    /// Close the open panel, or leave placement mode when none is open.
    Dismiss,
    /// Raw slider value for the step interval in milliseconds.
    SetInterval(f32),
    /// Shorten the step interval by one slider step.
    Faster,
    /// Lengthen the step interval by one slider step.
    Slower,
}

/// Tracks UI-sourced actions so they can be applied at the start of the next frame.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct ControlPanelInputState {
    latched: Vec<ControlAction>,
}

impl ControlPanelInputState {
    /// Returns the latched actions in registration order and clears the latch
    /// so every action fires only once.
    pub fn take_actions(&mut self) -> Vec<ControlAction> {
        std::mem::take(&mut self.latched)
    }

    /// Records an action requested this frame. Repeated requests of the same
    /// action collapse into one; a newer slider value replaces an older one.
    pub fn register(&mut self, action: ControlAction) {
        if let ControlAction::SetInterval(_) = action {
            self.latched
                .retain(|latched| !matches!(latched, ControlAction::SetInterval(_)));
        } else if self.latched.contains(&action) {
            return;
        }
        self.latched.push(action);
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` quits the window loop.
    quit_requested: bool,
    actions: Vec<ControlAction>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let bindings = [
            (KeyCode::Space, ControlAction::ToggleRunning),
            (KeyCode::R, ControlAction::Restart),
            (KeyCode::C, ControlAction::Clear),
            (KeyCode::P, ControlAction::TogglePicker),
            (KeyCode::H, ControlAction::ToggleRules),
            (KeyCode::T, ControlAction::ToggleTheme),
            (KeyCode::Escape, ControlAction::Dismiss),
            (KeyCode::Equal, ControlAction::Faster),
            (KeyCode::KpAdd, ControlAction::Faster),
            (KeyCode::Minus, ControlAction::Slower),
            (KeyCode::KpSubtract, ControlAction::Slower),
        ];
        let actions = bindings
            .into_iter()
            .filter(|(key, _)| is_key_pressed(*key))
            .map(|(_, action)| action)
            .collect();

        Self {
            quit_requested: is_key_pressed(KeyCode::Q),
            actions,
        }
    }
}

/// Modal panels layered above the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Panels {
    picker_open: bool,
    rules_open: bool,
}

impl Panels {
    const fn any_open(&self) -> bool {
        self.picker_open || self.rules_open
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            let Some(removed) = self.frame_times.pop_front() else {
                break;
            };
            self.window_duration = self.window_duration.saturating_sub(removed);
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
        })
    }
}

/// Screen placement of the canvas below the control bar.
///
/// The canvas keeps its intrinsic pixel size and is scaled down uniformly
/// when the window is too small to show it whole.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CanvasPlacement {
    origin: Vec2,
    canvas_size: Vec2,
    scale: f32,
}

impl CanvasPlacement {
    fn new(extent: (u32, u32), screen: Vec2, reserve: ChromeReserve) -> Self {
        let canvas_size = Vec2::new(extent.0 as f32, extent.1 as f32);
        let padding = reserve.padding_px as f32;
        let controls = reserve.controls_height_px as f32;
        let available = Vec2::new(
            (screen.x - padding).max(1.0),
            (screen.y - padding - controls).max(1.0),
        );
        let scale = if canvas_size.x <= 0.0 || canvas_size.y <= 0.0 {
            1.0
        } else {
            (available.x / canvas_size.x)
                .min(available.y / canvas_size.y)
                .min(1.0)
        };
        let display = canvas_size * scale;
        let origin = Vec2::new(((screen.x - display.x) / 2.0).max(0.0), controls + padding / 2.0);

        Self {
            origin,
            canvas_size,
            scale,
        }
    }

    fn display_size(&self) -> Vec2 {
        self.canvas_size * self.scale
    }

    fn contains(&self, point: Vec2) -> bool {
        let local = point - self.origin;
        let size = self.display_size();
        local.x >= 0.0 && local.y >= 0.0 && local.x < size.x && local.y < size.y
    }

    fn sample(&self, point: Vec2) -> PointerSample {
        PointerSample {
            position: point - self.origin,
            display_size: self.display_size(),
            canvas_size: self.canvas_size,
        }
    }

    fn to_screen(&self, canvas_point: Vec2) -> Vec2 {
        self.origin + canvas_point * self.scale
    }
}

/// Turns raw cursor observations into canvas pointer events.
#[derive(Clone, Copy, Debug, Default)]
struct PointerTracker {
    last: Option<Vec2>,
}

impl PointerTracker {
    /// Emits `Move` when the cursor moved inside the canvas, `Leave` when it
    /// exited and `Click` for a left press inside. Input is suppressed while
    /// a modal panel covers the canvas.
    fn observe(
        &mut self,
        placement: &CanvasPlacement,
        cursor: Vec2,
        pressed: bool,
        blocked: bool,
    ) -> Vec<PointerInput> {
        let mut events = Vec::new();
        let inside = !blocked && placement.contains(cursor);

        if inside {
            if self.last != Some(cursor) {
                events.push(PointerInput::Move(placement.sample(cursor)));
            }
            if pressed {
                events.push(PointerInput::Click(placement.sample(cursor)));
            }
            self.last = Some(cursor);
        } else if self.last.take().is_some() {
            events.push(PointerInput::Leave);
        }

        events
    }
}

/// Cell size used to draw a pattern thumbnail; may be fractional.
fn thumbnail_cell_px(pattern: &Pattern) -> f32 {
    let longest = pattern.rows().max(pattern.columns()).max(1);
    (THUMBNAIL_EXTENT_PX / longest as f32).min(THUMBNAIL_MAX_CELL_PX)
}

/// Renders a pattern preview into a retained display list.
///
/// Cells keep the canvas's one pixel grid gap around a fractional cell size.
fn pattern_thumbnail(pattern: &Pattern, palette: &Palette) -> Result<DisplayList, RenderingError> {
    let grid = GridSize::new(pattern.columns(), pattern.rows());
    if grid.is_empty() {
        return Err(RenderingError::EmptyGrid { grid });
    }
    let cell_px = thumbnail_cell_px(pattern);
    let pitch = cell_px + 1.0;
    let width = grid.width() as f32 * pitch + 1.0;
    let height = grid.height() as f32 * pitch + 1.0;

    let mut list = DisplayList::new();
    list.resize(width.round() as u32, height.round() as u32);
    list.clear(palette.dead);
    for column in 0..=grid.width() {
        let x = column as f32 * pitch + 1.0;
        list.stroke_line(
            Vec2::new(x, 0.0),
            Vec2::new(x, height),
            GRID_LINE_WIDTH,
            palette.grid,
        );
    }
    for row in 0..=grid.height() {
        let y = row as f32 * pitch + 1.0;
        list.stroke_line(
            Vec2::new(0.0, y),
            Vec2::new(width, y),
            GRID_LINE_WIDTH,
            palette.grid,
        );
    }
    for cell in grid.cells() {
        if pattern.state(cell.row(), cell.column()).is_alive() {
            let origin = Vec2::new(
                cell.column() as f32 * pitch + 1.0,
                cell.row() as f32 * pitch + 1.0,
            );
            list.fill_rect(origin, Vec2::splat(cell_px), palette.alive);
        }
    }
    Ok(list)
}

/// Thumbnails for every catalogue pattern, grouped by category.
fn build_picker_groups<E: Engine>(
    controller: &Controller<E>,
    palette: &Palette,
) -> Vec<PickerGroup> {
    controller
        .catalog()
        .groups()
        .into_iter()
        .map(|group| PickerGroup {
            label: group.category.label(),
            entries: group
                .patterns
                .into_iter()
                .filter_map(|pattern| match pattern_thumbnail(pattern, palette) {
                    Ok(thumbnail) => Some(PickerEntry {
                        name: pattern.name().to_owned(),
                        thumbnail,
                    }),
                    Err(error) => {
                        tracing::warn!(pattern = pattern.name(), %error, "skipping thumbnail");
                        None
                    }
                })
                .collect(),
        })
        .collect()
}

fn apply_action<E: Engine>(
    controller: &mut Controller<E>,
    host: &mut FrameQueue,
    panels: &mut Panels,
    action: ControlAction,
) {
    match action {
        ControlAction::ToggleRunning => {
            let _ = controller.toggle_running(host);
        }
        ControlAction::Restart => controller.restart(),
        ControlAction::Clear => controller.clear(),
        ControlAction::TogglePicker => {
            panels.picker_open = !panels.picker_open;
            panels.rules_open = false;
        }
        ControlAction::ToggleRules => {
            panels.rules_open = !panels.rules_open;
            panels.picker_open = false;
        }
        ControlAction::ToggleTheme => {
            let _ = controller.toggle_theme();
        }
        ControlAction::SelectPattern(name) => {
            let _ = controller.select_pattern(&name);
            panels.picker_open = false;
        }
        ControlAction::Dismiss => {
            if panels.any_open() {
                *panels = Panels::default();
            } else {
                controller.deselect_pattern();
            }
        }
        ControlAction::SetInterval(millis) => {
            let _ = controller.set_interval_from_slider(millis);
        }
        ControlAction::Faster | ControlAction::Slower => {
            let current = controller.session().interval().millis();
            let step = controller.interval_bounds().step_ms();
            let target = if action == ControlAction::Faster {
                current.saturating_sub(step)
            } else {
                current.saturating_add(step)
            };
            let _ = controller.set_interval(target);
        }
    }
}

fn page_background(theme: Theme) -> macroquad::color::Color {
    if theme.is_dark() {
        macroquad::color::Color::from_rgba(17, 24, 39, 255)
    } else {
        macroquad::color::Color::from_rgba(238, 242, 255, 255)
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

/// Replays the retained canvas onto the screen at the given placement.
fn draw_display_list(list: &DisplayList, placement: &CanvasPlacement) {
    let display = placement.display_size();
    for op in list.ops() {
        match *op {
            DrawOp::Clear { color } => macroquad::shapes::draw_rectangle(
                placement.origin.x,
                placement.origin.y,
                display.x,
                display.y,
                to_macroquad_color(color),
            ),
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                let from = placement.to_screen(from);
                let to = placement.to_screen(to);
                macroquad::shapes::draw_line(
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    width * placement.scale,
                    to_macroquad_color(color),
                );
            }
            DrawOp::Rect {
                origin,
                size,
                color,
            } => {
                let origin = placement.to_screen(origin);
                let size = size * placement.scale;
                macroquad::shapes::draw_rectangle(
                    origin.x,
                    origin.y,
                    size.x,
                    size.y,
                    to_macroquad_color(color),
                );
            }
        }
    }
}

/// Centred status text shown while the engine is loading or unavailable.
fn draw_loading_indicator(screen: Vec2, failure: Option<&str>, elapsed: Duration, theme: Theme) {
    let text = match failure {
        Some(reason) => format!("Simulation unavailable: {reason}"),
        None => {
            let dots = (elapsed.as_millis() / 300 % 4) as usize;
            format!("Loading simulation{}", ".".repeat(dots))
        }
    };
    let color = if theme.is_dark() {
        macroquad::color::Color::from_rgba(229, 231, 235, 255)
    } else {
        macroquad::color::Color::from_rgba(55, 65, 81, 255)
    };
    let font_size = 24.0;
    let dimensions = macroquad::text::measure_text(&text, None, font_size as u16, 1.0);
    let _ = macroquad::text::draw_text(
        &text,
        (screen.x - dimensions.width) / 2.0,
        screen.y / 2.0,
        font_size,
        color,
    );
}

impl RenderingBackend for MacroquadBackend {
    fn run<E>(self, controller: Controller<E>) -> Result<()>
    where
        E: Engine + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let mut config = macroquad::window::Conf {
            window_title: "Conway's Game of Life".to_owned(),
            window_width: 960,
            window_height: 960,
            high_dpi: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut controller = controller;
            let mut host = FrameQueue::new();
            let mut control_panel_input = ControlPanelInputState::default();
            let mut pointer = PointerTracker::default();
            let mut panels = Panels::default();
            let mut fps_counter = FpsCounter::default();
            let mut mounted_screen: Option<ContainerBox> = None;
            let mut thumbnails: Option<(Theme, Vec<PickerGroup>)> = None;
            let clock = Instant::now();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let container =
                    ContainerBox::new(screen.x.max(0.0) as u32, screen.y.max(0.0) as u32);
                match mounted_screen {
                    None => controller.mount(&mut host, container),
                    Some(previous) if previous != container => {
                        controller.resize_container(container);
                    }
                    Some(_) => {}
                }
                mounted_screen = Some(container);

                for action in control_panel_input
                    .take_actions()
                    .into_iter()
                    .chain(keyboard.actions)
                {
                    apply_action(&mut controller, &mut host, &mut panels, action);
                }

                let now = clock.elapsed();
                for request in host.take_pending() {
                    let _ = controller.on_frame(&mut host, request, now);
                }

                let extent = controller.surface().size();
                let placement = CanvasPlacement::new(extent, screen, controller.chrome_reserve());
                let (cursor_x, cursor_y) = mouse_position();
                let pressed = is_mouse_button_pressed(MouseButton::Left);
                for event in pointer.observe(
                    &placement,
                    Vec2::new(cursor_x, cursor_y),
                    pressed,
                    panels.any_open(),
                ) {
                    controller.pointer(event);
                }

                let theme = controller.session().theme();
                macroquad::window::clear_background(page_background(theme));
                if controller.is_ready() {
                    draw_display_list(controller.surface(), &placement);
                } else {
                    draw_loading_indicator(screen, controller.failure(), now, theme);
                }

                let ui_theme = UiTheme::for_theme(theme);
                let mut root_ui = macroquad::ui::root_ui();
                let session = controller.session();
                let bar = ControlBarContext {
                    origin: macroquad::math::Vec2::new(0.0, 0.0),
                    size: macroquad::math::Vec2::new(
                        screen.x,
                        controller.chrome_reserve().controls_height_px as f32,
                    ),
                    theme: ui_theme,
                    ready: controller.is_ready(),
                    running: controller.is_running(),
                    generation: session.generation(),
                    alive: session.alive_count(),
                    interval: session.interval(),
                    bounds: controller.interval_bounds(),
                    placing: session.mode().selected_pattern().map(|pattern| pattern.name()),
                };
                for action in draw_control_bar(&mut root_ui, &bar) {
                    control_panel_input.register(action);
                }

                if panels.picker_open {
                    if thumbnails.as_ref().map(|(built, _)| *built) != Some(theme) {
                        let palette = Palette::for_theme(theme);
                        thumbnails = Some((theme, build_picker_groups(&controller, &palette)));
                    }
                    if let Some((_, groups)) = thumbnails.as_ref() {
                        let picker = PickerContext {
                            screen: macroquad::math::Vec2::new(screen.x, screen.y),
                            theme: ui_theme,
                            groups,
                            selected: session
                                .mode()
                                .selected_pattern()
                                .map(|pattern| pattern.name()),
                        };
                        for action in draw_pattern_picker(&mut root_ui, &picker) {
                            control_panel_input.register(action);
                        }
                    }
                }

                if panels.rules_open {
                    let screen = macroquad::math::Vec2::new(screen.x, screen.y);
                    for action in draw_rules_panel(&mut root_ui, screen, ui_theme) {
                        control_panel_input.register(action);
                    }
                }
                drop(root_ui);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                if show_fps {
                    if let Some(metrics) = fps_counter.record_frame(frame_dt) {
                        tracing::info!(
                            per_second = metrics.per_second,
                            trailing_ten_seconds = metrics.trailing_ten_seconds,
                            "frame rate"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }

            controller.unmount(&mut host);
            tracing::info!(generation = controller.session().generation(), "window closed");
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_canvas_core::PatternCategory;

    fn placement(screen: Vec2) -> CanvasPlacement {
        CanvasPlacement::new((321, 321), screen, ChromeReserve::default())
    }

    #[test]
    fn canvas_sits_centred_below_the_controls() {
        let placement = placement(Vec2::new(1000.0, 800.0));

        assert_eq!(placement.scale, 1.0);
        assert_eq!(placement.origin, Vec2::new(339.5, 136.0));
        assert!(placement.contains(Vec2::new(340.0, 137.0)));
        assert!(!placement.contains(Vec2::new(339.0, 137.0)));
        assert!(!placement.contains(Vec2::new(500.0, 136.0 + 321.0)));
    }

    #[test]
    fn small_windows_scale_the_canvas_down() {
        let placement = placement(Vec2::new(400.0, 312.5));

        assert!((placement.scale - 0.5).abs() < 1e-6);
        assert_eq!(placement.display_size(), Vec2::new(160.5, 160.5));

        let sample = placement.sample(placement.origin + Vec2::new(10.0, 20.0));
        assert_eq!(sample.canvas_position(), Vec2::new(20.0, 40.0));
        assert_eq!(placement.to_screen(Vec2::new(20.0, 40.0)), sample.position + placement.origin);
    }

    #[test]
    fn pointer_tracker_reports_moves_clicks_and_leave() {
        let placement = placement(Vec2::new(1000.0, 800.0));
        let inside = placement.origin + Vec2::new(5.0, 5.0);
        let outside = Vec2::new(5.0, 5.0);
        let mut tracker = PointerTracker::default();

        assert!(tracker.observe(&placement, outside, false, false).is_empty());

        let entered = tracker.observe(&placement, inside, true, false);
        assert!(matches!(
            entered.as_slice(),
            [PointerInput::Move(_), PointerInput::Click(_)]
        ));

        assert!(
            tracker.observe(&placement, inside, false, false).is_empty(),
            "a stationary cursor produces no events",
        );

        let left = tracker.observe(&placement, outside, false, false);
        assert_eq!(left, vec![PointerInput::Leave]);
    }

    #[test]
    fn open_panels_block_canvas_input() {
        let placement = placement(Vec2::new(1000.0, 800.0));
        let inside = placement.origin + Vec2::new(5.0, 5.0);
        let mut tracker = PointerTracker::default();
        let _ = tracker.observe(&placement, inside, false, false);

        let blocked = tracker.observe(&placement, inside, true, true);

        assert_eq!(blocked, vec![PointerInput::Leave]);
        assert!(tracker.observe(&placement, inside, true, true).is_empty());
    }

    #[test]
    fn thumbnails_fit_sixty_pixels_with_an_eight_pixel_cap() {
        let glider = Pattern::from_rows(
            "Glider",
            PatternCategory::Spaceship,
            &[[0u8, 1, 0], [0, 0, 1], [1, 1, 1]],
        )
        .expect("valid glider");
        let wide = Pattern::from_rows("Wide", PatternCategory::Gun, &[[1u8; 36]])
            .expect("valid row");

        assert_eq!(thumbnail_cell_px(&glider), 8.0);
        assert!((thumbnail_cell_px(&wide) - 60.0 / 36.0).abs() < 1e-4);

        let thumbnail = pattern_thumbnail(&glider, &Palette::LIGHT).expect("non-empty pattern");
        assert_eq!(thumbnail.size(), (28, 28));
        let alive = thumbnail
            .rects()
            .filter(|(_, _, color)| *color == Palette::LIGHT.alive)
            .count();
        assert_eq!(alive, 5);
    }

    #[test]
    fn wide_thumbnails_keep_fractional_cells() {
        let wide = Pattern::from_rows("Wide", PatternCategory::Gun, &[[1u8; 36]])
            .expect("valid row");

        let thumbnail = pattern_thumbnail(&wide, &Palette::DARK).expect("non-empty pattern");

        assert_eq!(thumbnail.size(), (97, 4), "36 cells of 5/3 px plus 37 one pixel gaps");
        let cells: Vec<_> = thumbnail
            .rects()
            .filter(|(_, _, color)| *color == Palette::DARK.alive)
            .collect();
        assert_eq!(cells.len(), 36);
        let (last_origin, last_size, _) = cells[35];
        assert!((last_size.x - 60.0 / 36.0).abs() < 1e-4);
        assert!((last_origin.x - (35.0 * (60.0 / 36.0 + 1.0) + 1.0)).abs() < 1e-3);
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        for _ in 0..59 {
            assert!(counter.record_frame(Duration::from_millis(16)).is_none());
        }

        let metrics = counter
            .record_frame(Duration::from_millis(60))
            .expect("one second elapsed");

        assert!((metrics.per_second - 60.0).abs() < 0.5);
        assert!(counter.record_frame(Duration::from_millis(16)).is_none());
    }
}

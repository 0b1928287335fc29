//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types. Widgets never touch the controller;
//! they report [`ControlAction`]s which the adapter latches and applies on the
//! next frame.

use crate::{to_macroquad_color, ControlAction};
use life_canvas_core::{IntervalBounds, StepInterval, Theme};
use life_canvas_rendering::{DisplayList, DrawOp};
use macroquad::{
    color::Color,
    math::{Rect, RectOffset, Vec2},
    ui::{hash, Ui},
};

const PICKER_MAX_WIDTH: f32 = 720.0;
const PICKER_MAX_HEIGHT: f32 = 640.0;
const RULES_WIDTH: f32 = 600.0;
const RULES_HEIGHT: f32 = 260.0;

/// Colours applied to the UI skin for the active theme.
#[derive(Clone, Copy, Debug)]
pub(crate) struct UiTheme {
    dark: bool,
    background: Color,
    panel: Color,
    text: Color,
    button: Color,
    button_hovered: Color,
    button_clicked: Color,
}

impl UiTheme {
    pub(crate) fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                dark: false,
                background: Color::from_rgba(238, 242, 255, 255),
                panel: Color::from_rgba(255, 255, 255, 255),
                text: Color::from_rgba(31, 41, 55, 255),
                button: Color::from_rgba(102, 126, 234, 255),
                button_hovered: Color::from_rgba(118, 75, 162, 255),
                button_clicked: Color::from_rgba(79, 70, 229, 255),
            },
            Theme::Dark => Self {
                dark: true,
                background: Color::from_rgba(17, 24, 39, 255),
                panel: Color::from_rgba(31, 41, 55, 255),
                text: Color::from_rgba(229, 231, 235, 255),
                button: Color::from_rgba(139, 92, 246, 255),
                button_hovered: Color::from_rgba(167, 139, 250, 255),
                button_clicked: Color::from_rgba(109, 40, 217, 255),
            },
        }
    }
}

/// Snapshot of the session shown in the control bar for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlBarContext<'a> {
    /// Top-left corner of the bar in screen coordinates.
    pub(crate) origin: Vec2,
    /// Bar dimensions in screen space.
    pub(crate) size: Vec2,
    pub(crate) theme: UiTheme,
    /// Whether the simulation engine finished loading.
    pub(crate) ready: bool,
    pub(crate) running: bool,
    pub(crate) generation: u64,
    pub(crate) alive: usize,
    pub(crate) interval: StepInterval,
    pub(crate) bounds: IntervalBounds,
    /// Name of the pattern awaiting placement, if any.
    pub(crate) placing: Option<&'a str>,
}

/// Pattern listed in the picker together with its pre-rendered preview.
#[derive(Clone, Debug)]
pub(crate) struct PickerEntry {
    pub(crate) name: String,
    pub(crate) thumbnail: DisplayList,
}

/// Patterns sharing a category.
#[derive(Clone, Debug)]
pub(crate) struct PickerGroup {
    pub(crate) label: &'static str,
    pub(crate) entries: Vec<PickerEntry>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct PickerContext<'a> {
    pub(crate) screen: Vec2,
    pub(crate) theme: UiTheme,
    pub(crate) groups: &'a [PickerGroup],
    pub(crate) selected: Option<&'a str>,
}

fn push_skin(ui: &mut Ui, theme: UiTheme, window_background: Color) {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(window_background)
        .color_hovered(window_background)
        .color_clicked(window_background)
        .color_selected(window_background)
        .color_selected_hovered(window_background)
        .color_inactive(window_background)
        .text_color(theme.text)
        .margin(RectOffset::new(16.0, 16.0, 12.0, 12.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(theme.text)
        .text_color_hovered(theme.text)
        .text_color_clicked(theme.text)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(Color::from_rgba(255, 255, 255, 255))
        .text_color_hovered(Color::from_rgba(255, 255, 255, 255))
        .text_color_clicked(Color::from_rgba(255, 255, 255, 255))
        .color(theme.button)
        .color_hovered(theme.button_hovered)
        .color_clicked(theme.button_clicked)
        .color_selected(theme.button)
        .color_selected_hovered(theme.button_hovered)
        .color_inactive(Color::new(theme.button.r, theme.button.g, theme.button.b, 0.5))
        .margin(RectOffset::new(10.0, 10.0, 6.0, 6.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);
}

/// Renders the buttons, speed slider and statistics above the canvas.
pub(crate) fn draw_control_bar(ui: &mut Ui, context: &ControlBarContext<'_>) -> Vec<ControlAction> {
    push_skin(ui, context.theme, context.theme.background);

    let mut actions = Vec::new();
    let _ = ui.window(hash!("control_bar"), context.origin, context.size, |ui| {
        let run_label = if context.running { "Pause" } else { "Start" };
        let theme_label = if context.theme.dark {
            "Light"
        } else {
            "Dark"
        };
        let buttons = [
            (run_label, ControlAction::ToggleRunning),
            ("Restart", ControlAction::Restart),
            ("Reset", ControlAction::Clear),
            ("Pattern", ControlAction::TogglePicker),
            ("Rule", ControlAction::ToggleRules),
            (theme_label, ControlAction::ToggleTheme),
        ];
        for (index, (label, action)) in buttons.into_iter().enumerate() {
            if index > 0 {
                ui.same_line(0.0);
            }
            if ui.button(None, label) {
                actions.push(action);
            }
        }

        let current = context.interval.millis() as f32;
        let mut speed = current;
        let range = context.bounds.min_ms() as f32..context.bounds.max_ms() as f32;
        ui.slider(hash!("speed"), "Speed (ms)", range, &mut speed);
        ui.same_line(0.0);
        ui.label(None, &context.interval.rate_label());
        if (speed - current).abs() > f32::EPSILON {
            actions.push(ControlAction::SetInterval(speed));
        }

        let stats = if context.ready {
            format!("Generation: {}    Alive: {}", context.generation, context.alive)
        } else {
            "Generation: -    Alive: -".to_owned()
        };
        ui.label(None, &stats);
        if let Some(name) = context.placing {
            ui.same_line(0.0);
            ui.label(None, &format!("    Placing {name}: click the canvas, Esc cancels"));
        }
    });

    ui.pop_skin();
    actions
}

fn draw_thumbnail(ui: &mut Ui, thumbnail: &DisplayList) {
    let (width, height) = thumbnail.size();
    let mut canvas = ui.canvas();
    let origin = canvas.request_space(Vec2::new(width as f32, height as f32));
    for op in thumbnail.ops() {
        match *op {
            DrawOp::Clear { color } => {
                let color = to_macroquad_color(color);
                canvas.rect(
                    Rect::new(origin.x, origin.y, width as f32, height as f32),
                    color,
                    color,
                );
            }
            DrawOp::Line { from, to, color, .. } => canvas.line(
                origin + Vec2::new(from.x, from.y),
                origin + Vec2::new(to.x, to.y),
                to_macroquad_color(color),
            ),
            DrawOp::Rect {
                origin: cell,
                size,
                color,
            } => {
                let color = to_macroquad_color(color);
                canvas.rect(
                    Rect::new(origin.x + cell.x, origin.y + cell.y, size.x, size.y),
                    color,
                    color,
                );
            }
        }
    }
}

/// Renders the modal pattern picker grouped by category.
pub(crate) fn draw_pattern_picker(ui: &mut Ui, context: &PickerContext<'_>) -> Vec<ControlAction> {
    push_skin(ui, context.theme, context.theme.panel);

    let size = Vec2::new(
        PICKER_MAX_WIDTH.min(context.screen.x - 64.0).max(200.0),
        PICKER_MAX_HEIGHT.min(context.screen.y - 64.0).max(200.0),
    );
    let origin = (context.screen - size) * 0.5;

    let mut actions = Vec::new();
    let _ = ui.window(hash!("pattern_picker"), origin, size, |ui| {
        ui.label(None, "Choose a pattern");
        ui.same_line(0.0);
        if ui.button(None, "Close") {
            actions.push(ControlAction::TogglePicker);
        }
        ui.separator();

        for group in context.groups {
            ui.label(None, group.label);
            for entry in &group.entries {
                draw_thumbnail(ui, &entry.thumbnail);
                ui.same_line(0.0);
                let label = if context.selected == Some(entry.name.as_str()) {
                    format!("* {}", entry.name)
                } else {
                    entry.name.clone()
                };
                if ui.button(None, label.as_str()) {
                    actions.push(ControlAction::SelectPattern(entry.name.clone()));
                }
            }
            ui.separator();
        }
    });

    ui.pop_skin();
    actions
}

/// Renders the modal panel explaining the rules of the game.
pub(crate) fn draw_rules_panel(ui: &mut Ui, screen: Vec2, theme: UiTheme) -> Vec<ControlAction> {
    push_skin(ui, theme, theme.panel);

    let size = Vec2::new(RULES_WIDTH, RULES_HEIGHT);
    let origin = ((screen - size) * 0.5).max(Vec2::ZERO);
    let mut actions = Vec::new();
    let _ = ui.window(hash!("rules_panel"), origin, size, |ui| {
        ui.label(None, "Rules of the Game");
        ui.separator();
        ui.label(None, "Birth: a dead cell with exactly 3 live neighbours comes alive.");
        ui.label(None, "Survival: a live cell with 2 or 3 live neighbours stays alive.");
        ui.label(None, "Loneliness: a live cell with 1 or fewer neighbours dies.");
        ui.label(None, "Overcrowding: a live cell with 4 or more neighbours dies.");
        ui.label(None, "The grid wraps around at every edge.");
        ui.separator();
        if ui.button(None, "Close") {
            actions.push(ControlAction::ToggleRules);
        }
    });

    ui.pop_skin();
    actions
}

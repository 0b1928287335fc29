#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session controller wiring the engine, the systems and the renderer.
//!
//! Hosts construct a [`Controller`] around an [`Engine`] implementation and
//! forward frame callbacks, pointer events and control actions to it. The
//! controller applies the resulting commands and keeps the retained canvas
//! in its [`DisplayList`](life_canvas_rendering::DisplayList) up to date.

mod config;
mod controller;
mod session;

use anyhow::Result as AnyResult;
use life_canvas_core::Engine;

pub use config::{
    AppearanceConfig, Config, ConfigError, LayoutConfig, PatternsConfig, TimingConfig,
};
pub use controller::Controller;
pub use session::{Session, SessionSnapshot};

/// Host that drives a controller until it is asked to exit.
pub trait RenderingBackend {
    /// Runs the backend, delivering frames, input and control actions to the
    /// controller. Returns when the user quits or the run completes.
    fn run<E>(self, controller: Controller<E>) -> AnyResult<()>
    where
        E: Engine + 'static;
}

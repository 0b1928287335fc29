//! Window-less backend that steps the controller on a simulated frame clock.

use std::{io::Write, time::Duration};

use anyhow::{bail, Context, Result};
use life_canvas_controller::{Controller, RenderingBackend, SessionSnapshot};
use life_canvas_core::{CellStates, Engine};
use life_canvas_system_scheduler::{FrameOutcome, FrameQueue};
use life_canvas_system_sizing::ContainerBox;

/// Simulated time between two host frames.
const FRAME: Duration = Duration::from_millis(16);

/// Container the headless canvas is laid out in.
const CONTAINER: ContainerBox = ContainerBox::new(1024, 768);

/// How per-generation statistics are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum StatsFormat {
    /// `generation 3: 41 alive`
    #[default]
    Text,
    /// One serialized session snapshot per line.
    Json,
}

/// Drives a controller without a window until a number of generations ran.
#[derive(Debug)]
pub(crate) struct HeadlessBackend<W> {
    out: W,
    generations: u64,
    format: StatsFormat,
}

impl<W: Write> HeadlessBackend<W> {
    pub(crate) fn new(out: W, generations: u64) -> Self {
        Self {
            out,
            generations,
            format: StatsFormat::default(),
        }
    }

    pub(crate) fn with_format(mut self, format: StatsFormat) -> Self {
        self.format = format;
        self
    }
}

fn write_stats(out: &mut dyn Write, format: StatsFormat, snapshot: &SessionSnapshot) -> Result<()> {
    match format {
        StatsFormat::Text => writeln!(
            out,
            "generation {}: {} alive",
            snapshot.generation, snapshot.alive
        )?,
        StatsFormat::Json => {
            serde_json::to_writer(&mut *out, snapshot).context("failed to encode statistics")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_grid(out: &mut dyn Write, cells: &CellStates<'_>) -> Result<()> {
    let width = cells.grid().width() as usize;
    let mut line = String::with_capacity(width);
    for (cell, state) in cells.iter() {
        line.push(if state.is_alive() { '#' } else { '.' });
        if cell.column() as usize + 1 == width {
            writeln!(out, "{line}")?;
            line.clear();
        }
    }
    Ok(())
}

impl<W: Write> RenderingBackend for HeadlessBackend<W> {
    fn run<E>(self, mut controller: Controller<E>) -> Result<()>
    where
        E: Engine + 'static,
    {
        let Self {
            mut out,
            generations,
            format,
        } = self;

        if !controller.is_ready() {
            bail!(
                "simulation unavailable: {}",
                controller.failure().unwrap_or("unknown reason")
            );
        }

        let mut host = FrameQueue::new();
        controller.mount(&mut host, CONTAINER);

        let mut now = Duration::ZERO;
        while controller.session().generation() < generations {
            let pending = host.take_pending();
            if pending.is_empty() {
                tracing::info!(
                    generation = controller.session().generation(),
                    "scheduler idle, stopping early"
                );
                break;
            }
            for request in pending {
                if controller.on_frame(&mut host, request, now) == FrameOutcome::Step {
                    write_stats(&mut out, format, &controller.snapshot())?;
                }
            }
            now += FRAME;
        }
        controller.unmount(&mut host);

        if let Some(cells) = controller.cell_states() {
            write_grid(&mut out, &cells)?;
        }
        out.flush().context("failed to flush output")?;
        tracing::info!(generation = controller.session().generation(), "headless run finished");
        Ok(())
    }
}

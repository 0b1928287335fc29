#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Life Canvas in a window or headless.

mod headless;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use life_canvas_catalog::Catalog;
use life_canvas_controller::{Config, Controller, RenderingBackend};
use life_canvas_core::{CellCoord, Theme};
use life_canvas_engine::LifeEngine;
use life_canvas_rendering_macroquad::MacroquadBackend;
use tracing_subscriber::EnvFilter;

use self::headless::{HeadlessBackend, StatsFormat};

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "LIFE_CANVAS_LOG";
const DEFAULT_LOG_FILTER: &str = "life_canvas=info,warn";

/// Conway's Game of Life on an interactive canvas.
#[derive(Debug, Parser)]
#[command(name = "life-canvas", version, about)]
struct CliArgs {
    /// TOML configuration file; flags override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start with the dark theme.
    #[arg(long)]
    dark: bool,

    /// Start paused instead of running.
    #[arg(long)]
    paused: bool,

    /// Milliseconds between generations.
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u32>,

    /// Seed for a random initial soup instead of the classic layout.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of columns.
    #[arg(long)]
    width: Option<u32>,

    /// Number of rows.
    #[arg(long)]
    height: Option<u32>,

    /// Start from an empty grid.
    #[arg(long)]
    empty: bool,

    /// Stamp a catalogue pattern before starting, e.g. `Glider@10,12`.
    #[arg(long = "place", value_name = "NAME@ROW,COL", value_parser = parse_placement)]
    placements: Vec<Placement>,

    /// Run without a window and print statistics to stdout.
    #[arg(long)]
    headless: bool,

    /// Generations to simulate in headless mode.
    #[arg(long, default_value_t = 10)]
    generations: u64,

    /// Print headless statistics as JSON lines.
    #[arg(long)]
    json: bool,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,

    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
}

/// Pattern stamp requested on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Placement {
    name: String,
    anchor: CellCoord,
}

fn parse_placement(value: &str) -> Result<Placement, String> {
    let (name, position) = value
        .rsplit_once('@')
        .ok_or_else(|| format!("expected NAME@ROW,COL, got '{value}'"))?;
    let (row, column) = position
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL after '@', got '{position}'"))?;
    let row = row
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid row '{row}': {error}"))?;
    let column = column
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid column '{column}': {error}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("pattern name must not be empty".to_owned());
    }

    Ok(Placement {
        name: name.to_owned(),
        anchor: CellCoord::new(row, column),
    })
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_config(args: &CliArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    let dark = args.dark || config.appearance.theme.is_dark();
    config.appearance.theme = Theme::from_dark_flag(dark);
    if args.paused {
        config.appearance.start_running = false;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.timing.interval_ms = interval_ms;
    }
    if let Some(seed) = args.seed {
        config.engine.seed = Some(seed);
    }
    if let Some(width) = args.width {
        config.engine.width = width;
    }
    if let Some(height) = args.height {
        config.engine.height = height;
    }

    config
        .validate()
        .context("command-line flags produced an invalid configuration")?;
    Ok(config)
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    let mut catalog = Catalog::builtin().context("built-in pattern catalogue is invalid")?;
    if let Some(path) = &config.patterns.extra {
        let _ = catalog
            .load_file(path)
            .with_context(|| format!("failed to load extra patterns from {}", path.display()))?;
    }
    Ok(catalog)
}

fn prepare(controller: &mut Controller<LifeEngine>, args: &CliArgs) -> Result<()> {
    if args.empty {
        controller.clear();
    }
    for placement in &args.placements {
        let pattern = controller
            .catalog()
            .find(&placement.name)
            .cloned()
            .with_context(|| format!("unknown pattern '{}'", placement.name))?;
        controller.place(&pattern, placement.anchor);
    }
    Ok(())
}

/// Entry point for the Life Canvas command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging();

    let config = resolve_config(&args)?;
    let catalog = load_catalog(&config)?;
    let engine_config = config.engine;
    let mut controller = Controller::new(&config, catalog, move || LifeEngine::load(engine_config))
        .context("failed to build the session controller")?;
    prepare(&mut controller, &args)?;

    tracing::info!(
        headless = args.headless,
        width = config.engine.width,
        height = config.engine.height,
        "starting life canvas"
    );

    if args.headless {
        let format = if args.json {
            StatsFormat::Json
        } else {
            StatsFormat::Text
        };
        HeadlessBackend::new(std::io::stdout().lock(), args.generations)
            .with_format(format)
            .run(controller)
    } else {
        let mut backend = MacroquadBackend::new().with_show_fps(args.show_fps);
        if args.vsync {
            backend = backend.with_vsync(true);
        }
        backend.run(controller)
    }
}

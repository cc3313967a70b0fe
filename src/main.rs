use anyhow::{Context, Result};
use std::{
    fs::File,
    path::{Path, PathBuf},
    time::Duration,
};
use structopt::StructOpt;

mod error;
mod events;
mod game;
mod layout;
mod sweep;
mod ui;

#[derive(Debug, structopt::StructOpt)]
struct Opt {
    /// The number of columns on the board.
    #[structopt(short = "W", long, default_value = "10")]
    width: u16,

    /// The number of rows on the board.
    #[structopt(short = "H", long, default_value = "10")]
    height: u16,

    /// The total number of mines on the board.
    #[structopt(short, long, default_value = "10")]
    mines: u16,

    /// The width of each cell.
    #[structopt(long, default_value = "5")]
    cell_width: u16,

    /// The height of each cell.
    #[structopt(long, default_value = "3")]
    cell_height: u16,

    /// The gap between neighboring cells.
    #[structopt(long, default_value = "0")]
    spacing: u16,

    /// The blank border around the board.
    #[structopt(long, default_value = "1")]
    padding: u16,

    /// Milliseconds between clock updates.
    #[structopt(long, default_value = "50")]
    tick_ms: u64,

    /// Seed for the mine layout, random when omitted.
    #[structopt(long)]
    seed: Option<u64>,

    /// Write logs to this file; filtered by `RUST_LOG`, `info` by default.
    #[structopt(long, parse(from_os_str))]
    log_file: Option<PathBuf>,
}

/// The terminal belongs to the game, so logs only go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .write_style(env_logger::WriteStyle::Never)
        .try_init()
        .context("failed to initialize logger")
}

fn main() -> Result<()> {
    let Opt {
        width,
        height,
        mines,
        cell_width,
        cell_height,
        spacing,
        padding,
        tick_ms,
        seed,
        log_file,
    } = Opt::from_args();

    if let Some(path) = log_file.as_deref() {
        init_logging(path)?;
    }

    let board = sweep::BoardConfig {
        width: usize::from(width),
        height: usize::from(height),
        mines: usize::from(mines),
    }
    .validate()
    .context("invalid board")?;

    if cell_width == 0 || cell_height == 0 {
        anyhow::bail!("cells must be at least 1x1, got {cell_width}x{cell_height}");
    }

    let layout = layout::BoardLayout::builder()
        .cell_width(usize::from(cell_width))
        .cell_height(usize::from(cell_height))
        .spacing(usize::from(spacing))
        .padding(usize::from(padding))
        .build();

    let events = events::Config {
        tick_rate: Duration::from_millis(tick_ms),
        ..Default::default()
    };

    ui::Ui::builder()
        .board(board)
        .layout(layout)
        .events(events)
        .seed(seed)
        .build()
        .run()
        .context("sweep failed")
}

use std::{path::PathBuf, time::Duration};

use cylindris_engine::{ModeKind, PieceSeed};

use crate::{command::play::app::PlayApp, logging, tui::Tui};

mod app;
mod input;

const DEFAULT_TICK_MS: u64 = 200;
const DEFAULT_FPS: u32 = 60;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Rule variant to start with
    #[clap(long, default_value = "classic")]
    mode: ModeKind,
    /// Piece seed, up to 32 hex digits (random if omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Milliseconds between gravity steps
    #[clap(long, default_value_t = DEFAULT_TICK_MS, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
    /// Input and redraw frames per second
    #[clap(long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,
    /// Append logs to this file (logs are discarded otherwise)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            mode: ModeKind::default(),
            seed: None,
            tick_ms: DEFAULT_TICK_MS,
            fps: DEFAULT_FPS,
            log_file: None,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        mode,
        seed,
        tick_ms,
        fps,
        log_file,
    } = arg;

    if let Some(path) = log_file {
        logging::init_file(path)?;
    }

    let mut app = PlayApp::new(*mode, *seed, Duration::from_millis(*tick_ms), *fps);
    tracing::info!(mode = %mode, "starting game");
    Tui::new().run(&mut app)
}

use std::io::{self, Write as _};

use cylindris_engine::{Command, FieldSize, GameMode, ModeKind, PieceSeed, RuleSet};
use rand::{Rng as _, SeedableRng as _, rngs::StdRng, seq::IndexedRandom as _};
use serde::Serialize;

use crate::logging;

#[derive(Debug, Clone, Copy, Default, derive_more::FromStr)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Rule variant to simulate
    #[clap(long, default_value = "classic")]
    mode: ModeKind,
    /// Seed for both piece spawning and the random input (random if omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Maximum number of ticks to run
    #[clap(long, default_value_t = 1000)]
    ticks: u64,
    /// Output format: text or json
    #[clap(long, default_value = "text")]
    format: OutputFormat,
}

/// Result of one headless game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Summary {
    mode: String,
    seed: PieceSeed,
    field_size: FieldSize,
    ticks: u64,
    spawned: usize,
    locked: usize,
    cleared_rows: usize,
    game_over: bool,
    field: Vec<String>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        mode,
        seed,
        ticks,
        format,
    } = arg;

    logging::init_stderr()?;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(mode = %mode, %seed, ticks, "starting simulation");
    let summary = simulate(mode.rules(), seed, *ticks);
    tracing::info!(
        ticks = summary.ticks,
        cleared_rows = summary.cleared_rows,
        game_over = summary.game_over,
        "simulation finished"
    );

    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Text => write_text(&mut out, &summary)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &summary)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Plays until game over or `max_ticks`, issuing one random command before
/// every tick.
fn simulate(rules: RuleSet, seed: PieceSeed, max_ticks: u64) -> Summary {
    let mut bytes = [0; 32];
    bytes[..16].copy_from_slice(seed.as_bytes());
    bytes[16..].copy_from_slice(seed.as_bytes());
    let mut input_rng = StdRng::from_seed(bytes);

    let mut game = GameMode::with_seed(rules, seed);
    let mut ticks = 0;
    let mut spawned = 0;
    let mut locked = 0;
    let mut cleared_rows = 0;

    while ticks < max_ticks && !game.is_game_over() {
        let command = Command::ACTIONS
            .choose(&mut input_rng)
            .copied()
            .unwrap_or_default();
        let had_piece = game.active_piece().is_some();
        game.process_command(command);
        if had_piece && game.active_piece().is_none() {
            locked += 1;
        }

        let outcome = game.tick();
        ticks += 1;
        spawned += usize::from(outcome.spawned);
        locked += usize::from(outcome.locked);
        cleared_rows += outcome.cleared_rows;
    }

    let field = game.field();
    Summary {
        mode: game.rules().name().to_owned(),
        seed,
        field_size: game.field_size(),
        ticks,
        spawned,
        locked,
        cleared_rows,
        game_over: game.is_game_over(),
        field: field
            .rows()
            .map(|row| row.iter().map(|cell| cell.as_char()).collect())
            .collect(),
    }
}

fn write_text<W>(out: &mut W, summary: &Summary) -> io::Result<()>
where
    W: io::Write,
{
    for row in &summary.field {
        writeln!(out, "{row}")?;
    }
    writeln!(out)?;
    writeln!(out, "mode:         {}", summary.mode)?;
    writeln!(out, "seed:         {}", summary.seed)?;
    writeln!(out, "field:        {}", summary.field_size)?;
    writeln!(out, "ticks:        {}", summary.ticks)?;
    writeln!(out, "spawned:      {}", summary.spawned)?;
    writeln!(out, "locked:       {}", summary.locked)?;
    writeln!(out, "cleared_rows: {}", summary.cleared_rows)?;
    writeln!(out, "game_over:    {}", summary.game_over)?;
    Ok(())
}

//! Rule engine: the movement-and-locking state machine and the policies it is
//! parameterized by.
//!
//! - [`GameMode`] - field, falling piece and game-over flag, driven by
//!   [`GameMode::process_command`] and [`GameMode::tick`]
//! - [`RuleSet`] - field size, piece templates, spawn weights, [`Topology`]
//!   and [`ClearRule`] of one variant
//! - [`SpawnTable`] - weighted piece selection
//! - [`PieceGenerator`] / [`PieceSeed`] - seedable randomness for spawning
//!
//! # Game Flow
//!
//! 1. Build a [`GameMode`] from a [`RuleSet`] (e.g. [`ModeKind::rules`])
//! 2. Each frame, forward at most one [`Command`] to `process_command`
//! 3. On a fixed cadence call `tick`: gravity, then spawn, then row elimination
//! 4. Stop issuing input once `is_game_over` is true, or call `init` to restart
//!
//! # Example
//!
//! ```
//! use cylindris_engine::{Command, GameMode, ModeKind, PieceSeed};
//!
//! let mut mode = GameMode::with_seed(ModeKind::Classic.rules(), PieceSeed::from(42));
//!
//! let outcome = mode.tick();
//! assert!(outcome.spawned);
//!
//! mode.process_command(Command::MoveDown);
//! mode.process_command(Command::RotateCw);
//!
//! let field = mode.field();
//! assert_eq!(field.size(), mode.field_size());
//! ```

pub use self::{command::*, game_mode::*, piece_generator::*, rules::*, spawn_table::*};

mod command;
mod game_mode;
mod piece_generator;
mod rules;
mod spawn_table;

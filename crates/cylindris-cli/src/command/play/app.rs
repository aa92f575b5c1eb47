use std::{mem, time::Duration};

use crossterm::event::{Event, KeyEventKind};
use cylindris_engine::{Command, GameMode, ModeKind, PieceSeed};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::Line,
    widgets::Block,
};

use crate::{
    command::play::input::KeyAction,
    tui::{App, Tui},
    view::widgets::{FieldDisplay, KeyBinding, KeyBindingDisplay, StatusDisplay, color, style},
};

const SIDE_PANEL_WIDTH: u16 = 28;

/// Left Ctrl only reaches the app when the terminal reports modifier keys.
const fn key_bindings(with_ctrl: bool) -> [KeyBinding<'static>; 9] {
    let rotate_ccw: &[&str] = if with_ctrl { &["Z", "LCtrl"] } else { &["Z"] };
    [
        (&["←", "→"], "Move"),
        (&["↓", "Space"], "Move down"),
        (&["↑", "X"], "Rotate CW"),
        (rotate_ccw, "Rotate CCW"),
        (&["1"], "Classic"),
        (&["2"], "Cylinder"),
        (&["R"], "Restart"),
        (&["P"], "Pause"),
        (&["Q", "Esc"], "Quit"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub(crate) enum PlayState {
    #[display("playing")]
    Playing,
    #[display("paused")]
    Paused,
    #[display("game over")]
    GameOver,
}

/// Interactive shell around a [`GameMode`].
///
/// Key presses are buffered between frames and resolved once per frame, so
/// two movement keys pressed in the same frame jam each other.
#[derive(Debug)]
pub(crate) struct PlayApp {
    kind: ModeKind,
    game: GameMode,
    seed: Option<PieceSeed>,
    tick_interval: Duration,
    fps: u32,
    pressed: Vec<KeyAction>,
    is_paused: bool,
    is_exiting: bool,
    show_ctrl_binding: bool,
    pieces: usize,
    cleared_rows: usize,
}

impl PlayApp {
    pub(crate) fn new(
        kind: ModeKind,
        seed: Option<PieceSeed>,
        tick_interval: Duration,
        fps: u32,
    ) -> Self {
        Self {
            kind,
            game: Self::build_game(kind, seed),
            seed,
            tick_interval,
            fps,
            pressed: vec![],
            is_paused: false,
            is_exiting: false,
            show_ctrl_binding: false,
            pieces: 0,
            cleared_rows: 0,
        }
    }

    fn build_game(kind: ModeKind, seed: Option<PieceSeed>) -> GameMode {
        let mut game = match seed {
            Some(seed) => GameMode::with_seed(kind.rules(), seed),
            None => GameMode::new(kind.rules()),
        };
        game.init();
        game
    }

    pub(crate) fn state(&self) -> PlayState {
        if self.game.is_game_over() {
            PlayState::GameOver
        } else if self.is_paused {
            PlayState::Paused
        } else {
            PlayState::Playing
        }
    }

    fn switch_mode(&mut self, kind: ModeKind) {
        tracing::info!(mode = %kind, "switching mode");
        self.kind = kind;
        self.game = Self::build_game(kind, self.seed);
        self.reset_stats();
    }

    fn restart(&mut self) {
        tracing::info!(mode = %self.kind, "restarting");
        self.game.init();
        self.reset_stats();
    }

    fn reset_stats(&mut self) {
        self.is_paused = false;
        self.pieces = 0;
        self.cleared_rows = 0;
    }

    /// Resolves the keys pressed since the previous frame.
    ///
    /// Quit wins over everything. A mode switch or restart consumes the frame.
    fn resolve_input(&mut self) {
        let pressed = mem::take(&mut self.pressed);

        if pressed.contains(&KeyAction::Quit) {
            self.is_exiting = true;
            return;
        }
        if let Some(kind) = ModeKind::ALL
            .into_iter()
            .find(|kind| pressed.contains(&KeyAction::SwitchMode(*kind)))
        {
            self.switch_mode(kind);
            return;
        }
        if pressed.contains(&KeyAction::Restart) {
            self.restart();
            return;
        }
        if pressed.contains(&KeyAction::TogglePause) && !self.game.is_game_over() {
            self.is_paused = !self.is_paused;
        }
        if self.is_paused {
            return;
        }

        let command = Command::from_pressed(pressed.iter().filter_map(|action| action.command()));
        self.game.process_command(command);
    }

    fn step(&mut self) {
        if self.is_paused || self.game.is_game_over() {
            return;
        }
        let outcome = self.game.tick();
        self.pieces += usize::from(outcome.spawned);
        self.cleared_rows += outcome.cleared_rows;
        if self.game.is_game_over() {
            tracing::info!(
                pieces = self.pieces,
                cleared_rows = self.cleared_rows,
                "game over"
            );
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_interval(Some(self.tick_interval));
        tui.set_frame_rate(self.fps);
        self.show_ctrl_binding = tui.reports_modifier_keys();
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        if let Some(key) = event.as_key_event()
            && key.kind == KeyEventKind::Press
            && let Some(action) = KeyAction::from_key(key)
        {
            self.pressed.push(action);
        }
    }

    fn end_frame(&mut self, _tui: &mut Tui) {
        self.resolve_input();
    }

    fn draw(&self, frame: &mut Frame) {
        let state = self.state();
        let border_style = match state {
            PlayState::Playing => color::WHITE,
            PlayState::Paused => color::YELLOW,
            PlayState::GameOver => color::RED,
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let field = self.game.field();
        let field_display = FieldDisplay::new(&field).block(panel("FIELD"));
        let size = self.game.field_size();
        let status = StatusDisplay::new()
            .row("Mode", self.game.rules().name())
            .row("Field", size)
            .row("State", state)
            .row("Pieces", self.pieces)
            .row("Rows", self.cleared_rows)
            .block(panel("STATUS"));
        let bindings = key_bindings(self.show_ctrl_binding);
        let key_bindings = KeyBindingDisplay::new(&bindings).block(panel("KEYS"));

        let [field_column, side_column] = Layout::horizontal([
            Constraint::Length(field_display.width()),
            Constraint::Length(SIDE_PANEL_WIDTH),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(frame.area());
        let [field_area] =
            Layout::vertical([Constraint::Length(field_display.height())]).areas(field_column);
        let [status_area, keys_area] = Layout::vertical([
            Constraint::Length(status.height()),
            Constraint::Length(key_bindings.height()),
        ])
        .spacing(1)
        .areas(side_column);

        frame.render_widget(field_display, field_area);
        frame.render_widget(status, status_area);
        frame.render_widget(key_bindings, keys_area);
    }

    fn update(&mut self, _tui: &mut Tui) {
        self.step();
    }
}

use std::{io, time::Duration};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};
use ratatui::DefaultTerminal;

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the `App` trait.
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
    reports_modifier_keys: bool,
}

impl Tui {
    /// Creates a new Tui.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick interval.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    /// Sets the frame rate (Hz, frames per second).
    pub fn set_frame_rate(&mut self, fps: u32) {
        let interval = (fps > 0).then(|| Duration::from_secs(1) / fps);
        self.events.set_frame_interval(interval);
    }

    /// Returns whether bare modifier keys (e.g. left Ctrl) arrive as key events.
    ///
    /// Only true while running on a terminal that supports the keyboard
    /// enhancement protocol.
    pub fn reports_modifier_keys(&self) -> bool {
        self.reports_modifier_keys
    }

    /// Runs the application.
    ///
    /// 1. Enables keyboard enhancement if the terminal supports it
    /// 2. Calls `app.init()` for initialization
    /// 3. Runs the event loop until `app.should_exit()` returns true
    ///    - `Event::Tick`: calls `app.update()`
    ///    - `Event::Frame`: calls `app.end_frame()`, then `app.draw()`
    ///    - `Event::Crossterm`: calls `app.handle_event()`
    /// 4. Restores the keyboard mode, even if the loop failed
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            self.reports_modifier_keys = push_keyboard_enhancement();
            app.init(&mut self);

            let result = self.drive(app, terminal);
            if self.reports_modifier_keys {
                _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
            }
            result
        })
    }

    fn drive<A>(&mut self, app: &mut A, terminal: &mut DefaultTerminal) -> anyhow::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick => {
                    app.update(self);
                }
                TuiEvent::Frame => {
                    app.end_frame(self);
                    terminal.draw(|f| app.draw(f))?;
                }
                TuiEvent::Crossterm(event) => {
                    app.handle_event(self, event);
                }
            }
        }
        Ok(())
    }
}

/// Asks the terminal to report every key, modifiers included, as an escape
/// code. Returns `false` when the protocol is unavailable.
fn push_keyboard_enhancement() -> bool {
    if !terminal::supports_keyboard_enhancement().unwrap_or(false) {
        return false;
    }
    let flags = KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES;
    execute!(io::stdout(), PushKeyboardEnhancementFlags(flags)).is_ok()
}

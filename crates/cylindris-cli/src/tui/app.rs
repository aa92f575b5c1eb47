use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Trait for TUI applications.
///
/// Applications executed by `Tui::run()` must implement this trait.
pub trait App {
    /// Initializes the application.
    ///
    /// Called at the start of `Tui::run()`. Use this to configure the tick and
    /// frame rates.
    fn init(&mut self, tui: &mut Tui);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    ///
    /// Key presses should be buffered here and acted upon in
    /// [`App::end_frame`].
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    /// Consumes the input gathered since the previous frame.
    ///
    /// Called on each `Event::Frame`, right before [`App::draw`].
    fn end_frame(&mut self, tui: &mut Tui);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);

    /// Updates game logic (called on each `Event::Tick`).
    fn update(&mut self, tui: &mut Tui);
}

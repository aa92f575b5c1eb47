use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Event loop state management.
///
/// Manages tick/frame intervals and returns the next event via `next()`.
/// If an interval is not set, that event type will not be generated.
/// Ticks take precedence over frames when both are due.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    frame_interval: Option<Duration>,
    last_tick: Instant,
    last_frame: Instant,
    frame_pending: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates a new `EventLoop` with both intervals unset.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            tick_interval: None,
            frame_interval: None,
            last_tick: now,
            last_frame: now,
            frame_pending: true, // draw once on startup
        }
    }

    /// Sets the tick interval.
    ///
    /// Pass `None` to disable tick events.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    /// Sets the frame interval.
    ///
    /// Pass `None` to disable frame events.
    pub(super) fn set_frame_interval(&mut self, interval: Option<Duration>) {
        self.frame_interval = interval;
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick/frame time is reached or a crossterm event occurs.
    /// If both intervals are unset, only waits for crossterm events.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= tick_interval
            {
                self.last_tick = now;
                return Ok(TuiEvent::Tick);
            }

            let frame_due = self
                .frame_interval
                .is_some_and(|interval| now.duration_since(self.last_frame) >= interval);
            if frame_due || self.frame_pending {
                self.last_frame = now;
                self.frame_pending = false;
                return Ok(TuiEvent::Frame);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_frame_at = self
            .frame_interval
            .map(|interval| self.last_frame + interval);
        let next_timeout_at = [next_tick_at, next_frame_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}

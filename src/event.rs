use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Application events.
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

/// Synchronous event source, polled from the main loop.
///
/// No reader thread exists, so nothing competes with an ssh child for
/// stdin: while the child owns the terminal the loop simply does not call
/// `next`, and `drain` discards whatever queued up in the meantime.
pub struct EventSource {
    tick_rate: Duration,
    next_tick: Instant,
}

impl EventSource {
    pub fn new(tick_rate_ms: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate_ms);
        Self {
            tick_rate,
            next_tick: Instant::now() + tick_rate,
        }
    }

    /// Block until a key press arrives or the tick deadline passes.
    /// Resizes surface as an immediate tick so the next draw sees the new
    /// dimensions.
    pub fn next(&mut self) -> Result<AppEvent> {
        loop {
            let now = Instant::now();
            if now >= self.next_tick {
                self.next_tick = now + self.tick_rate;
                return Ok(AppEvent::Tick);
            }

            if event::poll(self.next_tick - now)? {
                match event::read()? {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        return Ok(AppEvent::Key(key));
                    }
                    CrosstermEvent::Resize(..) => return Ok(AppEvent::Tick),
                    _ => {}
                }
            }
        }
    }

    /// Throw away pending input and restart the tick clock. Called after an
    /// ssh child exits, so stray keystrokes typed at it do not drive the
    /// list.
    pub fn drain(&mut self) -> Result<()> {
        while event::poll(Duration::ZERO)? {
            let _ = event::read()?;
        }
        self.next_tick = Instant::now() + self.tick_rate;
        Ok(())
    }
}

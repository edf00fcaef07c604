//! Terminal management
//!
//! Raw mode, alternate screen and mouse capture are switched on in `enter`
//! and always switched off again, either by `exit` or on drop (including
//! while unwinding from a panic).

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};

/// Fixed-rate tick schedule, independent of how much input arrives
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    rate: Duration,
    last: Instant,
}

impl TickClock {
    pub fn new(rate: Duration, now: Instant) -> Self {
        Self { rate, last: now }
    }

    /// Time left until the next tick is due
    pub fn timeout(&self, now: Instant) -> Duration {
        self.rate.saturating_sub(now.saturating_duration_since(self.last))
    }

    /// Whether a tick is due at `now`; starts the next interval when it is
    pub fn take_tick(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.rate {
            self.last = now;
            true
        } else {
            false
        }
    }
}

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    clock: TickClock,
    entered: bool,
}

impl Tui {
    pub fn new(tick_rate: Duration) -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            clock: TickClock::new(tick_rate, Instant::now()),
            entered: false,
        })
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;
        self.entered = true;
        self.terminal.clear()?;
        Ok(())
    }

    /// Restore the terminal; does nothing if it was never entered
    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        terminal::disable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            cursor::Show
        )?;
        Ok(())
    }

    /// Wait for input until the next tick is due
    ///
    /// `None` means nothing arrived in time. Key releases are dropped so that
    /// each key press produces exactly one action on every platform.
    pub fn next_event(&self) -> Result<Option<Event>> {
        if !event::poll(self.clock.timeout(Instant::now()))? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Press => Ok(None),
            other => Ok(Some(other)),
        }
    }

    /// Whether a tick is due, however busy the input stream is
    pub fn take_tick(&mut self) -> bool {
        self.clock.take_tick(Instant::now())
    }

    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            tracing::error!(error = %err, "failed to restore terminal");
        }
    }
}

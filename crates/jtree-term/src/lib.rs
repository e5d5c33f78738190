//! Terminal backend abstraction and crossterm implementation.
//!
//! Grounded near-verbatim in structure on `core-terminal/src/lib.rs`: a
//! small `TerminalBackend` trait, a `CrosstermBackend` implementation
//! that tracks whether it has entered raw mode so `enter`/`leave` are
//! idempotent, and a `TerminalGuard` RAII wrapper so the session-setup
//! code in `jtree-bin` can't forget to restore the terminal on an early
//! return or panic. Extended with `size`/`poll_event`/`read_event` since
//! this workspace's event loop (spec.md §5's two blocking-read suspension
//! points) lives directly on this backend rather than behind a channel.

pub mod capabilities;
pub use capabilities::TerminalCapabilities;

use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
};

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// `(columns, rows)`.
    fn size(&self) -> Result<(u16, u16)>;
    /// Block for up to `timeout` waiting for a terminal event; `None` on
    /// timeout. The two call sites that matter per spec.md §5 are the
    /// main navigation loop's idle wait and the line editor's keystroke
    /// wait — both go through this one blocking read.
    fn read_event(&self, timeout: Duration) -> Result<Option<Event>>;
}

pub struct CrosstermBackend {
    entered: bool,
}

pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
    active: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }

    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
            self.entered = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(stdout(), LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }

    fn read_event(&self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}

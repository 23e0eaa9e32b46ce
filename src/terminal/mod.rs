pub mod input;
pub mod render;

use std::io::{self, stdout, Stdout, Write};

use crossterm::{
    cursor::{Hide, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        self,
        Clear,
        ClearType,
        EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use log::warn;

/// Raw mode on an alternate screen, undone when dropped.
pub struct TerminalGuard<W: Write = Stdout> {
    out: W,
}

impl TerminalGuard {
    /// # Errors
    ///
    /// Fails if the terminal cannot be switched into raw mode.
    pub fn enter() -> io::Result<Self> {
        Self::enter_on(stdout())
    }
}

impl<W: Write> TerminalGuard<W> {
    /// Sets the terminal up, writing control sequences to `out`.
    ///
    /// Raw mode is switched on first. Once it is on the guard exists, so a
    /// failure while entering the alternate screen still restores everything.
    ///
    /// # Errors
    ///
    /// Fails if raw mode cannot be enabled or `out` cannot be written.
    pub fn enter_on(out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self { out };
        execute!(
            guard.out,
            EnterAlternateScreen,
            EnableMouseCapture,
            Hide,
            Clear(ClearType::All)
        )?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("failed to leave raw mode: {e}");
        }
        if let Err(e) =
            execute!(self.out, DisableMouseCapture, Show, LeaveAlternateScreen)
        {
            warn!("failed to restore the terminal: {e}");
        }
    }
}

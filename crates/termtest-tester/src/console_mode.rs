//! Read-only console mode inspection.
//!
//! On Unix the closest equivalent of an output console mode is the output
//! flag word of the terminal attributes attached to stdout (`c_oflag`:
//! `OPOST`, `ONLCR`, ...). On Windows it is the console mode of the standard
//! output handle. Other platforms report `Unsupported`.

use std::fmt;
use std::io::{self, Write};

use crate::error::{FixtureError, Result};

/// Raw console mode value as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleMode(pub u64);

impl fmt::Display for ConsoleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait ConsoleModeQuery {
    fn stdout_mode(&self) -> io::Result<ConsoleMode>;
}

/// Queries the process's real stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

#[cfg(unix)]
impl ConsoleModeQuery for StdoutConsole {
    fn stdout_mode(&self) -> io::Result<ConsoleMode> {
        let termios = rustix::termios::tcgetattr(io::stdout())?;
        Ok(ConsoleMode(u64::from(termios.output_modes.bits())))
    }
}

#[cfg(windows)]
impl ConsoleModeQuery for StdoutConsole {
    fn stdout_mode(&self) -> io::Result<ConsoleMode> {
        use crossterm_winapi::{ConsoleMode as WinConsoleMode, Handle, HandleType};

        let handle = Handle::new(HandleType::OutputHandle)?;
        let mode = WinConsoleMode::from(handle).mode()?;
        Ok(ConsoleMode(u64::from(mode)))
    }
}

#[cfg(not(any(unix, windows)))]
impl ConsoleModeQuery for StdoutConsole {
    fn stdout_mode(&self) -> io::Result<ConsoleMode> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "console mode queries are not supported on this platform",
        ))
    }
}

/// Print the current stdout console mode. A failed query is fatal.
pub fn report_console_mode<W: Write>(out: &mut W, query: &impl ConsoleModeQuery) -> Result<()> {
    let mode = query.stdout_mode().map_err(FixtureError::console_mode)?;
    tracing::debug!(%mode, "console mode queried");
    writeln!(out, "console mode: {mode}")?;
    out.flush()?;
    Ok(())
}

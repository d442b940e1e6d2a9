//! Wait-for-interrupt mode.
//!
//! Races a timer against the interrupt inbox. Whichever resolves first wins;
//! the calling thread is suspended for the whole wait.

use std::io::{self, Write};
use std::time::Duration;

use crate::interrupt::{Interrupt, InterruptSource};

pub const DEFAULT_SLEEP_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Exit status used when the wait is cut short by an interrupt.
pub const INTERRUPTED_EXIT_CODE: u8 = 123;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    TimedOut,
    Interrupted(Interrupt),
}

/// Line printed when the wait runs out without an interrupt.
#[must_use]
pub fn timeout_message(timeout: Duration) -> String {
    if timeout == DEFAULT_SLEEP_TIMEOUT {
        "returning after an hour, this will never happen".to_string()
    } else {
        format!("returning after {timeout:?}")
    }
}

pub fn wait_for_interrupt<W: Write>(
    out: &mut W,
    source: &mut impl InterruptSource,
    timeout: Duration,
) -> io::Result<WaitOutcome> {
    tracing::debug!(?timeout, "waiting for interrupt");
    let outcome = match source.wait_for(timeout) {
        Some(interrupt) => {
            writeln!(out, "received {interrupt}")?;
            WaitOutcome::Interrupted(interrupt)
        }
        None => {
            writeln!(out, "{}", timeout_message(timeout))?;
            WaitOutcome::TimedOut
        }
    };
    out.flush()?;
    Ok(outcome)
}

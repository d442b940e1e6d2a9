//! Sequential mode runner.
//!
//! ```text
//! marker → sleep? → console-mode? → fill-buffer? → stutter? → exit1?
//! ```
//!
//! An interrupt during the wait ends the run with status 123 and skips every
//! later mode. A failed console query propagates as an error. Interrupts that
//! arrive while other modes run stay in the inbox and are never consumed.

use std::io::Write;

use crate::config::FixtureConfig;
use crate::console_mode::{ConsoleModeQuery, report_console_mode};
use crate::error::Result;
use crate::fill_buffer::write_fill_buffer;
use crate::interrupt::{Interrupt, InterruptSource};
use crate::sleep::{INTERRUPTED_EXIT_CODE, WaitOutcome, wait_for_interrupt};
use crate::stutter::{STUTTER_DELAY, STUTTER_LINES, write_stutter};

/// Readiness line printed before any mode runs.
pub const MARKER_LINE: &str = "an expected string";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    ForcedExit,
    Interrupted(Interrupt),
}

impl Outcome {
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::ForcedExit => 1,
            Self::Interrupted(_) => INTERRUPTED_EXIT_CODE,
        }
    }
}

pub fn run_fixture<W: Write>(
    config: &FixtureConfig,
    out: &mut W,
    interrupts: &mut impl InterruptSource,
    console: &impl ConsoleModeQuery,
) -> Result<Outcome> {
    let modes = &config.modes;

    writeln!(out, "{MARKER_LINE}")?;
    out.flush()?;

    if modes.sleep
        && let WaitOutcome::Interrupted(interrupt) =
            wait_for_interrupt(out, interrupts, config.sleep_timeout)?
    {
        tracing::debug!(%interrupt, "wait interrupted");
        return Ok(Outcome::Interrupted(interrupt));
    }

    if modes.console_mode {
        report_console_mode(out, console)?;
    }

    if modes.fill_buffer {
        write_fill_buffer(out)?;
    }

    if modes.stutter {
        tracing::debug!("stuttering");
        write_stutter(out, STUTTER_LINES, STUTTER_DELAY)?;
    }

    if modes.exit1 {
        return Ok(Outcome::ForcedExit);
    }
    Ok(Outcome::Completed)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::Duration;

    use super::*;
    use crate::config::ModeSelection;
    use crate::console_mode::ConsoleMode;
    use crate::error::FixtureError;
    use crate::fill_buffer::LINE_LEN;
    use crate::interrupt::ManualInterrupts;

    struct FixedMode;

    impl ConsoleModeQuery for FixedMode {
        fn stdout_mode(&self) -> io::Result<ConsoleMode> {
            Ok(ConsoleMode(5))
        }
    }

    struct NoConsole;

    impl ConsoleModeQuery for NoConsole {
        fn stdout_mode(&self) -> io::Result<ConsoleMode> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "no console"))
        }
    }

    fn run(modes: ModeSelection, interrupts: &mut ManualInterrupts) -> (Result<Outcome>, String) {
        let config = FixtureConfig::new(modes).with_sleep_timeout(Duration::from_millis(10));
        let mut out = Vec::new();
        let result = run_fixture(&config, &mut out, interrupts, &FixedMode);
        (result, String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn no_modes_prints_only_marker() {
        let (result, out) = run(ModeSelection::default(), &mut ManualInterrupts::new());
        assert_eq!(result.unwrap(), Outcome::Completed);
        assert_eq!(out, "an expected string\n");
    }

    #[test]
    fn exit1_alone_prints_only_marker() {
        let modes = ModeSelection {
            exit1: true,
            ..ModeSelection::default()
        };
        let (result, out) = run(modes, &mut ManualInterrupts::new());
        let outcome = result.unwrap();
        assert_eq!(outcome, Outcome::ForcedExit);
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(out, "an expected string\n");
    }

    #[test]
    fn interrupted_wait_skips_later_modes() {
        let mut interrupts = ManualInterrupts::new();
        interrupts.trigger().trigger(Interrupt::USER);
        let modes = ModeSelection {
            sleep: true,
            fill_buffer: true,
            stutter: true,
            exit1: true,
            ..ModeSelection::default()
        };
        let (result, out) = run(modes, &mut interrupts);
        let outcome = result.unwrap();
        assert_eq!(outcome.exit_code(), 123);
        assert_eq!(out, "an expected string\nreceived interrupt\n");
    }

    #[test]
    fn timed_out_wait_continues() {
        let modes = ModeSelection {
            sleep: true,
            console_mode: true,
            ..ModeSelection::default()
        };
        let (result, out) = run(modes, &mut ManualInterrupts::new());
        assert_eq!(result.unwrap(), Outcome::Completed);
        assert_eq!(
            out,
            "an expected string\nreturning after 10ms\nconsole mode: 5\n"
        );
    }

    #[test]
    fn console_failure_preempts_exit1() {
        let modes = ModeSelection {
            console_mode: true,
            stutter: true,
            exit1: true,
            ..ModeSelection::default()
        };
        let config = FixtureConfig::new(modes);
        let mut out = Vec::new();
        let error = run_fixture(&config, &mut out, &mut ManualInterrupts::new(), &NoConsole)
            .expect_err("console failure is fatal");
        assert!(matches!(error, FixtureError::ConsoleMode { .. }));
        assert_eq!(error.exit_code(), 1);
        assert_eq!(out, b"an expected string\n");
    }

    #[test]
    fn all_output_modes_in_order() {
        let modes = ModeSelection {
            fill_buffer: true,
            stutter: true,
            exit1: true,
            ..ModeSelection::default()
        };
        let (result, out) = run(modes, &mut ManualInterrupts::new());
        assert_eq!(result.unwrap(), Outcome::ForcedExit);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 22);
        assert_eq!(lines[0], MARKER_LINE);
        assert_eq!(lines[1].len() + 1, LINE_LEN);
        assert_eq!(lines[2], "stuttered 1 times");
        assert_eq!(lines[21], "stuttered 20 times");
    }

    #[test]
    fn pending_interrupt_is_ignored_without_sleep() {
        let mut interrupts = ManualInterrupts::new();
        interrupts.trigger().trigger(Interrupt::USER);
        let (result, out) = run(ModeSelection::default(), &mut interrupts);
        assert_eq!(result.unwrap(), Outcome::Completed);
        assert_eq!(out, "an expected string\n");
    }
}

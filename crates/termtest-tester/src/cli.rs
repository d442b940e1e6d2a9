use std::ffi::OsString;
use std::io;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

use crate::config::FixtureConfig;
use crate::console_mode::StdoutConsole;
use crate::error::Result;
use crate::fixture::run_fixture;
use crate::interrupt;

#[derive(Debug, Parser)]
#[command(
    name = "tester",
    about = "Target process for terminal-automation harness tests",
    version
)]
pub struct Cli {
    /// Exit with status 1 after the other selected modes finish.
    #[arg(
        long = "exit1",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub exit1: bool,

    /// Wait for an hour, or until interrupted (exit status 123).
    #[arg(
        long = "sleep",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub sleep: bool,

    /// Print the current stdout console mode.
    #[arg(
        long = "console-mode",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub console_mode: bool,

    /// Print one 24001-byte line in a single write.
    #[arg(
        long = "fill-buffer",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub fill_buffer: bool,

    /// Print 20 lines with 50 ms pauses in between.
    #[arg(
        long = "stutter",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub stutter: bool,

    /// Arguments after the first non-flag; accepted and ignored.
    #[arg(hide = true, trailing_var_arg = true)]
    pub rest: Vec<OsString>,
}

/// Rewrite single-dash long flags (`-sleep`, `-exit1=true`) to their
/// double-dash form. Rewriting stops at `--` or the first non-flag argument.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut flags_done = false;

    for arg in args {
        if flags_done {
            normalized.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            flags_done = true;
            normalized.push(arg);
            continue;
        };
        if text == "--" || !text.starts_with('-') || text == "-" {
            flags_done = true;
            normalized.push(arg);
        } else if !text.starts_with("--") && text.len() > 2 {
            normalized.push(OsString::from(format!("-{text}")));
        } else {
            normalized.push(arg);
        }
    }

    normalized
}

pub fn run_from_env() -> Result<u8> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    run(cli)
}

/// Arm the interrupt listener and run the selected modes against the real
/// stdout. The listener is dropped before this returns, on every path.
pub fn run(cli: Cli) -> Result<u8> {
    let config = FixtureConfig::from_cli_and_env(&cli);
    tracing::debug!(modes = ?config.modes, "starting fixture");

    let mut listener = interrupt::arm()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = run_fixture(&config, &mut out, &mut listener, &StdoutConsole)?;
    tracing::debug!(?outcome, "fixture finished");
    Ok(outcome.exit_code())
}

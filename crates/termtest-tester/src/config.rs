use std::time::Duration;

use crate::cli::Cli;
use crate::sleep::DEFAULT_SLEEP_TIMEOUT;

/// Overrides the wait-mode timeout, in milliseconds.
pub const SLEEP_TIMEOUT_ENV: &str = "TERMTEST_SLEEP_TIMEOUT_MS";

/// Which behavior modes run, fixed once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeSelection {
    pub exit1: bool,
    pub sleep: bool,
    pub console_mode: bool,
    pub fill_buffer: bool,
    pub stutter: bool,
}

impl From<&Cli> for ModeSelection {
    fn from(cli: &Cli) -> Self {
        Self {
            exit1: cli.exit1,
            sleep: cli.sleep,
            console_mode: cli.console_mode,
            fill_buffer: cli.fill_buffer,
            stutter: cli.stutter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureConfig {
    pub modes: ModeSelection,
    pub sleep_timeout: Duration,
}

impl FixtureConfig {
    #[must_use]
    pub fn new(modes: ModeSelection) -> Self {
        Self {
            modes,
            sleep_timeout: DEFAULT_SLEEP_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_sleep_timeout(mut self, timeout: Duration) -> Self {
        self.sleep_timeout = timeout;
        self
    }

    #[must_use]
    pub fn from_cli_and_env(cli: &Cli) -> Self {
        let timeout = parse_sleep_timeout(std::env::var(SLEEP_TIMEOUT_ENV).ok().as_deref());
        Self::new(ModeSelection::from(cli)).with_sleep_timeout(timeout)
    }
}

/// Zero, empty, or unparsable values keep the default hour.
#[must_use]
pub fn parse_sleep_timeout(value: Option<&str>) -> Duration {
    value
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .and_then(|ms| {
            if ms == 0 {
                None
            } else {
                Some(Duration::from_millis(ms))
            }
        })
        .unwrap_or(DEFAULT_SLEEP_TIMEOUT)
}

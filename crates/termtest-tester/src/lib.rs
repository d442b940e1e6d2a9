#![forbid(unsafe_code)]

//! Controllable target process for terminal-automation harnesses.
//!
//! The `tester` binary prints a fixed readiness line and then runs any
//! selected behavior modes in a fixed order: wait for an interrupt, report
//! the console mode, fill a large buffer in one write, and stutter paced
//! lines. See [`fixture`] for the sequencing and exit-status rules.

pub mod cli;
pub mod config;
pub mod console_mode;
pub mod error;
pub mod fill_buffer;
pub mod fixture;
pub mod interrupt;
pub mod logging;
pub mod sleep;
pub mod stutter;

pub use cli::run_from_env;
pub use config::{FixtureConfig, ModeSelection};
pub use error::{FixtureError, Result};
pub use fixture::{MARKER_LINE, Outcome, run_fixture};

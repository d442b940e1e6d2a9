use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FixtureError>;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Could not get console mode: {source}")]
    ConsoleMode {
        #[source]
        source: io::Error,
    },

    #[error("could not subscribe to interrupt signals: {source}")]
    SignalSetup {
        #[source]
        source: io::Error,
    },
}

impl FixtureError {
    /// Process exit status reported for this failure.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Io(_) | Self::ConsoleMode { .. } | Self::SignalSetup { .. } => 1,
        }
    }

    #[must_use]
    pub fn console_mode(source: io::Error) -> Self {
        Self::ConsoleMode { source }
    }
}

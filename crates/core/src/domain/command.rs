//! Commands sent to the audio server's control shell
//!
//! The core never spawns processes itself; it formats a [`PacmdCommand`] and
//! hands the resulting line to a [`CommandExecutor`].

use std::fmt;
use thiserror::Error;

/// Errors from running a control command
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The program could not be started (missing binary, permissions)
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but reported failure
    #[error("{program} {command:?} exited with {status}: {stderr}")]
    NonZeroExit {
        program: String,
        command: String,
        status: String,
        stderr: String,
    },

    #[error("{program} produced non-UTF-8 output")]
    InvalidUtf8 { program: String },
}

/// Runs one control command line and returns its standard output.
///
/// Calls block until the command finishes. Implementations must not retry:
/// mutating commands are not safe to repeat blindly.
pub trait CommandExecutor {
    fn run(&self, command: &str) -> Result<String, ExecutorError>;
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for &E {
    fn run(&self, command: &str) -> Result<String, ExecutorError> {
        (**self).run(command)
    }
}

/// Control commands understood by `pacmd`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacmdCommand {
    ListSinks,
    ListSinkInputs,
    SetDefaultSink { sink: u32 },
    SetSinkVolume { sink: u32, volume: u32 },
    SetSinkMute { sink: u32, muted: bool },
    MoveSinkInput { input: u32, sink: u32 },
}

impl PacmdCommand {
    /// Whether the command changes server state
    pub fn is_mutation(&self) -> bool {
        !matches!(self, PacmdCommand::ListSinks | PacmdCommand::ListSinkInputs)
    }
}

impl fmt::Display for PacmdCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacmdCommand::ListSinks => write!(f, "list-sinks"),
            PacmdCommand::ListSinkInputs => write!(f, "list-sink-inputs"),
            PacmdCommand::SetDefaultSink { sink } => write!(f, "set-default-sink {sink}"),
            PacmdCommand::SetSinkVolume { sink, volume } => {
                write!(f, "set-sink-volume {sink} {volume}")
            }
            PacmdCommand::SetSinkMute { sink, muted } => write!(f, "set-sink-mute {sink} {muted}"),
            PacmdCommand::MoveSinkInput { input, sink } => {
                write!(f, "move-sink-input {input} {sink}")
            }
        }
    }
}

//! Shared fixtures for volumecontrol tests
//!
//! Captured `pacmd` dumps plus an executor that replays them and records every
//! command line it receives.

use std::cell::RefCell;
use std::collections::HashMap;
use volumecontrol_core::domain::command::{CommandExecutor, ExecutorError};

/// `pacmd list-sinks`: HDMI sink 0, analog sink 1 (default, muted)
pub const LIST_SINKS: &str = include_str!("../fixtures/list_sinks.txt");

/// `pacmd list-sinks` with a single sink and no default marker
pub const LIST_SINKS_NO_DEFAULT: &str = include_str!("../fixtures/list_sinks_no_default.txt");

/// `pacmd list-sink-inputs`: Firefox (17) on sink 1, mpv (23) on sink 0
pub const LIST_SINK_INPUTS: &str = include_str!("../fixtures/list_sink_inputs.txt");

/// `pacmd list-sink-inputs` with nothing playing
pub const LIST_SINK_INPUTS_EMPTY: &str = include_str!("../fixtures/list_sink_inputs_empty.txt");

/// Executor replaying canned output
///
/// Query commands without a canned response fail like a dead daemon would.
/// Any other command succeeds with empty output unless marked as failing.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    responses: HashMap<String, String>,
    failing: Vec<String>,
    issued: RefCell<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor serving the standard sink and sink-input fixtures
    pub fn with_fixtures() -> Self {
        Self::new()
            .respond("list-sinks", LIST_SINKS)
            .respond("list-sink-inputs", LIST_SINK_INPUTS)
    }

    pub fn respond(mut self, command: &str, output: &str) -> Self {
        self.responses.insert(command.to_string(), output.to_string());
        self
    }

    /// Make commands starting with `prefix` exit non-zero
    pub fn failing(mut self, prefix: &str) -> Self {
        self.failing.push(prefix.to_string());
        self
    }

    /// Every command line received, in order
    pub fn issued(&self) -> Vec<String> {
        self.issued.borrow().clone()
    }

    /// Received command lines that are not `list-*` queries
    pub fn mutations(&self) -> Vec<String> {
        self.issued
            .borrow()
            .iter()
            .filter(|command| !command.starts_with("list-"))
            .cloned()
            .collect()
    }

    fn failure(command: &str) -> ExecutorError {
        ExecutorError::NonZeroExit {
            program: "pacmd".to_string(),
            command: command.to_string(),
            status: "exit status: 1".to_string(),
            stderr: "No PulseAudio daemon running, or not running as session daemon.".to_string(),
        }
    }
}

impl CommandExecutor for RecordingExecutor {
    fn run(&self, command: &str) -> Result<String, ExecutorError> {
        self.issued.borrow_mut().push(command.to_string());

        if self.failing.iter().any(|prefix| command.starts_with(prefix.as_str())) {
            return Err(Self::failure(command));
        }
        match self.responses.get(command) {
            Some(output) => Ok(output.clone()),
            None if command.starts_with("list-") => Err(Self::failure(command)),
            None => Ok(String::new()),
        }
    }
}

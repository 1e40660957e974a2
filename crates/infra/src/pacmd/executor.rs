//! Synchronous `pacmd` executor

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};
use volumecontrol_core::domain::command::{CommandExecutor, ExecutorError};

/// Runs control commands through the `pacmd` binary
#[derive(Debug, Clone)]
pub struct PacmdExecutor {
    binary: PathBuf,
}

impl PacmdExecutor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for PacmdExecutor {
    fn default() -> Self {
        Self::new("pacmd")
    }
}

impl CommandExecutor for PacmdExecutor {
    fn run(&self, command: &str) -> Result<String, ExecutorError> {
        let program = self.binary.display().to_string();
        debug!(program = %program, command, "Spawning control command");

        let output = Command::new(&self.binary)
            .args(command.split_whitespace())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ExecutorError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(
                program = %program,
                command,
                status = %output.status,
                stderr = %stderr,
                "Control command failed"
            );
            return Err(ExecutorError::NonZeroExit {
                program,
                command: command.to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        String::from_utf8(output.stdout).map_err(|_| ExecutorError::InvalidUtf8 { program })
    }
}

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::core::command::BitsCommand;
use crate::core::error::{BitsError, Result};

pub const DEFAULT_PROGRAM: &str = "bitsadmin";

/// The single boundary to the transfer service: run a command, hand back its text.
pub trait Executor: Send + Sync {
    fn execute(&self, command: &BitsCommand) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitsConfig {
    pub program: PathBuf,
}

impl Default for BitsConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
        }
    }
}

impl BitsConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// Runs bitsadmin as a child process and waits for it.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    config: BitsConfig,
}

impl ProcessExecutor {
    pub fn new(config: BitsConfig) -> Self {
        Self { config }
    }

    pub fn program(&self) -> &std::path::Path {
        &self.config.program
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new(BitsConfig::default())
    }
}

impl Executor for ProcessExecutor {
    fn execute(&self, command: &BitsCommand) -> Result<String> {
        let program = self.config.program.display().to_string();
        debug!(%program, %command, "running bitsadmin");

        let mut cmd = Command::new(&self.config.program);
        cmd.args(command.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BitsError::BinaryNotFound {
                    program: program.clone(),
                }
            } else {
                BitsError::ProcessFailed {
                    exit_code: None,
                    output: e.to_string(),
                }
            }
        })?;

        let output = child.wait_with_output().map_err(|e| BitsError::ProcessFailed {
            exit_code: None,
            output: e.to_string(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();

        if output.status.success() {
            debug!(bytes = stdout.len(), "bitsadmin finished");
            Ok(stdout)
        } else {
            warn!(status = ?output.status.code(), %command, "bitsadmin exited with failure");
            let stderr = String::from_utf8_lossy(&output.stderr);
            let text = if stderr.trim().is_empty() {
                stdout
            } else {
                format!("{stdout}{stderr}")
            };
            Err(BitsError::ProcessFailed {
                exit_code: output.status.code(),
                output: text,
            })
        }
    }
}

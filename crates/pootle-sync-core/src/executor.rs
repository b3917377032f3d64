use std::io::Read;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::command::Invocation;

/// What a finished command left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Interleaved stdout and stderr bytes.
    pub output: Vec<u8>,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CapturedOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Last `max_lines` lines of output, decoded lossily.
    pub fn tail(&self, max_lines: usize) -> String {
        let text = String::from_utf8_lossy(&self.output);
        let lines: Vec<&str> = text.lines().collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("i/o error while running '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs one invocation to completion and hands back its merged output.
///
/// Implementations must block until the command has exited. A non-zero exit is not
/// an error; callers decide what to do with [`CapturedOutput::exit_code`].
pub trait CommandExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<CapturedOutput, ExecError>;
}

/// Spawns the program directly with its arguments, no shell in between.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<CapturedOutput, ExecError> {
        let program = &invocation.program;
        let io_err = |source: std::io::Error| ExecError::Io {
            program: program.clone(),
            source,
        };

        let (mut reader, writer) = std::io::pipe().map_err(io_err)?;
        let stderr_writer = writer.try_clone().map_err(io_err)?;

        // The builder holds write ends of the pipe; it must be gone before reading
        // or `read_to_end` never sees EOF.
        let mut child = Command::new(program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr_writer)
            .spawn()
            .map_err(|source| ExecError::Spawn {
                program: program.clone(),
                source,
            })?;

        let mut output = Vec::new();
        reader.read_to_end(&mut output).map_err(io_err)?;
        let status = child.wait().map_err(io_err)?;

        debug!(
            "{} exited with {} ({} bytes captured)",
            invocation,
            status,
            output.len()
        );

        Ok(CapturedOutput {
            output,
            exit_code: status.code(),
        })
    }
}

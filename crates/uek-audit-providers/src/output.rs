// crates/uek-audit-providers/src/output.rs
// ============================================================================
// Module: Process Output Handling
// Description: Bounded process capture and conversion into command results.
// Purpose: Apply one exit-status and size policy across executors.
// Dependencies: uek-audit-core
// ============================================================================

//! ## Overview
//! POSIX shells report 127 when a command is missing and 126 when it cannot
//! be executed. Both, plus signal termination, are execution errors. All other
//! exit statuses are ordinary results for matchers to judge.
//!
//! Each stream is read through a `take(limit + 1)` window while the process
//! runs. Once either stream crosses the limit the process is killed and the
//! command fails with [`ExecError::OutputTooLarge`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Read;
use std::process::Child;
use std::process::Command;
use std::process::Stdio;
use std::thread;

use uek_audit_core::CommandResult;
use uek_audit_core::ExecError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Shell exit status for a command that cannot be executed.
const EXIT_NOT_EXECUTABLE: i32 = 126;
/// Shell exit status for a command that was not found.
const EXIT_NOT_FOUND: i32 = 127;

// ============================================================================
// SECTION: Conversion
// ============================================================================

/// Maps an exit code to a usable status or an execution error.
pub(crate) fn classify_exit(command: &str, code: Option<i32>) -> Result<i32, ExecError> {
    match code {
        None => Err(ExecError::Terminated {
            command: command.to_string(),
        }),
        Some(EXIT_NOT_EXECUTABLE) => Err(ExecError::PermissionDenied {
            command: command.to_string(),
        }),
        Some(EXIT_NOT_FOUND) => Err(ExecError::NotFound {
            command: command.to_string(),
        }),
        Some(code) => Ok(code),
    }
}

/// Streams captured from a process that ran within the output limit.
pub(crate) struct CapturedOutput {
    /// Exit code, or `None` when terminated by a signal.
    pub(crate) code: Option<i32>,
    /// Captured standard output.
    pub(crate) stdout: Vec<u8>,
    /// Captured standard error.
    pub(crate) stderr: Vec<u8>,
}

impl CapturedOutput {
    /// Converts the capture into a command result.
    pub(crate) fn into_result(self, command: &str) -> Result<CommandResult, ExecError> {
        let exit_status = classify_exit(command, self.code)?;
        Ok(CommandResult {
            command: command.to_string(),
            stdout: String::from_utf8_lossy(&self.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&self.stderr).into_owned(),
            exit_status,
        })
    }
}

/// Spawns `process` with stdin closed and captures at most
/// `max_output_bytes` from each output stream.
pub(crate) fn run_bounded(
    command: &str,
    process: &mut Command,
    max_output_bytes: usize,
) -> Result<CapturedOutput, ExecError> {
    let mut child = process
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| spawn_error(command, &err))?;
    let window = u64::try_from(max_output_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let stderr_reader =
        child.stderr.take().map(|stream| thread::spawn(move || read_window(stream, window)));
    let stdout = match child.stdout.take() {
        Some(stream) => read_window(stream, window),
        None => Ok(Vec::new()),
    };
    let stdout = match stdout {
        Ok(stdout) if stdout.len() <= max_output_bytes => stdout,
        Ok(_) => {
            reap(&mut child);
            return Err(too_large(command, max_output_bytes));
        }
        Err(err) => {
            reap(&mut child);
            return Err(read_error(command, &err));
        }
    };
    let stderr = match stderr_reader.map(thread::JoinHandle::join) {
        None => Vec::new(),
        Some(Ok(Ok(stderr))) if stderr.len() <= max_output_bytes => stderr,
        Some(Ok(Ok(_))) => {
            reap(&mut child);
            return Err(too_large(command, max_output_bytes));
        }
        Some(Ok(Err(err))) => {
            reap(&mut child);
            return Err(read_error(command, &err));
        }
        Some(Err(_)) => {
            reap(&mut child);
            return Err(ExecError::Spawn {
                command: command.to_string(),
                message: "stderr reader panicked".to_string(),
            });
        }
    };
    let status = child.wait().map_err(|err| read_error(command, &err))?;
    Ok(CapturedOutput {
        code: status.code(),
        stdout,
        stderr,
    })
}

/// Reads a stream up to `window` bytes and releases it.
fn read_window(stream: impl Read, window: u64) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    stream.take(window).read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Kills and reaps a child whose output is no longer wanted.
fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Builds the output limit error.
fn too_large(command: &str, limit: usize) -> ExecError {
    ExecError::OutputTooLarge {
        command: command.to_string(),
        limit,
    }
}

/// Maps a failure while collecting process output.
fn read_error(command: &str, err: &io::Error) -> ExecError {
    ExecError::Spawn {
        command: command.to_string(),
        message: format!("failed to collect output: {err}"),
    }
}

/// Maps a spawn failure to an execution error.
pub(crate) fn spawn_error(command: &str, err: &io::Error) -> ExecError {
    match err.kind() {
        io::ErrorKind::NotFound => ExecError::NotFound {
            command: command.to_string(),
        },
        io::ErrorKind::PermissionDenied => ExecError::PermissionDenied {
            command: command.to_string(),
        },
        _ => ExecError::Spawn {
            command: command.to_string(),
            message: err.to_string(),
        },
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

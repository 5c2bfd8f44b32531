// crates/uek-audit-core/src/interfaces/mod.rs
// ============================================================================
// Module: UEK Audit Interfaces
// Description: Backend-agnostic command-execution interface.
// Purpose: Define the contract used by the evaluator to reach a host.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The evaluator reaches a host only through [`CommandExecutor`]. Local shells,
//! remote transports, and recorded fixtures implement it. An executor returns
//! a [`CommandResult`] whenever the command ran to completion, whatever its exit
//! status; [`ExecError`] is reserved for commands that could not run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::probe::CommandResult;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum bytes captured per output stream by process executors.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Command execution errors, distinct from assertion failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The command or its interpreter was not found.
    #[error("command not found: {command}")]
    NotFound {
        /// Command line that failed.
        command: String,
    },
    /// The command could not be executed due to permissions.
    #[error("permission denied: {command}")]
    PermissionDenied {
        /// Command line that failed.
        command: String,
    },
    /// The command was terminated by a signal.
    #[error("command terminated by signal: {command}")]
    Terminated {
        /// Command line that failed.
        command: String,
    },
    /// The process could not be spawned.
    #[error("failed to spawn `{command}`: {message}")]
    Spawn {
        /// Command line that failed.
        command: String,
        /// Underlying error message.
        message: String,
    },
    /// The remote transport failed before the command ran.
    #[error("transport failure for `{command}`: {message}")]
    Transport {
        /// Command line that failed.
        command: String,
        /// Underlying error message.
        message: String,
    },
    /// Captured output exceeded the configured limit.
    #[error("output of `{command}` exceeds {limit} bytes")]
    OutputTooLarge {
        /// Command line that failed.
        command: String,
        /// Configured byte limit.
        limit: usize,
    },
    /// The package manager query exited unsuccessfully.
    #[error("package query `{command}` exited with status {exit_status}")]
    QueryFailed {
        /// Command line that failed.
        command: String,
        /// Reported exit status.
        exit_status: i32,
    },
}

impl ExecError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::Terminated { .. } => "terminated",
            Self::Spawn { .. } => "spawn_failed",
            Self::Transport { .. } => "transport",
            Self::OutputTooLarge { .. } => "output_too_large",
            Self::QueryFailed { .. } => "query_failed",
        }
    }
}

// ============================================================================
// SECTION: Command Executor
// ============================================================================

/// Command-execution interface to an inspected host.
pub trait CommandExecutor {
    /// Runs a shell command to completion and captures its result.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] when the command could not run.
    fn execute(&self, command: &str) -> Result<CommandResult, ExecError>;

    /// Returns a short label describing the target host.
    fn target_label(&self) -> String;
}

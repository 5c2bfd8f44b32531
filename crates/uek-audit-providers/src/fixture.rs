// crates/uek-audit-providers/src/fixture.rs
// ============================================================================
// Module: Fixture Executor
// Description: Command executor answering from a recorded host snapshot.
// Purpose: Provide deterministic evaluation for tests and offline dry runs.
// Dependencies: uek-audit-core, serde, toml
// ============================================================================

//! ## Overview
//! A fixture is a TOML table of recorded commands:
//!
//! ```toml
//! [[package]]
//! name = "kernel-uek"
//! version = "5.15.0-200.131.27.el9uek"
//!
//! [[command]]
//! command = "yum repolist"
//! stdout = "ol9_UEKR7  Oracle Linux 9 UEK Release 7 (x86_64)\n"
//!
//! [[command]]
//! command = "rpm -qa | grep -i uek"
//! exit_status = 1
//! ```
//!
//! `[[package]]` rows are rendered into the response of the package listing
//! query so fixtures do not have to spell out the rpm query format. Commands
//! absent from the fixture fail as "not found", like a missing binary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use uek_audit_core::CommandExecutor;
use uek_audit_core::CommandResult;
use uek_audit_core::ExecError;
use uek_audit_core::PACKAGE_QUERY_COMMAND;

use crate::output::classify_exit;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum fixture file size in bytes.
const MAX_FIXTURE_FILE_SIZE: usize = 1024 * 1024;

// ============================================================================
// SECTION: Fixture Types
// ============================================================================

/// Execution failure recorded for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureFailure {
    /// The command is missing on the host.
    NotFound,
    /// The command cannot be executed.
    PermissionDenied,
    /// The command was killed by a signal.
    Terminated,
}

/// Recorded command response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureCommand {
    /// Command line as it will be executed.
    pub command: String,
    /// Recorded stdout.
    #[serde(default)]
    pub stdout: String,
    /// Recorded stderr.
    #[serde(default)]
    pub stderr: String,
    /// Recorded exit status.
    #[serde(default)]
    pub exit_status: i32,
    /// Optional execution failure replacing the response.
    #[serde(default)]
    pub failure: Option<FixtureFailure>,
}

/// Recorded installed package.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixturePackage {
    /// Package name.
    pub name: String,
    /// Package `version-release`.
    #[serde(default)]
    pub version: String,
}

/// Fixture file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureFile {
    /// Installed packages rendered into the package listing.
    #[serde(default, rename = "package")]
    pub packages: Vec<FixturePackage>,
    /// Recorded command responses.
    #[serde(default, rename = "command")]
    pub commands: Vec<FixtureCommand>,
}

/// Fixture loading errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// I/O failure while reading the fixture.
    #[error("fixture io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("fixture parse error: {0}")]
    Parse(String),
    /// Invalid fixture data.
    #[error("invalid fixture: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Executor answering commands from recorded responses.
#[derive(Debug, Clone)]
pub struct FixtureExecutor {
    /// Responses keyed by command line.
    responses: BTreeMap<String, FixtureCommand>,
    /// Label reported as the target.
    label: String,
}

impl FixtureExecutor {
    /// Creates an empty fixture executor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: BTreeMap::new(),
            label: "fixture".to_string(),
        }
    }

    /// Records a completed command response.
    #[must_use]
    pub fn with_response(
        mut self,
        command: impl Into<String>,
        stdout: impl Into<String>,
        exit_status: i32,
    ) -> Self {
        let command = command.into();
        self.responses.insert(
            command.trim().to_string(),
            FixtureCommand {
                command,
                stdout: stdout.into(),
                stderr: String::new(),
                exit_status,
                failure: None,
            },
        );
        self
    }

    /// Records an execution failure for a command.
    #[must_use]
    pub fn with_failure(mut self, command: impl Into<String>, failure: FixtureFailure) -> Self {
        let command = command.into();
        self.responses.insert(
            command.trim().to_string(),
            FixtureCommand {
                command,
                stdout: String::new(),
                stderr: String::new(),
                exit_status: 0,
                failure: Some(failure),
            },
        );
        self
    }

    /// Records the package listing for the given installed packages.
    #[must_use]
    pub fn with_packages(self, packages: &[FixturePackage]) -> Self {
        self.with_response(PACKAGE_QUERY_COMMAND, render_package_listing(packages), 0)
    }

    /// Builds an executor from parsed fixture contents.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Invalid`] when a command is empty or recorded twice.
    pub fn from_file(file: FixtureFile) -> Result<Self, FixtureError> {
        let mut executor = Self::new();
        if !file.packages.is_empty() {
            executor = executor.with_packages(&file.packages);
        }
        for entry in file.commands {
            let key = entry.command.trim().to_string();
            if key.is_empty() {
                return Err(FixtureError::Invalid("fixture command must be non-empty".to_string()));
            }
            if executor.responses.contains_key(&key) {
                return Err(FixtureError::Invalid(format!("duplicate fixture command: {key}")));
            }
            executor.responses.insert(key, entry);
        }
        Ok(executor)
    }

    /// Parses a fixture from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when the TOML is malformed or invalid.
    pub fn from_toml_str(content: &str) -> Result<Self, FixtureError> {
        let file: FixtureFile =
            toml::from_str(content).map_err(|err| FixtureError::Parse(err.to_string()))?;
        Self::from_file(file)
    }

    /// Loads a fixture file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when the file cannot be read, exceeds the size
    /// limit, or is invalid.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let bytes = fs::read(path).map_err(|err| FixtureError::Io(err.to_string()))?;
        if bytes.len() > MAX_FIXTURE_FILE_SIZE {
            return Err(FixtureError::Invalid("fixture file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| FixtureError::Invalid("fixture file must be utf-8".to_string()))?;
        let mut executor = Self::from_toml_str(content)?;
        executor.label = format!("fixture ({})", path.display());
        Ok(executor)
    }
}

impl Default for FixtureExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for FixtureExecutor {
    fn execute(&self, command: &str) -> Result<CommandResult, ExecError> {
        let Some(entry) = self.responses.get(command.trim()) else {
            return Err(ExecError::NotFound {
                command: command.to_string(),
            });
        };
        match entry.failure {
            Some(FixtureFailure::NotFound) => Err(ExecError::NotFound {
                command: command.to_string(),
            }),
            Some(FixtureFailure::PermissionDenied) => Err(ExecError::PermissionDenied {
                command: command.to_string(),
            }),
            Some(FixtureFailure::Terminated) => Err(ExecError::Terminated {
                command: command.to_string(),
            }),
            None => {
                let exit_status = classify_exit(command, Some(entry.exit_status))?;
                Ok(CommandResult {
                    command: command.to_string(),
                    stdout: entry.stdout.clone(),
                    stderr: entry.stderr.clone(),
                    exit_status,
                })
            }
        }
    }

    fn target_label(&self) -> String {
        self.label.clone()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders packages in the package listing query format.
fn render_package_listing(packages: &[FixturePackage]) -> String {
    let mut listing = String::new();
    for package in packages {
        let _ = writeln!(listing, "{}\t{}", package.name, package.version);
    }
    listing
}

// crates/uek-audit-core/src/core/probe.rs
// ============================================================================
// Module: UEK Audit Probes
// Description: Probe definitions and the snapshots they produce.
// Purpose: Model package queries and shell commands as immutable results.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A probe is either a package query (names matching a regular expression) or a
//! shell command. Results are immutable snapshots captured once per check.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Probe Definitions
// ============================================================================

/// Host inspection performed for a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Probe {
    /// Installed packages whose name matches the `pattern` regular expression.
    Packages {
        /// Literal, unanchored package name pattern.
        pattern: String,
    },
    /// Shell command run through the command-execution interface.
    Command {
        /// Command line handed to the shell.
        command: String,
    },
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Packages {
                pattern,
            } => write!(f, "Packages /{pattern}/"),
            Self::Command {
                command,
            } => write!(f, "Command: `{command}`"),
        }
    }
}

// ============================================================================
// SECTION: Command Results
// ============================================================================

/// Captured result of a shell command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Command line as executed.
    pub command: String,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    #[serde(default)]
    pub stderr: String,
    /// Process exit status.
    pub exit_status: i32,
}

impl CommandResult {
    /// Builds a result with empty stderr.
    #[must_use]
    pub fn new(command: impl Into<String>, stdout: impl Into<String>, exit_status: i32) -> Self {
        Self {
            command: command.into(),
            stdout: stdout.into(),
            stderr: String::new(),
            exit_status,
        }
    }
}

// ============================================================================
// SECTION: Package Results
// ============================================================================

/// Installation status reported for a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    /// Package is installed on the host.
    Installed,
    /// Package is not installed.
    Absent,
}

impl PackageStatus {
    /// Returns the status label used by matchers and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single package row reported by the package manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    /// Package name.
    pub name: String,
    /// Version string (`version-release`), empty when unavailable.
    pub version: String,
    /// Status reported for this package.
    pub status: PackageStatus,
}

/// Snapshot of packages matching a name pattern.
///
/// # Invariants
/// - `status` is `Installed` iff at least one entry of `packages` is installed.
/// - `installed_versions` preserves package manager order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageQueryResult {
    /// Pattern the query was run with.
    pub package_name_pattern: String,
    /// Matching package rows in package manager order.
    pub packages: Vec<InstalledPackage>,
    /// Versions of the installed matches.
    pub installed_versions: Vec<String>,
    /// Aggregate status across matches.
    pub status: PackageStatus,
}

impl PackageQueryResult {
    /// Builds a query result from matched package rows.
    #[must_use]
    pub fn from_packages(pattern: impl Into<String>, packages: Vec<InstalledPackage>) -> Self {
        let installed_versions: Vec<String> = packages
            .iter()
            .filter(|package| package.status == PackageStatus::Installed)
            .map(|package| package.version.clone())
            .collect();
        let status = if installed_versions.is_empty() {
            PackageStatus::Absent
        } else {
            PackageStatus::Installed
        };
        Self {
            package_name_pattern: pattern.into(),
            packages,
            installed_versions,
            status,
        }
    }

    /// Returns the per-package statuses in order.
    #[must_use]
    pub fn statuses(&self) -> Vec<PackageStatus> {
        self.packages.iter().map(|package| package.status).collect()
    }
}

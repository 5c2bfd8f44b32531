// crates/uek-audit-core/src/core/catalog.rs
// ============================================================================
// Module: UEK Control Catalog
// Description: Built-in controls for UEK package and repository state.
// Purpose: Define the installed and not-installed controls as data.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The catalog holds two controls with the same three probes and inverted
//! expectations:
//! - packages matching `kernel-uek` and their statuses,
//! - `yum repolist` output and the `UEK` repository marker,
//! - `rpm -qa | grep -i uek` exit status.
//!
//! The repolist marker is matched case-sensitively while the grep probe is
//! case-insensitive; both are kept exactly as the controls were written.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::control::CheckSpec;
use crate::core::control::ControlSpec;
use crate::core::control::Matcher;
use crate::core::control::Subject;
use crate::core::identifiers::ControlId;
use crate::core::probe::Probe;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Identifier of the control asserting UEK is installed.
pub const UEK_INSTALLED_CONTROL_ID: &str = "uek-kernel-installed";
/// Identifier of the control asserting UEK is absent.
pub const UEK_NOT_INSTALLED_CONTROL_ID: &str = "uek-kernel-not-installed";
/// Package name pattern for UEK kernel packages.
pub const UEK_PACKAGE_PATTERN: &str = "kernel-uek";
/// Repository listing command.
pub const REPOLIST_COMMAND: &str = "yum repolist";
/// Marker identifying UEK repositories in the repository listing.
pub const UEK_REPO_MARKER: &str = "UEK";
/// Installed-package grep command.
pub const RPM_GREP_COMMAND: &str = "rpm -qa | grep -i uek";
/// Package status label expected for installed packages.
pub const INSTALLED_STATUS: &str = "installed";

/// Exit status of grep when a line matched.
const GREP_MATCHED: i32 = 0;
/// Exit status of grep when nothing matched.
const GREP_NO_MATCH: i32 = 1;

// ============================================================================
// SECTION: Expected State
// ============================================================================

/// Kernel state a host is expected to be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedState {
    /// UEK installed and its repository enabled.
    #[default]
    Installed,
    /// UEK absent and its repository disabled.
    Absent,
}

impl ExpectedState {
    /// Returns the built-in control asserting this state.
    #[must_use]
    pub fn control(self) -> ControlSpec {
        match self {
            Self::Installed => uek_installed_control(),
            Self::Absent => uek_not_installed_control(),
        }
    }

    /// Returns the state label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::Absent => "absent",
        }
    }
}

// ============================================================================
// SECTION: Built-in Controls
// ============================================================================

/// Control asserting the UEK kernel is installed and UEK repos are enabled.
#[must_use]
pub fn uek_installed_control() -> ControlSpec {
    ControlSpec {
        id: ControlId::new(UEK_INSTALLED_CONTROL_ID),
        title: "Check if UEK kernel is installed and uek repos are enabled".to_string(),
        checks: vec![
            packages_check(Matcher::Cmp {
                value: INSTALLED_STATUS.to_string(),
            }),
            repolist_check(Matcher::Contains {
                value: UEK_REPO_MARKER.to_string(),
            }),
            grep_check(GREP_MATCHED),
        ],
    }
}

/// Control asserting the UEK kernel is not installed and UEK repos are disabled.
#[must_use]
pub fn uek_not_installed_control() -> ControlSpec {
    ControlSpec {
        id: ControlId::new(UEK_NOT_INSTALLED_CONTROL_ID),
        title: "Check if UEK kernel is not installed and uek repos are disabled".to_string(),
        checks: vec![
            packages_check(Matcher::NotCmp {
                value: INSTALLED_STATUS.to_string(),
            }),
            repolist_check(Matcher::NotContains {
                value: UEK_REPO_MARKER.to_string(),
            }),
            grep_check(GREP_NO_MATCH),
        ],
    }
}

/// Returns all built-in controls in catalog order.
#[must_use]
pub fn builtin_controls() -> Vec<ControlSpec> {
    vec![uek_installed_control(), uek_not_installed_control()]
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the package status check.
fn packages_check(matcher: Matcher) -> CheckSpec {
    CheckSpec {
        probe: Probe::Packages {
            pattern: UEK_PACKAGE_PATTERN.to_string(),
        },
        subject: Subject::Statuses,
        matcher,
    }
}

/// Builds the repository listing check.
fn repolist_check(matcher: Matcher) -> CheckSpec {
    CheckSpec {
        probe: Probe::Command {
            command: REPOLIST_COMMAND.to_string(),
        },
        subject: Subject::Stdout,
        matcher,
    }
}

/// Builds the grep exit status check.
fn grep_check(exit_status: i32) -> CheckSpec {
    CheckSpec {
        probe: Probe::Command {
            command: RPM_GREP_COMMAND.to_string(),
        },
        subject: Subject::ExitStatus,
        matcher: Matcher::Eq {
            value: exit_status,
        },
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

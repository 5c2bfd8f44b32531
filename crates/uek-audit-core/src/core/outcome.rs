// crates/uek-audit-core/src/core/outcome.rs
// ============================================================================
// Module: UEK Audit Outcomes
// Description: Assertion, control, and run level evaluation results.
// Purpose: Aggregate assertion results for reporting and exit code mapping.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Outcomes are created once per evaluation and discarded after the report is
//! emitted. A control's status is the conjunction of its assertions; any
//! execution error dominates failures so that hard failures stay visible.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ControlId;

// ============================================================================
// SECTION: Exit Codes
// ============================================================================

/// Exit code when every assertion passed.
const EXIT_PASSED: u8 = 0;
/// Exit code when at least one assertion failed.
const EXIT_FAILED: u8 = 1;
/// Exit code when at least one probe could not be executed.
const EXIT_ERROR: u8 = 2;

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Result of a single assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssertionStatus {
    /// Expected condition held.
    Passed,
    /// Expected condition did not hold.
    Failed {
        /// Summary of the observed value.
        actual: String,
    },
    /// Probe could not be executed.
    Error {
        /// Stable error kind label.
        kind: String,
        /// Error message.
        message: String,
    },
}

/// Assertion description paired with its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionOutcome {
    /// Human-readable assertion description.
    pub description: String,
    /// Assertion result.
    #[serde(flatten)]
    pub status: AssertionStatus,
}

impl AssertionOutcome {
    /// Returns true when the assertion passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.status, AssertionStatus::Passed)
    }
}

// ============================================================================
// SECTION: Controls
// ============================================================================

/// Aggregate status of a control or run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStatus {
    /// All assertions passed.
    Passed,
    /// At least one assertion failed and none errored.
    Failed,
    /// At least one probe could not be executed.
    Error,
}

impl ControlStatus {
    /// Returns the status label used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Error => "error",
        }
    }

    /// Returns the process exit code associated with the status.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Passed => EXIT_PASSED,
            Self::Failed => EXIT_FAILED,
            Self::Error => EXIT_ERROR,
        }
    }

    /// Combines two statuses, keeping the more severe one.
    #[must_use]
    pub const fn worst(self, other: Self) -> Self {
        match (self, other) {
            (Self::Error, _) | (_, Self::Error) => Self::Error,
            (Self::Failed, _) | (_, Self::Failed) => Self::Failed,
            _ => Self::Passed,
        }
    }
}

impl fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assertion tallies for a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutcomeCounts {
    /// Passed assertions.
    pub passed: usize,
    /// Failed assertions.
    pub failed: usize,
    /// Errored assertions.
    pub errored: usize,
}

/// Evaluation result of one control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlOutcome {
    /// Control identifier.
    pub control_id: ControlId,
    /// Control title.
    pub title: String,
    /// Ordered assertion results.
    pub assertions: Vec<AssertionOutcome>,
    /// Aggregate status.
    pub status: ControlStatus,
}

impl ControlOutcome {
    /// Builds an outcome, deriving the aggregate status from the assertions.
    #[must_use]
    pub fn from_assertions(
        control_id: ControlId,
        title: impl Into<String>,
        assertions: Vec<AssertionOutcome>,
    ) -> Self {
        let status = assertions.iter().fold(ControlStatus::Passed, |status, assertion| {
            let next = match assertion.status {
                AssertionStatus::Passed => ControlStatus::Passed,
                AssertionStatus::Failed { .. } => ControlStatus::Failed,
                AssertionStatus::Error { .. } => ControlStatus::Error,
            };
            status.worst(next)
        });
        Self {
            control_id,
            title: title.into(),
            assertions,
            status,
        }
    }

    /// Returns true when every assertion passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == ControlStatus::Passed
    }

    /// Returns assertion tallies.
    #[must_use]
    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for assertion in &self.assertions {
            match assertion.status {
                AssertionStatus::Passed => counts.passed += 1,
                AssertionStatus::Failed { .. } => counts.failed += 1,
                AssertionStatus::Error { .. } => counts.errored += 1,
            }
        }
        counts
    }
}

// ============================================================================
// SECTION: Run Report
// ============================================================================

/// Report for a single run over one or more controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Label of the inspected target.
    pub target: String,
    /// Control outcomes in evaluation order.
    pub controls: Vec<ControlOutcome>,
    /// Aggregate status across controls.
    pub status: ControlStatus,
}

impl RunReport {
    /// Builds a report, deriving the aggregate status from the controls.
    #[must_use]
    pub fn new(target: impl Into<String>, controls: Vec<ControlOutcome>) -> Self {
        let status = controls
            .iter()
            .fold(ControlStatus::Passed, |status, control| status.worst(control.status));
        Self {
            target: target.into(),
            controls,
            status,
        }
    }

    /// Returns the process exit code for the run.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.status.exit_code()
    }
}

// ============================================================================
// SECTION: Host State
// ============================================================================

/// Kernel state inferred from the installed and absent controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostState {
    /// UEK is installed and its repository enabled.
    Installed,
    /// UEK is absent and its repository disabled.
    Absent,
    /// Neither control fully passed.
    Inconsistent,
    /// A probe could not be executed.
    Indeterminate,
}

impl HostState {
    /// Classifies a host from the outcomes of the two opposing controls.
    #[must_use]
    pub fn classify(installed: &ControlOutcome, absent: &ControlOutcome) -> Self {
        if installed.status == ControlStatus::Error || absent.status == ControlStatus::Error {
            return Self::Indeterminate;
        }
        match (installed.passed(), absent.passed()) {
            (true, false) => Self::Installed,
            (false, true) => Self::Absent,
            _ => Self::Inconsistent,
        }
    }

    /// Returns the state label used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::Absent => "absent",
            Self::Inconsistent => "inconsistent",
            Self::Indeterminate => "indeterminate",
        }
    }

    /// Returns the process exit code associated with the state.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Installed | Self::Absent => EXIT_PASSED,
            Self::Inconsistent => EXIT_FAILED,
            Self::Indeterminate => EXIT_ERROR,
        }
    }
}

/// Host state together with the outcomes it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStateReport {
    /// Label of the inspected target.
    pub target: String,
    /// Inferred state.
    pub state: HostState,
    /// Outcome of the installed control.
    pub installed: ControlOutcome,
    /// Outcome of the absent control.
    pub absent: ControlOutcome,
}

impl HostStateReport {
    /// Builds a report and classifies the host.
    #[must_use]
    pub fn new(target: impl Into<String>, installed: ControlOutcome, absent: ControlOutcome) -> Self {
        let state = HostState::classify(&installed, &absent);
        Self {
            target: target.into(),
            state,
            installed,
            absent,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assertion(status: AssertionStatus) -> AssertionOutcome {
        AssertionOutcome {
            description: "probe".to_string(),
            status,
        }
    }

    fn failed() -> AssertionStatus {
        AssertionStatus::Failed {
            actual: "x".to_string(),
        }
    }

    fn errored() -> AssertionStatus {
        AssertionStatus::Error {
            kind: "not_found".to_string(),
            message: "missing".to_string(),
        }
    }

    #[test]
    fn control_status_is_conjunction_of_assertions() {
        let outcome = ControlOutcome::from_assertions(
            ControlId::new("c"),
            "t",
            vec![assertion(AssertionStatus::Passed), assertion(failed())],
        );
        assert_eq!(outcome.status, ControlStatus::Failed);
        assert_eq!(
            outcome.counts(),
            OutcomeCounts {
                passed: 1,
                failed: 1,
                errored: 0
            }
        );
    }

    #[test]
    fn execution_errors_dominate_failures() {
        let outcome = ControlOutcome::from_assertions(
            ControlId::new("c"),
            "t",
            vec![assertion(failed()), assertion(errored()), assertion(AssertionStatus::Passed)],
        );
        assert_eq!(outcome.status, ControlStatus::Error);
        assert_eq!(outcome.status.exit_code(), 2);
    }

    #[test]
    fn empty_run_passes() {
        let report = RunReport::new("local", Vec::new());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn host_state_requires_exactly_one_passing_control() {
        let pass = ControlOutcome::from_assertions(
            ControlId::new("a"),
            "t",
            vec![assertion(AssertionStatus::Passed)],
        );
        let fail = ControlOutcome::from_assertions(ControlId::new("b"), "t", vec![assertion(failed())]);
        let error =
            ControlOutcome::from_assertions(ControlId::new("c"), "t", vec![assertion(errored())]);

        assert_eq!(HostState::classify(&pass, &fail), HostState::Installed);
        assert_eq!(HostState::classify(&fail, &pass), HostState::Absent);
        assert_eq!(HostState::classify(&fail, &fail), HostState::Inconsistent);
        assert_eq!(HostState::classify(&pass, &error), HostState::Indeterminate);
    }

    #[test]
    fn assertion_status_serializes_flat() {
        let value = serde_json::to_value(assertion(failed())).unwrap_or_default();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["actual"], "x");
        assert_eq!(value["description"], "probe");
    }
}

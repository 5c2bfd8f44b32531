// crates/uek-audit-core/src/core/mod.rs
// ============================================================================
// Module: UEK Audit Core Types
// Description: Data model for probes, controls, and evaluation outcomes.
// Purpose: Group the serializable types shared by evaluator, config, and CLI.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types are plain data: probe snapshots, declarative control specs, the
//! built-in UEK catalog, and the outcomes produced by a single evaluation run.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod control;
pub mod identifiers;
pub mod outcome;
pub mod probe;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::ExpectedState;
pub use catalog::INSTALLED_STATUS;
pub use catalog::RPM_GREP_COMMAND;
pub use catalog::REPOLIST_COMMAND;
pub use catalog::UEK_INSTALLED_CONTROL_ID;
pub use catalog::UEK_NOT_INSTALLED_CONTROL_ID;
pub use catalog::UEK_PACKAGE_PATTERN;
pub use catalog::UEK_REPO_MARKER;
pub use catalog::builtin_controls;
pub use catalog::uek_installed_control;
pub use catalog::uek_not_installed_control;
pub use control::CheckSpec;
pub use control::ControlSpec;
pub use control::ControlSpecError;
pub use control::Matcher;
pub use control::Subject;
pub use identifiers::ControlId;
pub use outcome::AssertionOutcome;
pub use outcome::AssertionStatus;
pub use outcome::ControlOutcome;
pub use outcome::ControlStatus;
pub use outcome::HostState;
pub use outcome::HostStateReport;
pub use outcome::OutcomeCounts;
pub use outcome::RunReport;
pub use probe::CommandResult;
pub use probe::InstalledPackage;
pub use probe::PackageQueryResult;
pub use probe::PackageStatus;
pub use probe::Probe;

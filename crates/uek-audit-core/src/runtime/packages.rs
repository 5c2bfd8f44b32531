// crates/uek-audit-core/src/runtime/packages.rs
// ============================================================================
// Module: Package Inventory
// Description: RPM package listing query and parsing.
// Purpose: Convert package manager output into a package query snapshot.
// Dependencies: crate::{core, interfaces}, regex
// ============================================================================

//! ## Overview
//! Package probes run a single RPM listing through the command executor and
//! keep rows whose name matches the probe pattern, an unanchored regular
//! expression. Every listed row is an
//! installed package. A non-zero exit from the listing is an execution
//! failure, never an empty inventory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;

use crate::core::probe::CommandResult;
use crate::core::probe::InstalledPackage;
use crate::core::probe::PackageQueryResult;
use crate::core::probe::PackageStatus;
use crate::interfaces::ExecError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Command listing installed packages as `name<TAB>version-release` rows.
pub const PACKAGE_QUERY_COMMAND: &str = "rpm -qa --queryformat '%{NAME}\\t%{VERSION}-%{RELEASE}\\n'";

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses the package listing and keeps packages whose name matches `pattern`.
///
/// # Errors
///
/// Returns [`ExecError::QueryFailed`] when the listing exited unsuccessfully.
pub fn parse_package_listing(
    pattern: &Regex,
    listing: &CommandResult,
) -> Result<PackageQueryResult, ExecError> {
    if listing.exit_status != 0 {
        return Err(ExecError::QueryFailed {
            command: listing.command.clone(),
            exit_status: listing.exit_status,
        });
    }
    let packages = listing
        .stdout
        .lines()
        .filter_map(parse_row)
        .filter(|package| pattern.is_match(&package.name))
        .collect();
    Ok(PackageQueryResult::from_packages(pattern.as_str(), packages))
}

/// Parses a single listing row.
fn parse_row(line: &str) -> Option<InstalledPackage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (name, version) = line.split_once('\t').unwrap_or((line, ""));
    Some(InstalledPackage {
        name: name.trim().to_string(),
        version: version.trim().to_string(),
        status: PackageStatus::Installed,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

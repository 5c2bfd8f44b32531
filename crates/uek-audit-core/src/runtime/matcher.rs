// crates/uek-audit-core/src/runtime/matcher.rs
// ============================================================================
// Module: UEK Audit Matcher Logic
// Description: Matcher evaluation against probe subject values.
// Purpose: Decide whether a single assertion holds.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Matchers compare one subject value: package statuses, command stdout, or
//! exit status. Stdout matchers and package patterns are unanchored regular
//! expressions. A matcher applied to a subject of the wrong type, or carrying
//! a pattern that does not compile, yields a [`MatchError`] so the evaluator
//! can report it as an error rather than a silent pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use thiserror::Error;

use crate::core::control::Matcher;
use crate::core::probe::PackageStatus;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum characters of stdout echoed into a failure summary.
const MAX_SUMMARY_CHARS: usize = 160;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a matcher cannot produce a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The matcher does not apply to the subject value type.
    #[error("matcher does not apply to the subject value")]
    SubjectMismatch,
    /// The pattern is not a valid regular expression.
    #[error("invalid pattern /{pattern}/: {message}")]
    InvalidPattern {
        /// Offending pattern.
        pattern: String,
        /// Compiler diagnostic.
        message: String,
    },
}

impl MatchError {
    /// Returns the stable error kind label used in reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SubjectMismatch => "invalid_check",
            Self::InvalidPattern { .. } => "invalid_pattern",
        }
    }
}

/// Compiles a package pattern or stdout matcher value.
///
/// # Errors
///
/// Returns [`MatchError::InvalidPattern`] when the pattern does not compile.
pub fn compile_pattern(pattern: &str) -> Result<Regex, MatchError> {
    Regex::new(pattern).map_err(|err| MatchError::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}

// ============================================================================
// SECTION: Subject Values
// ============================================================================

/// Observed value of a check subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectValue<'a> {
    /// Per-package statuses.
    Statuses(&'a [PackageStatus]),
    /// Command standard output.
    Stdout(&'a str),
    /// Command exit status.
    ExitStatus(i32),
}

impl SubjectValue<'_> {
    /// Returns a short summary of the value for failure reports.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Statuses(statuses) => {
                let labels: Vec<&str> = statuses.iter().map(|status| status.as_str()).collect();
                format!("[{}]", labels.join(", "))
            }
            Self::Stdout(stdout) => {
                let trimmed = stdout.trim();
                let mut summary: String = trimmed.chars().take(MAX_SUMMARY_CHARS).collect();
                if trimmed.chars().count() > MAX_SUMMARY_CHARS {
                    summary.push_str("...");
                }
                summary
            }
            Self::ExitStatus(code) => code.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Matcher Evaluation
// ============================================================================

/// Evaluates a matcher against a subject value.
///
/// # Errors
///
/// Returns [`MatchError::SubjectMismatch`] when the matcher does not apply to
/// the value type and [`MatchError::InvalidPattern`] when a stdout pattern
/// does not compile.
pub fn evaluate_matcher(matcher: &Matcher, value: &SubjectValue<'_>) -> Result<bool, MatchError> {
    match (matcher, value) {
        (
            Matcher::Cmp {
                value: expected,
            },
            SubjectValue::Statuses(statuses),
        ) => Ok(any_status_equals(statuses, expected)),
        (
            Matcher::NotCmp {
                value: expected,
            },
            SubjectValue::Statuses(statuses),
        ) => Ok(!any_status_equals(statuses, expected)),
        (
            Matcher::Contains {
                value: pattern,
            },
            SubjectValue::Stdout(stdout),
        ) => Ok(compile_pattern(pattern)?.is_match(stdout)),
        (
            Matcher::NotContains {
                value: pattern,
            },
            SubjectValue::Stdout(stdout),
        ) => Ok(!compile_pattern(pattern)?.is_match(stdout)),
        (
            Matcher::Eq {
                value: expected,
            },
            SubjectValue::ExitStatus(actual),
        ) => Ok(actual == expected),
        (
            Matcher::Ne {
                value: expected,
            },
            SubjectValue::ExitStatus(actual),
        ) => Ok(actual != expected),
        _ => Err(MatchError::SubjectMismatch),
    }
}

/// Returns true when any status label equals `expected`, ignoring ASCII case.
fn any_status_equals(statuses: &[PackageStatus], expected: &str) -> bool {
    statuses.iter().any(|status| status.as_str().eq_ignore_ascii_case(expected.trim()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

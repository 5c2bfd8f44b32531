// crates/uek-audit-core/src/core/control.rs
// ============================================================================
// Module: UEK Audit Control Specs
// Description: Declarative control definitions and their validation.
// Purpose: Describe which probe each assertion inspects and what it expects.
// Dependencies: regex, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`ControlSpec`] is a named group of checks. Each [`CheckSpec`] pairs a
//! [`Probe`] with the [`Subject`] it inspects and the [`Matcher`] applied to it.
//! Specs are serializable so configuration can declare controls beyond the
//! built-in catalog.
//!
//! ## Invariants
//! - `statuses` is only valid on package probes; `stdout` and `exit_status`
//!   only on command probes.
//! - Matchers must fit the subject type (strings for statuses/stdout,
//!   integers for exit status).
//! - Package patterns and stdout matcher values are unanchored regular
//!   expressions and must compile.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ControlId;
use crate::core::probe::Probe;

// ============================================================================
// SECTION: Subjects and Matchers
// ============================================================================

/// Probe attribute inspected by a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    /// Per-package statuses of a package probe.
    Statuses,
    /// Standard output of a command probe.
    Stdout,
    /// Exit status of a command probe.
    ExitStatus,
}

impl Subject {
    /// Returns the subject label used in descriptions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Statuses => "statuses",
            Self::Stdout => "stdout",
            Self::ExitStatus => "exit_status",
        }
    }

    /// Returns true when the subject can be read from the probe.
    #[must_use]
    pub const fn applies_to(self, probe: &Probe) -> bool {
        match self {
            Self::Statuses => matches!(probe, Probe::Packages { .. }),
            Self::Stdout | Self::ExitStatus => matches!(probe, Probe::Command { .. }),
        }
    }
}

/// Expectation applied to a subject value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Matcher {
    /// At least one status equals `value` (case-insensitive).
    Cmp {
        /// Expected status label.
        value: String,
    },
    /// No status equals `value` (case-insensitive).
    NotCmp {
        /// Rejected status label.
        value: String,
    },
    /// Output matches the `value` pattern (case-sensitive).
    Contains {
        /// Required pattern.
        value: String,
    },
    /// Output does not match the `value` pattern (case-sensitive).
    NotContains {
        /// Forbidden pattern.
        value: String,
    },
    /// Exit status equals `value`.
    Eq {
        /// Expected exit status.
        value: i32,
    },
    /// Exit status differs from `value`.
    Ne {
        /// Rejected exit status.
        value: i32,
    },
}

impl Matcher {
    /// Returns true when the matcher can be applied to the subject.
    #[must_use]
    pub const fn fits(&self, subject: Subject) -> bool {
        match self {
            Self::Cmp { .. } | Self::NotCmp { .. } => matches!(subject, Subject::Statuses),
            Self::Contains { .. } | Self::NotContains { .. } => matches!(subject, Subject::Stdout),
            Self::Eq { .. } | Self::Ne { .. } => matches!(subject, Subject::ExitStatus),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cmp {
                value,
            } => write!(f, "should cmp == \"{value}\""),
            Self::NotCmp {
                value,
            } => write!(f, "should not cmp == \"{value}\""),
            Self::Contains {
                value,
            } => write!(f, "should match /{value}/"),
            Self::NotContains {
                value,
            } => write!(f, "should not match /{value}/"),
            Self::Eq {
                value,
            } => write!(f, "should eq {value}"),
            Self::Ne {
                value,
            } => write!(f, "should not eq {value}"),
        }
    }
}

// ============================================================================
// SECTION: Specs
// ============================================================================

/// Single assertion within a control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSpec {
    /// Probe whose result is inspected.
    pub probe: Probe,
    /// Attribute of the probe result.
    pub subject: Subject,
    /// Expectation on the attribute.
    pub matcher: Matcher,
}

impl CheckSpec {
    /// Returns the human-readable assertion description.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} {} {}", self.probe, self.subject.as_str(), self.matcher)
    }

    /// Returns the regular expressions carried by the probe and matcher.
    fn patterns(&self) -> impl Iterator<Item = &str> {
        let probe = match &self.probe {
            Probe::Packages {
                pattern,
            } => Some(pattern.as_str()),
            Probe::Command { .. } => None,
        };
        let matcher = match &self.matcher {
            Matcher::Contains {
                value,
            }
            | Matcher::NotContains {
                value,
            } => Some(value.as_str()),
            _ => None,
        };
        probe.into_iter().chain(matcher)
    }
}

/// Named group of assertions evaluated and reported as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSpec {
    /// Control identifier.
    pub id: ControlId,
    /// Human-readable title.
    pub title: String,
    /// Ordered checks.
    pub checks: Vec<CheckSpec>,
}

impl ControlSpec {
    /// Validates the control for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ControlSpecError`] when the control is empty or a check pairs
    /// a probe, subject, or matcher that do not fit together.
    pub fn validate(&self) -> Result<(), ControlSpecError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ControlSpecError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(ControlSpecError::EmptyTitle {
                control: self.id.clone(),
            });
        }
        if self.checks.is_empty() {
            return Err(ControlSpecError::NoChecks {
                control: self.id.clone(),
            });
        }
        for (index, check) in self.checks.iter().enumerate() {
            let empty_probe = match &check.probe {
                Probe::Packages {
                    pattern,
                } => pattern.trim().is_empty(),
                Probe::Command {
                    command,
                } => command.trim().is_empty(),
            };
            if empty_probe {
                return Err(ControlSpecError::EmptyProbe {
                    control: self.id.clone(),
                    index,
                });
            }
            if !check.subject.applies_to(&check.probe) {
                return Err(ControlSpecError::SubjectMismatch {
                    control: self.id.clone(),
                    index,
                    subject: check.subject.as_str(),
                });
            }
            if !check.matcher.fits(check.subject) {
                return Err(ControlSpecError::MatcherMismatch {
                    control: self.id.clone(),
                    index,
                    subject: check.subject.as_str(),
                });
            }
            for pattern in check.patterns() {
                if let Err(err) = Regex::new(pattern) {
                    return Err(ControlSpecError::InvalidPattern {
                        control: self.id.clone(),
                        index,
                        pattern: pattern.to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Control spec validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlSpecError {
    /// Control identifier is empty.
    #[error("control id must be non-empty")]
    EmptyId,
    /// Control title is empty.
    #[error("control {control} must have a title")]
    EmptyTitle {
        /// Offending control.
        control: ControlId,
    },
    /// Control declares no checks.
    #[error("control {control} must declare at least one check")]
    NoChecks {
        /// Offending control.
        control: ControlId,
    },
    /// Probe pattern or command is empty.
    #[error("control {control} check {index} has an empty probe")]
    EmptyProbe {
        /// Offending control.
        control: ControlId,
        /// Zero-based check index.
        index: usize,
    },
    /// Subject cannot be read from the probe.
    #[error("control {control} check {index}: subject {subject} does not apply to its probe")]
    SubjectMismatch {
        /// Offending control.
        control: ControlId,
        /// Zero-based check index.
        index: usize,
        /// Subject label.
        subject: &'static str,
    },
    /// Matcher cannot be applied to the subject.
    #[error("control {control} check {index}: matcher does not fit subject {subject}")]
    MatcherMismatch {
        /// Offending control.
        control: ControlId,
        /// Zero-based check index.
        index: usize,
        /// Subject label.
        subject: &'static str,
    },
    /// Package pattern or stdout matcher is not a valid regular expression.
    #[error("control {control} check {index}: invalid pattern /{pattern}/: {message}")]
    InvalidPattern {
        /// Offending control.
        control: ControlId,
        /// Zero-based check index.
        index: usize,
        /// Offending pattern.
        pattern: String,
        /// Compiler diagnostic.
        message: String,
    },
}

// ============================================================================
// SECTION: Tests
// ============================================================================

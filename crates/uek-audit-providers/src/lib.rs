// crates/uek-audit-providers/src/lib.rs
// ============================================================================
// Module: UEK Audit Providers
// Description: Built-in command executors for local, remote, and recorded hosts.
// Purpose: Implement the core command-execution interface.
// Dependencies: uek-audit-core, serde, toml
// ============================================================================

//! ## Overview
//! This crate ships the executors the CLI can point at a host:
//! - [`LocalShellExecutor`] runs commands through a local POSIX shell,
//! - [`SshExecutor`] runs them on a remote host through the `ssh` client,
//! - [`FixtureExecutor`] answers from a recorded table for tests and dry runs.
//!
//! Invariants:
//! - A command that ran to completion yields a result regardless of exit status.
//! - Spawn failures, exit statuses 126/127, and signal termination are
//!   execution errors, never results.
//! - Captured output is bounded by a byte limit while the process runs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod fixture;
pub mod local;
mod output;
pub mod ssh;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use fixture::FixtureCommand;
pub use fixture::FixtureError;
pub use fixture::FixtureExecutor;
pub use fixture::FixtureFailure;
pub use fixture::FixtureFile;
pub use fixture::FixturePackage;
pub use local::LocalShellConfig;
pub use local::LocalShellExecutor;
pub use ssh::SshConfig;
pub use ssh::SshExecutor;

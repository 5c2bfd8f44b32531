// crates/uek-audit-config/src/config.rs
// ============================================================================
// Module: UEK Audit Configuration
// Description: Configuration loading and validation for UEK audits.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: uek-audit-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the CLI, then `UEK_AUDIT_CONFIG`, then `uek-audit.toml`
//! in the working directory. Only the default file may be absent; an explicit
//! path that cannot be read is an error. Unknown keys are rejected.
//!
//! ```toml
//! [target]
//! transport = "ssh"
//!
//! [target.ssh]
//! host = "ol9.example.com"
//! user = "audit"
//!
//! [checks]
//! expect = "absent"
//!
//! [audit]
//! sink = "file"
//! path = "/var/log/uek-audit.jsonl"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use uek_audit_core::ControlId;
use uek_audit_core::ControlSpec;
use uek_audit_core::DEFAULT_MAX_OUTPUT_BYTES;
use uek_audit_core::ExpectedState;
use uek_audit_core::builtin_controls;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "uek-audit.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "UEK_AUDIT_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum allowed captured bytes per command stream.
pub(crate) const MAX_MAX_OUTPUT_BYTES: usize = 64 * 1024 * 1024;
/// Maximum number of extra ssh client options.
pub(crate) const MAX_SSH_OPTIONS: usize = 32;
/// Maximum length of an ssh host or user.
pub(crate) const MAX_SSH_NAME_LENGTH: usize = 255;
/// Maximum number of additional controls.
pub(crate) const MAX_EXTRA_CONTROLS: usize = 64;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// UEK audit configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UekAuditConfig {
    /// Target host configuration.
    #[serde(default)]
    pub target: TargetConfig,
    /// Default control selection.
    #[serde(default)]
    pub checks: ChecksConfig,
    /// Report output configuration.
    #[serde(default)]
    pub report: ReportConfig,
    /// Audit event sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Additional controls evaluated alongside the built-in ones.
    #[serde(default)]
    pub controls: Vec<ControlSpec>,
    /// Path the configuration was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl UekAuditConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path, env::var(CONFIG_ENV_VAR).ok())?;
        validate_path(&resolved.path)?;
        if !resolved.explicit && !resolved.path.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(&resolved.path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml_str(content)?;
        config.source_path = Some(resolved.path);
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.target.validate()?;
        self.audit.validate()?;
        validate_controls(&self.controls)
    }

    /// Returns the built-in controls followed by the configured ones.
    #[must_use]
    pub fn all_controls(&self) -> Vec<ControlSpec> {
        let mut controls = builtin_controls();
        controls.extend(self.controls.iter().cloned());
        controls
    }

    /// Selects the controls to evaluate.
    ///
    /// Explicit ids win; otherwise the control for `expect` (or the configured
    /// default expectation) is selected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an id names no known control.
    pub fn select_controls(
        &self,
        expect: Option<ExpectedState>,
        ids: &[ControlId],
    ) -> Result<Vec<ControlSpec>, ConfigError> {
        if ids.is_empty() {
            return Ok(vec![expect.unwrap_or(self.checks.expect).control()]);
        }
        let known = self.all_controls();
        ids.iter()
            .map(|id| {
                known
                    .iter()
                    .find(|control| &control.id == id)
                    .cloned()
                    .ok_or_else(|| ConfigError::Invalid(format!("unknown control: {id}")))
            })
            .collect()
    }
}

/// Transport used to reach the target host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Commands run through a local shell.
    #[default]
    Local,
    /// Commands run on a remote host through ssh.
    Ssh,
    /// Commands are answered from a recorded fixture.
    Fixture,
}

impl TransportKind {
    /// Returns the configuration label of the transport.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Ssh => "ssh",
            Self::Fixture => "fixture",
        }
    }
}

/// Target host configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Transport selection.
    #[serde(default)]
    pub transport: TransportKind,
    /// Shell used by the local transport.
    #[serde(default)]
    pub shell: Option<String>,
    /// Maximum captured bytes per command stream.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
    /// Remote host settings for the ssh transport.
    #[serde(default)]
    pub ssh: Option<SshTargetConfig>,
    /// Fixture file for the fixture transport.
    #[serde(default)]
    pub fixture_path: Option<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Local,
            shell: None,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            ssh: None,
            fixture_path: None,
        }
    }
}

impl TargetConfig {
    /// Validates target settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_output_bytes == 0 || self.max_output_bytes > MAX_MAX_OUTPUT_BYTES {
            return Err(ConfigError::Invalid(format!(
                "target.max_output_bytes must be between 1 and {MAX_MAX_OUTPUT_BYTES}"
            )));
        }
        if let Some(shell) = &self.shell {
            validate_path_string("target.shell", shell)?;
        }
        if let Some(fixture_path) = &self.fixture_path {
            validate_path_string("target.fixture_path", fixture_path)?;
        }
        if let Some(ssh) = &self.ssh {
            ssh.validate()?;
        }
        match self.transport {
            TransportKind::Local => Ok(()),
            TransportKind::Ssh if self.ssh.is_none() => Err(ConfigError::Invalid(
                "target.transport=ssh requires [target.ssh]".to_string(),
            )),
            TransportKind::Ssh => Ok(()),
            TransportKind::Fixture if self.fixture_path.is_none() => Err(ConfigError::Invalid(
                "target.transport=fixture requires target.fixture_path".to_string(),
            )),
            TransportKind::Fixture => Ok(()),
        }
    }
}

/// Remote host settings for the ssh transport.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SshTargetConfig {
    /// Remote host name or address.
    pub host: String,
    /// Optional remote user.
    #[serde(default)]
    pub user: Option<String>,
    /// Optional remote port.
    #[serde(default)]
    pub port: Option<u16>,
    /// Optional identity file.
    #[serde(default)]
    pub identity_file: Option<String>,
    /// Extra `-o Key=Value` client options.
    #[serde(default)]
    pub options: Vec<String>,
}

impl SshTargetConfig {
    /// Validates ssh settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_ssh_name("target.ssh.host", &self.host)?;
        if let Some(user) = &self.user {
            validate_ssh_name("target.ssh.user", user)?;
        }
        if self.port == Some(0) {
            return Err(ConfigError::Invalid("target.ssh.port must be non-zero".to_string()));
        }
        if let Some(identity_file) = &self.identity_file {
            validate_path_string("target.ssh.identity_file", identity_file)?;
        }
        if self.options.len() > MAX_SSH_OPTIONS {
            return Err(ConfigError::Invalid(format!(
                "target.ssh.options exceeds {MAX_SSH_OPTIONS} entries"
            )));
        }
        for option in &self.options {
            let well_formed = option
                .split_once('=')
                .is_some_and(|(key, _)| !key.is_empty() && !key.chars().any(char::is_whitespace));
            if !well_formed {
                return Err(ConfigError::Invalid(format!(
                    "target.ssh.options entry must be Key=Value: {option}"
                )));
            }
        }
        Ok(())
    }
}

/// Default control selection.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChecksConfig {
    /// Expected UEK state when no control is named.
    #[serde(default)]
    pub expect: ExpectedState,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Canonical JSON.
    Json,
}

/// Report output configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: ReportFormat,
}

/// Audit event sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Audit events are discarded.
    #[default]
    None,
}

/// Audit event sink configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.sink=file requires audit.path".to_string()))
            }
            (_, Some(path)) => validate_path_string("audit.path", path),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Config path and whether it was requested explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedPath {
    /// Resolved path.
    pub(crate) path: PathBuf,
    /// True when the path came from the CLI or the environment.
    pub(crate) explicit: bool,
}

/// Resolves the config path from CLI or environment defaults.
pub(crate) fn resolve_path(
    path: Option<&Path>,
    env_path: Option<String>,
) -> Result<ResolvedPath, ConfigError> {
    if let Some(path) = path {
        return Ok(ResolvedPath {
            path: path.to_path_buf(),
            explicit: true,
        });
    }
    if let Some(env_path) = env_path.filter(|value| !value.trim().is_empty()) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ResolvedPath {
            path: PathBuf::from(env_path),
            explicit: true,
        });
    }
    Ok(ResolvedPath {
        path: PathBuf::from(DEFAULT_CONFIG_NAME),
        explicit: false,
    })
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates an ssh host or user name.
fn validate_ssh_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_SSH_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if value.starts_with('-') || value.chars().any(|ch| ch.is_whitespace() || ch == '@') {
        return Err(ConfigError::Invalid(format!("{field} contains invalid characters")));
    }
    Ok(())
}

/// Validates additional controls against each other and the built-ins.
fn validate_controls(controls: &[ControlSpec]) -> Result<(), ConfigError> {
    if controls.len() > MAX_EXTRA_CONTROLS {
        return Err(ConfigError::Invalid(format!("controls exceeds {MAX_EXTRA_CONTROLS} entries")));
    }
    let builtin: BTreeSet<ControlId> =
        builtin_controls().into_iter().map(|control| control.id).collect();
    let mut seen = BTreeSet::new();
    for control in controls {
        control.validate().map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if builtin.contains(&control.id) {
            return Err(ConfigError::Invalid(format!(
                "control {} shadows a built-in control",
                control.id
            )));
        }
        if !seen.insert(control.id.clone()) {
            return Err(ConfigError::Invalid(format!("duplicate control id: {}", control.id)));
        }
    }
    Ok(())
}

/// Returns the default maximum captured bytes per stream.
const fn default_max_output_bytes() -> usize {
    DEFAULT_MAX_OUTPUT_BYTES
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn output_limit_defaults_to_executor_default() {
        assert_eq!(TargetConfig::default().max_output_bytes, DEFAULT_MAX_OUTPUT_BYTES);
        let config = UekAuditConfig::from_toml_str("[target]\ntransport = \"local\"\n").unwrap();
        assert_eq!(config.target.max_output_bytes, DEFAULT_MAX_OUTPUT_BYTES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_path_wins_over_environment() {
        let resolved =
            resolve_path(Some(Path::new("cli.toml")), Some("env.toml".to_string())).unwrap();
        assert_eq!(resolved.path, PathBuf::from("cli.toml"));
        assert!(resolved.explicit);
    }

    #[test]
    fn environment_path_is_explicit() {
        let resolved = resolve_path(None, Some("env.toml".to_string())).unwrap();
        assert_eq!(resolved.path, PathBuf::from("env.toml"));
        assert!(resolved.explicit);
    }

    #[test]
    fn default_path_is_optional() {
        let resolved = resolve_path(None, Some("  ".to_string())).unwrap();
        assert_eq!(
            resolved,
            ResolvedPath {
                path: PathBuf::from(DEFAULT_CONFIG_NAME),
                explicit: false,
            }
        );
    }

    #[test]
    fn overlong_environment_path_is_rejected() {
        let long = "a".repeat(MAX_TOTAL_PATH_LENGTH + 1);
        assert!(matches!(resolve_path(None, Some(long)), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn overlong_path_component_is_rejected() {
        let path = PathBuf::from("dir").join("b".repeat(MAX_PATH_COMPONENT_LENGTH + 1));
        assert!(validate_path(&path).is_err());
        assert!(validate_path(Path::new("dir/uek-audit.toml")).is_ok());
    }

    #[test]
    fn ssh_option_requires_key_value() {
        assert!(validate_ssh_name("host", "-oProxyCommand=x").is_err());
        let mut ssh = SshTargetConfig {
            host: "ol9".to_string(),
            user: None,
            port: None,
            identity_file: None,
            options: vec!["ConnectTimeout=5".to_string()],
        };
        assert!(ssh.validate().is_ok());
        ssh.options.push("ConnectTimeout 5".to_string());
        assert!(ssh.validate().is_err());
    }
}

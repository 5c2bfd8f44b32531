// crates/uek-audit-cli/src/main.rs
// ============================================================================
// Module: UEK Audit CLI Entry Point
// Description: Command dispatcher for UEK kernel compliance checks.
// Purpose: Evaluate UEK controls against a host and report the outcome.
// Dependencies: clap, uek-audit-core, uek-audit-config, uek-audit-providers, serde, thiserror.
// ============================================================================

//! ## Overview
//! The UEK audit CLI evaluates the built-in UEK controls (and any configured
//! extras) against the local host, a remote host over ssh, or a recorded
//! fixture. Reports go to stdout as text or canonical JSON; audit events go to
//! the configured sink and never to stdout. All user-facing strings are routed
//! through the i18n catalog.
//!
//! Exit codes: `0` when every assertion passed, `1` when an assertion failed,
//! `2` when a probe could not be executed or the CLI itself failed.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;
use uek_audit_cli::t;
use uek_audit_config::AuditConfig;
use uek_audit_config::AuditSinkKind;
use uek_audit_config::ReportFormat;
use uek_audit_config::TargetConfig;
use uek_audit_config::TransportKind;
use uek_audit_config::UekAuditConfig;
use uek_audit_core::AssertionStatus;
use uek_audit_core::AuditSink;
use uek_audit_core::CommandExecutor;
use uek_audit_core::ControlEvaluator;
use uek_audit_core::ControlId;
use uek_audit_core::ControlOutcome;
use uek_audit_core::ControlSpec;
use uek_audit_core::ExpectedState;
use uek_audit_core::FileAuditSink;
use uek_audit_core::HostState;
use uek_audit_core::HostStateReport;
use uek_audit_core::NoopAuditSink;
use uek_audit_core::RunReport;
use uek_audit_core::StderrAuditSink;
use uek_audit_providers::FixtureExecutor;
use uek_audit_providers::LocalShellConfig;
use uek_audit_providers::LocalShellExecutor;
use uek_audit_providers::SshConfig;
use uek_audit_providers::SshExecutor;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit code for CLI, configuration, and setup failures.
const EXIT_CLI_ERROR: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "uek-audit", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Config file path (defaults to uek-audit.toml or `UEK_AUDIT_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Answer commands from a fixture file instead of the configured target.
    #[arg(long, value_name = "PATH", global = true)]
    fixture: Option<PathBuf>,
    /// Report format (overrides `report.format`).
    #[arg(long, value_enum, value_name = "FORMAT", global = true)]
    format: Option<FormatArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate controls against the target.
    Check(CheckCommand),
    /// Report whether the target is in the installed or absent UEK state.
    Status,
    /// Control catalog utilities.
    Controls {
        /// Selected controls subcommand.
        #[command(subcommand)]
        command: ControlsCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for the check command.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Expected UEK state (overrides `checks.expect`).
    #[arg(long, value_enum, value_name = "STATE")]
    expect: Option<ExpectArg>,
    /// Control id to evaluate; repeatable. Overrides `--expect`.
    #[arg(long = "control", value_name = "ID")]
    controls: Vec<String>,
}

/// Controls subcommands.
#[derive(Subcommand, Debug)]
enum ControlsCommand {
    /// List known controls and their checks.
    List,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the configuration.
    Validate,
}

/// Report formats.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum FormatArg {
    /// Human-readable text.
    Text,
    /// Canonical JSON.
    Json,
}

/// Expected UEK states.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum ExpectArg {
    /// UEK kernel installed and UEK repositories enabled.
    Installed,
    /// UEK kernel not installed and UEK repositories disabled.
    Absent,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let config = load_config(cli.config.as_deref())?;
    let context = RunContext {
        format: resolve_format(cli.format, config.report.format),
        fixture: cli.fixture,
        config,
    };

    match command {
        Commands::Check(command) => command_check(&context, &command),
        Commands::Status => command_status(&context),
        Commands::Controls {
            command,
        } => command_controls(&context, &command),
        Commands::Config {
            command,
        } => command_config(&context, &command),
    }
}

/// Resolved inputs shared by all commands.
struct RunContext {
    /// Loaded configuration.
    config: UekAuditConfig,
    /// Effective report format.
    format: ReportFormat,
    /// Fixture override from the command line.
    fixture: Option<PathBuf>,
}

/// Prints the CLI help text.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Check + Status Commands
// ============================================================================

/// Executes the check command.
fn command_check(context: &RunContext, command: &CheckCommand) -> CliResult<ExitCode> {
    let ids: Vec<ControlId> = command.controls.iter().map(ControlId::new).collect();
    let controls = context
        .config
        .select_controls(command.expect.map(expected_state_from_arg), &ids)
        .map_err(|err| CliError::new(t!("check.selection_failed", error = err)))?;
    let executor = build_executor(&context.config.target, context.fixture.as_deref())?;
    let audit = build_audit_sink(&context.config.audit)?;
    let report = ControlEvaluator::new(executor.as_ref(), audit.as_ref()).run(&controls);

    match context.format {
        ReportFormat::Json => write_canonical_json(&report)?,
        ReportFormat::Text => write_stdout_text(&render_run_report_text(&report))?,
    }
    Ok(ExitCode::from(report.exit_code()))
}

/// Executes the status command.
fn command_status(context: &RunContext) -> CliResult<ExitCode> {
    let executor = build_executor(&context.config.target, context.fixture.as_deref())?;
    let audit = build_audit_sink(&context.config.audit)?;
    let report = ControlEvaluator::new(executor.as_ref(), audit.as_ref()).host_state();

    match context.format {
        ReportFormat::Json => write_canonical_json(&report)?,
        ReportFormat::Text => write_stdout_text(&render_host_state_text(&report))?,
    }
    Ok(ExitCode::from(report.state.exit_code()))
}

// ============================================================================
// SECTION: Controls + Config Commands
// ============================================================================

/// Dispatches controls subcommands.
fn command_controls(context: &RunContext, command: &ControlsCommand) -> CliResult<ExitCode> {
    match command {
        ControlsCommand::List => {
            let controls = context.config.all_controls();
            match context.format {
                ReportFormat::Json => write_canonical_json(&controls)?,
                ReportFormat::Text => write_stdout_text(&render_controls_text(&controls))?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Dispatches config subcommands.
fn command_config(context: &RunContext, command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => {
            let config = &context.config;
            let source = config.source_path.as_ref().map_or_else(
                || t!("config.validate.defaults"),
                |path| t!("config.validate.source", path = path.display()),
            );
            let lines = [
                t!("config.validate.ok"),
                source,
                t!("config.validate.transport", transport = config.target.transport.as_str()),
                t!("config.validate.controls", count = config.all_controls().len()),
            ];
            write_stdout_text(&lines.join("\n"))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// SECTION: Setup Helpers
// ============================================================================

/// Loads configuration from the resolved path.
fn load_config(path: Option<&Path>) -> CliResult<UekAuditConfig> {
    UekAuditConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Picks the report format, preferring the command line.
fn resolve_format(arg: Option<FormatArg>, configured: ReportFormat) -> ReportFormat {
    match arg {
        Some(FormatArg::Text) => ReportFormat::Text,
        Some(FormatArg::Json) => ReportFormat::Json,
        None => configured,
    }
}

/// Maps the CLI expectation to the core expected state.
const fn expected_state_from_arg(arg: ExpectArg) -> ExpectedState {
    match arg {
        ExpectArg::Installed => ExpectedState::Installed,
        ExpectArg::Absent => ExpectedState::Absent,
    }
}

/// Builds the command executor for the target.
fn build_executor(
    target: &TargetConfig,
    fixture: Option<&Path>,
) -> CliResult<Box<dyn CommandExecutor>> {
    if let Some(path) = fixture {
        return load_fixture(path);
    }
    match target.transport {
        TransportKind::Local => {
            let mut config = LocalShellConfig {
                max_output_bytes: target.max_output_bytes,
                ..LocalShellConfig::default()
            };
            if let Some(shell) = &target.shell {
                config.shell = PathBuf::from(shell);
            }
            Ok(Box::new(LocalShellExecutor::new(config)))
        }
        TransportKind::Ssh => {
            let Some(ssh) = &target.ssh else {
                return Err(CliError::new(t!("target.ssh_missing")));
            };
            let config = SshConfig {
                user: ssh.user.clone(),
                port: ssh.port,
                identity_file: ssh.identity_file.as_ref().map(PathBuf::from),
                options: ssh.options.clone(),
                max_output_bytes: target.max_output_bytes,
                ..SshConfig::new(ssh.host.clone())
            };
            Ok(Box::new(SshExecutor::new(config)))
        }
        TransportKind::Fixture => {
            let Some(path) = &target.fixture_path else {
                return Err(CliError::new(t!("target.fixture_missing")));
            };
            load_fixture(Path::new(path))
        }
    }
}

/// Loads a fixture executor from disk.
fn load_fixture(path: &Path) -> CliResult<Box<dyn CommandExecutor>> {
    let executor = FixtureExecutor::load(path).map_err(|err| {
        CliError::new(t!("target.fixture_failed", path = path.display(), error = err))
    })?;
    Ok(Box::new(executor))
}

/// Builds the configured audit sink.
fn build_audit_sink(audit: &AuditConfig) -> CliResult<Box<dyn AuditSink>> {
    match (audit.sink, &audit.path) {
        (AuditSinkKind::Stderr, _) => Ok(Box::new(StderrAuditSink)),
        (AuditSinkKind::File, Some(path)) => {
            let sink = FileAuditSink::new(Path::new(path)).map_err(|err| {
                CliError::new(t!("audit.open_failed", path = path, error = err))
            })?;
            Ok(Box::new(sink))
        }
        (AuditSinkKind::File, None) | (AuditSinkKind::None, _) => Ok(Box::new(NoopAuditSink)),
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a run report as text.
fn render_run_report_text(report: &RunReport) -> String {
    let mut lines = vec![t!("report.target", target = report.target)];
    for control in &report.controls {
        lines.push(String::new());
        render_control_text(control, &mut lines);
    }
    let passed = report.controls.iter().filter(|control| control.passed()).count();
    lines.push(String::new());
    lines.push(t!(
        "report.summary",
        passed = passed,
        total = report.controls.len(),
        status = report.status
    ));
    lines.join("\n")
}

/// Renders a host state report as text.
fn render_host_state_text(report: &HostStateReport) -> String {
    let detail = match report.state {
        HostState::Installed => t!("status.detail.installed"),
        HostState::Absent => t!("status.detail.absent"),
        HostState::Inconsistent => t!("status.detail.inconsistent"),
        HostState::Indeterminate => t!("status.detail.indeterminate"),
    };
    let mut lines = vec![
        t!("report.target", target = report.target),
        t!("status.state", state = report.state.as_str()),
        detail,
    ];
    for control in [&report.installed, &report.absent] {
        lines.push(String::new());
        render_control_text(control, &mut lines);
    }
    lines.join("\n")
}

/// Appends the text rendering of one control outcome.
fn render_control_text(control: &ControlOutcome, lines: &mut Vec<String>) {
    lines.push(t!("report.control.header", id = control.control_id, title = control.title));
    for assertion in &control.assertions {
        let line = match &assertion.status {
            AssertionStatus::Passed => {
                t!("report.assertion.passed", description = assertion.description)
            }
            AssertionStatus::Failed {
                actual,
            } => t!("report.assertion.failed", description = assertion.description, actual = actual),
            AssertionStatus::Error {
                kind,
                message,
            } => t!(
                "report.assertion.error",
                description = assertion.description,
                kind = kind,
                message = message
            ),
        };
        lines.push(line);
    }
    let counts = control.counts();
    lines.push(t!(
        "report.control.result",
        status = control.status,
        passed = counts.passed,
        failed = counts.failed,
        errored = counts.errored
    ));
}

/// Renders the control catalog as text.
fn render_controls_text(controls: &[ControlSpec]) -> String {
    let mut lines = Vec::new();
    for control in controls {
        lines.push(t!("controls.list.entry", id = control.id, title = control.title));
        for check in &control.checks {
            lines.push(t!("controls.list.check", description = check.description()));
        }
    }
    lines.join("\n")
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes rendered text to stdout.
fn write_stdout_text(text: &str) -> CliResult<()> {
    write_stdout_line(text).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a canonical JSON value to stdout.
fn write_canonical_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(value)
        .map_err(|err| CliError::new(t!("report.serialize_failed", error = err)))?;
    bytes.push(b'\n');
    let mut stdout = std::io::stdout();
    stdout.write_all(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns the CLI error exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(EXIT_CLI_ERROR)
}

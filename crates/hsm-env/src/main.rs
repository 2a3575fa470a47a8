// crates/hsm-env/src/main.rs
// ============================================================================
// Module: HSM Env CLI Entry Point
// Description: Resolves OpenSSL/SoftHSM harness variables and prints them.
// Purpose: Let shell-based harness steps consume the resolved settings.
// Dependencies: clap, hsm-env, serde_json, thiserror, tracing-subscriber.
// ============================================================================

//! ## Overview
//! `hsm-env` runs the same startup scan a harness process would, records the
//! exports instead of mutating its own environment, and prints the four
//! variables as `KEY=value` lines, `export` statements, or JSON.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::IsTerminal;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::ValueEnum;
use hsm_env::EnvMap;
use hsm_env::OpensslVar;
use hsm_env::OpensslVars;
use hsm_env::ScanError;
use hsm_env::read_env_strict;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Log filter used when `RUST_LOG` is unset and `--verbose` is off.
const DEFAULT_LOG_FILTER: &str = "warn";
/// Log filter used with `--verbose`.
const VERBOSE_LOG_FILTER: &str = "debug";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "hsm-env", version, about = "Resolve OpenSSL/SoftHSM harness variables")]
struct Cli {
    /// OpenSSL config to scan instead of `OPENSSL_CONF`.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Env)]
    format: OutputFormat,
    /// Emit debug trace lines on stderr.
    #[arg(long, short)]
    verbose: bool,
}

/// Rendering of the resolved variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `KEY=value` lines.
    Env,
    /// `export KEY='value'` lines for `eval`.
    Shell,
    /// Pretty-printed JSON object.
    Json,
}

/// CLI failures.
#[derive(Debug, Error)]
enum CliError {
    /// Resolving the variables failed.
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// JSON rendering failed.
    #[error("failed to render json: {0}")]
    Json(#[from] serde_json::Error),
    /// Writing to stdout failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Resolves the variables and prints them in the requested format.
fn run(cli: &Cli) -> Result<(), CliError> {
    let vars = resolve(cli.config.as_deref())?;
    let rendered = render(&vars, cli.format)?;
    let mut stdout = std::io::stdout();
    stdout.write_all(rendered.as_bytes())?;
    Ok(())
}

/// Runs the startup scan, honoring a `--config` override.
fn resolve(config: Option<&Path>) -> Result<OpensslVars, ScanError> {
    let mut sink = EnvMap::new();
    let Some(config) = config else {
        return OpensslVars::bootstrap(&mut sink);
    };
    let softhsm2_conf = read_env_strict(OpensslVar::Softhsm2Conf.as_str())?.unwrap_or_default();
    let openssl_conf = config
        .to_str()
        .ok_or_else(|| ScanError::Env(format!("--config path must be valid UTF-8: {}", config.display())))?;
    let mut vars = OpensslVars::from_values(openssl_conf, softhsm2_conf);
    vars.scan_config(config, &mut sink)?;
    Ok(vars)
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders every slot in `format`, newline terminated.
fn render(vars: &OpensslVars, format: OutputFormat) -> Result<String, serde_json::Error> {
    let mut out = match format {
        OutputFormat::Env => {
            vars.iter().map(|(var, value)| format!("{var}={value}")).collect::<Vec<_>>().join("\n")
        }
        OutputFormat::Shell => vars
            .iter()
            .map(|(var, value)| format!("export {var}={}", shell_quote(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(vars)?,
    };
    out.push('\n');
    Ok(out)
}

/// Wraps `value` in single quotes, escaping embedded quotes for POSIX shells.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Installs the stderr trace subscriber.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}

/// Writes an error line to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = writeln!(&mut stderr, "hsm-env: {message}");
    ExitCode::FAILURE
}

// crates/hsm-env/src/scan.rs
// ============================================================================
// Module: OpenSSL Config Scanner
// Description: Discovers engine and PKCS#11 module settings in an OpenSSL config.
// Purpose: Fill the slot store and export the values in one startup step.
// Dependencies: thiserror, tracing
// ============================================================================

//! ## Overview
//! [`OpensslVars::scan_config`] reads an OpenSSL configuration file line by
//! line and applies the `engine_id` and module path directives. A path that
//! does not name a regular file is the expected case on hosts without HSM
//! tooling and is a silent no-op. A file that exists but cannot be read is a
//! fatal startup error.
//!
//! Scans accumulate: a later scan overwrites only the keys it finds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::export::EnvSink;
use crate::line::Directive;
use crate::line::config_lines;
use crate::line::engine_arg;
use crate::vars::OpensslVar;
use crate::vars::OpensslVars;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Startup errors raised while resolving HSM settings.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The config file exists but could not be opened or read.
    #[error("openssl config io error: {0}")]
    Io(String),
    /// A startup environment variable is unusable.
    #[error("invalid environment: {0}")]
    Env(String),
}

// ============================================================================
// SECTION: Scanner
// ============================================================================

impl OpensslVars {
    /// Seeds the store from the environment and scans `OPENSSL_CONF` once.
    ///
    /// This is the single startup step; the returned store is treated as
    /// read-only afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] when the environment is not valid UTF-8 or the
    /// config file exists but cannot be read.
    pub fn bootstrap<S: EnvSink + ?Sized>(sink: &mut S) -> Result<Self, ScanError> {
        let mut vars = Self::from_env()?;
        let path = PathBuf::from(vars.openssl_conf());
        vars.scan_config(&path, sink)?;
        Ok(vars)
    }

    /// Scans the OpenSSL config at `path` for engine and module directives.
    ///
    /// Does nothing when `path` is empty or is not an existing regular file.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Io`] when the file exists but cannot be opened or
    /// read, including content that is not valid UTF-8.
    pub fn scan_config<S: EnvSink + ?Sized>(
        &mut self,
        path: impl AsRef<Path>,
        sink: &mut S,
    ) -> Result<(), ScanError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(());
        }
        debug!("parsing openssl config: {}", path.display());
        let text = fs::read_to_string(path).map_err(|err| io_error(path, &err))?;
        for line in config_lines(&text) {
            match Directive::parse(line) {
                Some(Directive::EngineId(id)) => {
                    self.assign(OpensslVar::EngineArg, engine_arg(id), sink);
                }
                Some(Directive::ModulePath(module)) => {
                    self.assign(OpensslVar::Softhsm2Module, module.to_string(), sink);
                }
                Some(Directive::Other) | None => {}
            }
        }
        Ok(())
    }

    /// Writes `value` to the slot and the sink together.
    fn assign<S: EnvSink + ?Sized>(&mut self, var: OpensslVar, value: String, sink: &mut S) {
        sink.set_var(var.as_str(), &value);
        debug!("{var} set to {value}");
        self.set(var, value);
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Formats an I/O failure with the offending path.
fn io_error(path: &Path, err: &std::io::Error) -> ScanError {
    ScanError::Io(format!("{}: {err}", path.display()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[path = "scan_tests.rs"]
mod scan_tests;

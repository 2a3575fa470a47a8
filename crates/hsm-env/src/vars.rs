// crates/hsm-env/src/vars.rs
// ============================================================================
// Module: OpenSSL Variable Slots
// Description: Typed store for the OpenSSL/SoftHSM harness variables.
// Purpose: Hold the four slots read at startup and updated by the scan.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The slot store holds four string values keyed by [`OpensslVar`]. The two
//! path slots are seeded from the process environment; the module path and
//! engine argument start empty and are filled in by
//! [`OpensslVars::scan_config`](crate::OpensslVars::scan_config).
//!
//! Environment values are read with strict UTF-8 enforcement. Invalid UTF-8
//! fails closed instead of being replaced lossily.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::scan::ScanError;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Keys of the harness variable slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpensslVar {
    /// Path of the OpenSSL configuration file to scan.
    OpensslConf,
    /// Path of the SoftHSM configuration file.
    Softhsm2Conf,
    /// PKCS#11 module path discovered in the OpenSSL configuration.
    Softhsm2Module,
    /// Engine selection flag (`-E <id>`) discovered in the OpenSSL configuration.
    EngineArg,
}

impl OpensslVar {
    /// Every slot, in declaration order.
    pub const ALL: [Self; 4] =
        [Self::OpensslConf, Self::Softhsm2Conf, Self::Softhsm2Module, Self::EngineArg];

    /// Slots mirrored into the environment of processes spawned by the harness.
    pub const EXPORTED: [Self; 3] = [Self::Softhsm2Conf, Self::Softhsm2Module, Self::EngineArg];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpensslConf => "OPENSSL_CONF",
            Self::Softhsm2Conf => "SOFTHSM2_CONF",
            Self::Softhsm2Module => "SOFTHSM2_MODULE",
            Self::EngineArg => "ENGINE_ARG",
        }
    }
}

impl std::fmt::Display for OpensslVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Slot Store
// ============================================================================

/// OpenSSL/SoftHSM settings shared with the rest of the harness.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OpensslVars {
    /// Raw OpenSSL config path (`OPENSSL_CONF`).
    #[serde(rename = "OPENSSL_CONF")]
    openssl_conf: String,
    /// SoftHSM config path (`SOFTHSM2_CONF`).
    #[serde(rename = "SOFTHSM2_CONF")]
    softhsm2_conf: String,
    /// PKCS#11 module path (`SOFTHSM2_MODULE`).
    #[serde(rename = "SOFTHSM2_MODULE")]
    softhsm2_module: String,
    /// Engine argument (`ENGINE_ARG`).
    #[serde(rename = "ENGINE_ARG")]
    engine_arg: String,
}

impl OpensslVars {
    /// Seeds the store from `OPENSSL_CONF` and `SOFTHSM2_CONF`.
    ///
    /// Unset variables yield empty strings.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Env`] when either variable is not valid UTF-8.
    pub fn from_env() -> Result<Self, ScanError> {
        let openssl_conf = read_env_strict(OpensslVar::OpensslConf.as_str())?.unwrap_or_default();
        let softhsm2_conf =
            read_env_strict(OpensslVar::Softhsm2Conf.as_str())?.unwrap_or_default();
        Ok(Self::from_values(openssl_conf, softhsm2_conf))
    }

    /// Builds a store from explicit path values without reading the environment.
    #[must_use]
    pub fn from_values(openssl_conf: impl Into<String>, softhsm2_conf: impl Into<String>) -> Self {
        Self {
            openssl_conf: openssl_conf.into(),
            softhsm2_conf: softhsm2_conf.into(),
            softhsm2_module: String::new(),
            engine_arg: String::new(),
        }
    }

    /// Returns the value held in `var`.
    #[must_use]
    pub fn get(&self, var: OpensslVar) -> &str {
        match var {
            OpensslVar::OpensslConf => &self.openssl_conf,
            OpensslVar::Softhsm2Conf => &self.softhsm2_conf,
            OpensslVar::Softhsm2Module => &self.softhsm2_module,
            OpensslVar::EngineArg => &self.engine_arg,
        }
    }

    /// Returns the OpenSSL config path.
    #[must_use]
    pub fn openssl_conf(&self) -> &str {
        &self.openssl_conf
    }

    /// Returns the SoftHSM config path.
    #[must_use]
    pub fn softhsm2_conf(&self) -> &str {
        &self.softhsm2_conf
    }

    /// Returns the PKCS#11 module path.
    #[must_use]
    pub fn softhsm2_module(&self) -> &str {
        &self.softhsm2_module
    }

    /// Returns the engine argument, e.g. `-E pkcs11`.
    #[must_use]
    pub fn engine_arg(&self) -> &str {
        &self.engine_arg
    }

    /// Iterates over every slot with its current value.
    pub fn iter(&self) -> impl Iterator<Item = (OpensslVar, &str)> {
        OpensslVar::ALL.into_iter().map(move |var| (var, self.get(var)))
    }

    /// Iterates over the exported slots with their current values.
    pub fn exports(&self) -> impl Iterator<Item = (OpensslVar, &str)> {
        OpensslVar::EXPORTED.into_iter().map(move |var| (var, self.get(var)))
    }

    /// Overwrites a slot. Only the scan writes slots, always paired with a sink write.
    pub(crate) fn set(&mut self, var: OpensslVar, value: String) {
        let slot = match var {
            OpensslVar::OpensslConf => &mut self.openssl_conf,
            OpensslVar::Softhsm2Conf => &mut self.softhsm2_conf,
            OpensslVar::Softhsm2Module => &mut self.softhsm2_module,
            OpensslVar::EngineArg => &mut self.engine_arg,
        };
        *slot = value;
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns [`ScanError::Env`] when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ScanError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| ScanError::Env(format!("{name} must be valid UTF-8")))
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[path = "vars_tests.rs"]
mod vars_tests;

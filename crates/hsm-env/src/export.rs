// crates/hsm-env/src/export.rs
// ============================================================================
// Module: Environment Propagation
// Description: Sinks that receive exported harness variables.
// Purpose: Keep process environment mutation in one place owned by startup.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The scan never touches the process environment directly. Each recognized
//! setting is written to the slot store and to an [`EnvSink`] in the same
//! step; the startup phase picks the sink:
//! - [`ProcessEnv`] mutates the OS environment so every child spawned later
//!   inherits the values.
//! - [`EnvMap`] records the assignments (dry runs, tests).
//!
//! [`OpensslVars::apply_to_command`] is the per-child alternative that leaves
//! the parent environment alone.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::process::Command;

use crate::vars::OpensslVars;

// ============================================================================
// SECTION: Sink Trait
// ============================================================================

/// Destination for exported environment variables.
pub trait EnvSink {
    /// Records `key=value`.
    fn set_var(&mut self, key: &str, value: &str);
}

// ============================================================================
// SECTION: Process Environment
// ============================================================================

/// Writes exported variables into the current process environment.
///
/// Only use this during single-threaded harness startup, before the harness
/// spawns worker threads. Children spawned later inherit the values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSink for ProcessEnv {
    fn set_var(&mut self, key: &str, value: &str) {
        env_mut::set_var(key, value);
    }
}

/// Raw process env writer.
mod env_mut {
    #![allow(unsafe_code, reason = "Harness startup exports variables to the process env.")]

    /// Sets an environment variable for the current process.
    pub fn set_var(key: &str, value: &str) {
        // SAFETY: Called only from `ProcessEnv`, which startup uses before spawning threads.
        unsafe {
            std::env::set_var(key, value);
        }
    }
}

// ============================================================================
// SECTION: Recorded Environment
// ============================================================================

/// Records exported variables in an ordered map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMap {
    /// Recorded assignments keyed by variable name.
    vars: BTreeMap<String, String>,
}

impl EnvMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Returns true when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterates over recorded assignments in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl EnvSink for EnvMap {
    fn set_var(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}

// ============================================================================
// SECTION: Child Environment Builder
// ============================================================================

impl OpensslVars {
    /// Sets the exported variables on `command` for a single child process.
    ///
    /// Empty slots are skipped so the child keeps whatever it would inherit.
    pub fn apply_to_command<'a>(&self, command: &'a mut Command) -> &'a mut Command {
        for (var, value) in self.exports() {
            if !value.is_empty() {
                command.env(var.as_str(), value);
            }
        }
        command
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[path = "export_tests.rs"]
mod export_tests;

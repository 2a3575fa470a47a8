// crates/hsm-env/src/test_support.rs
// ============================================================================
// Module: Unit Test Support
// Description: Shared environment guards and fixtures for unit tests.
// Purpose: Serialize process env mutation and restore it after each test.
// Dependencies: std, tempfile
// ============================================================================

//! ## Overview
//! Unit tests that read or write the process environment take [`env_lock`]
//! and hold an [`EnvGuard`] so previous values come back on drop.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use tempfile::NamedTempFile;

use crate::vars::OpensslVar;

/// Raw process env writers for tests.
pub mod env_mut {
    #![allow(unsafe_code, reason = "Tests mutate process env vars in a controlled scope.")]

    /// Sets an environment variable for the current process.
    pub fn set_var(key: &str, value: impl AsRef<std::ffi::OsStr>) {
        // SAFETY: Tests serialize environment mutation via a global lock.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    /// Removes an environment variable from the current process.
    pub fn remove_var(key: &str) {
        // SAFETY: Tests serialize environment mutation via a global lock.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

/// Serializes tests that touch the process environment.
pub fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Restores captured environment variables on drop.
pub struct EnvGuard {
    /// Captured names and their previous values.
    entries: Vec<(&'static str, Option<std::ffi::OsString>)>,
}

impl EnvGuard {
    /// Captures every harness variable.
    pub fn capture() -> Self {
        let entries = OpensslVar::ALL
            .iter()
            .map(|var| (var.as_str(), std::env::var_os(var.as_str())))
            .collect();
        Self {
            entries,
        }
    }

    /// Captures every harness variable, then clears them all.
    pub fn cleared() -> Self {
        let guard = Self::capture();
        for (name, _) in &guard.entries {
            env_mut::remove_var(name);
        }
        guard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.entries.drain(..) {
            match value {
                Some(value) => env_mut::set_var(name, value),
                None => env_mut::remove_var(name),
            }
        }
    }
}

/// Writes `contents` to a fresh temp file.
pub fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file.flush().expect("flush temp config");
    file
}

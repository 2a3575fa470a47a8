// crates/hsm-env/src/lib.rs
// ============================================================================
// Module: HSM Env Library
// Description: OpenSSL/PKCS#11 settings discovery for test harness startup.
// Purpose: Resolve engine and module settings once and propagate them.
// Dependencies: serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! `hsm-env` reads the OpenSSL configuration referenced by `OPENSSL_CONF` and
//! extracts the two settings an HSM-aware test harness cares about: the
//! engine identifier (exported as `ENGINE_ARG=-E <id>`) and the PKCS#11
//! module path (exported as `SOFTHSM2_MODULE`).
//!
//! The harness calls [`OpensslVars::bootstrap`] once at startup with the
//! [`EnvSink`] that should receive the exported values, then treats the
//! returned store as read-only. A missing config file is the common case and
//! leaves every slot untouched.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod export;
pub mod line;
pub mod scan;
pub mod vars;

#[cfg(test)]
mod test_support;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use export::EnvMap;
pub use export::EnvSink;
pub use export::ProcessEnv;
pub use line::Directive;
pub use line::split_assignment;
pub use scan::ScanError;
pub use vars::OpensslVar;
pub use vars::OpensslVars;
pub use vars::read_env_strict;

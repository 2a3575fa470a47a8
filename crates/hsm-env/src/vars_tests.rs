// crates/hsm-env/src/vars_tests.rs
// ============================================================================
// Module: Slot Store Unit Tests
// Description: Unit coverage for slot seeding and strict env parsing.
// Purpose: Ensure startup values come from the environment and fail closed.
// Dependencies: std, serde_json
// ============================================================================

//! ## Overview
//! Unit coverage for the slot store.
//! Invariants:
//! - Unset variables seed empty slots.
//! - Module path and engine argument never come from the environment.
//! - Tests restore environment state after each run.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use super::OpensslVar;
use super::OpensslVars;
use crate::test_support::EnvGuard;
use crate::test_support::env_lock;
use crate::test_support::env_mut;

#[test]
fn from_env_defaults_unset_slots_to_empty() {
    let _lock = env_lock();
    let _guard = EnvGuard::cleared();

    let vars = OpensslVars::from_env().expect("vars should load");
    for (var, value) in vars.iter() {
        assert_eq!(value, "", "{var} should default to empty");
    }
}

#[test]
fn from_env_reads_only_the_path_slots() {
    let _lock = env_lock();
    let _guard = EnvGuard::cleared();

    env_mut::set_var("OPENSSL_CONF", "/etc/ssl/openssl.cnf");
    env_mut::set_var("SOFTHSM2_CONF", "/etc/softhsm2.conf");
    env_mut::set_var("SOFTHSM2_MODULE", "/stale/module.so");
    env_mut::set_var("ENGINE_ARG", "-E stale");

    let vars = OpensslVars::from_env().expect("vars should load");
    assert_eq!(vars.openssl_conf(), "/etc/ssl/openssl.cnf");
    assert_eq!(vars.softhsm2_conf(), "/etc/softhsm2.conf");
    assert_eq!(vars.softhsm2_module(), "");
    assert_eq!(vars.engine_arg(), "");
}

#[cfg(unix)]
#[test]
fn from_env_rejects_non_utf8_values() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    use crate::ScanError;

    let _lock = env_lock();
    let _guard = EnvGuard::cleared();

    env_mut::set_var("OPENSSL_CONF", OsString::from_vec(vec![0x2f, 0xff, 0xfe]));
    let err = OpensslVars::from_env().expect_err("non-utf8 must fail closed");
    assert!(matches!(err, ScanError::Env(_)));
    assert!(err.to_string().contains("OPENSSL_CONF"));
}

#[test]
fn get_matches_named_accessors() {
    let vars = OpensslVars::from_values("/a.cnf", "/b.conf");
    assert_eq!(vars.get(OpensslVar::OpensslConf), vars.openssl_conf());
    assert_eq!(vars.get(OpensslVar::Softhsm2Conf), vars.softhsm2_conf());
    assert_eq!(vars.get(OpensslVar::Softhsm2Module), vars.softhsm2_module());
    assert_eq!(vars.get(OpensslVar::EngineArg), vars.engine_arg());
}

#[test]
fn exports_skip_the_raw_config_path() {
    let vars = OpensslVars::from_values("/a.cnf", "/b.conf");
    let names: Vec<&str> = vars.exports().map(|(var, _)| var.as_str()).collect();
    assert_eq!(names, ["SOFTHSM2_CONF", "SOFTHSM2_MODULE", "ENGINE_ARG"]);
}

#[test]
fn serializes_with_env_names() {
    let vars = OpensslVars::from_values("/a.cnf", "");
    let value = serde_json::to_value(&vars).expect("serialize");
    assert_eq!(value["OPENSSL_CONF"], "/a.cnf");
    assert_eq!(value["SOFTHSM2_CONF"], "");
    assert_eq!(value["SOFTHSM2_MODULE"], "");
    assert_eq!(value["ENGINE_ARG"], "");
}

// crates/hsm-env/src/line.rs
// ============================================================================
// Module: Config Line Tokenizer
// Description: Splits OpenSSL config lines into trimmed key/value pairs.
// Purpose: Recognize the engine and PKCS#11 module directives.
// Dependencies: std
// ============================================================================

//! ## Overview
//! OpenSSL configuration is treated as loosely line-oriented `key = value`
//! text. Lines end at `\n`, `\r` or `\r\n`. A line is split on its first `=` and both sides are trimmed; lines
//! without a separator are skipped. Sections, includes and comments are not
//! interpreted, they simply never produce a recognized key.

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Assignment separator.
const SEPARATOR: char = '=';
/// Characters that end a config line (`\n`, `\r`, and `\r\n` as a pair).
const LINE_BREAKS: [char; 2] = ['\r', '\n'];
/// Key naming the OpenSSL engine identifier.
pub const ENGINE_ID_KEY: &str = "engine_id";
/// Keys naming the PKCS#11 module path.
pub const MODULE_PATH_KEYS: [&str; 2] = ["MODULE_PATH", "pkcs11-module-path"];
/// Flag prepended to the engine identifier to form the engine argument.
pub const ENGINE_FLAG: &str = "-E";

// ============================================================================
// SECTION: Tokenizer
// ============================================================================

/// Splits config text into lines, ending a line at `\n`, `\r` or `\r\n`.
///
/// A `\r\n` pair yields an extra empty line, which never holds an assignment.
pub fn config_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(LINE_BREAKS)
}

/// Splits `line` on the first `=` and trims both sides.
///
/// Returns `None` when the line has no separator or nothing precedes it.
#[must_use]
pub fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(SEPARATOR)?;
    if key.is_empty() {
        return None;
    }
    Some((key.trim(), value.trim()))
}

// ============================================================================
// SECTION: Directives
// ============================================================================

/// Meaning of a parsed config line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `engine_id = <id>`.
    EngineId(&'a str),
    /// `MODULE_PATH = <path>` or `pkcs11-module-path = <path>`.
    ModulePath(&'a str),
    /// A line with a separator but an unrecognized key.
    Other,
}

impl<'a> Directive<'a> {
    /// Classifies an already split key/value pair.
    #[must_use]
    pub fn classify(key: &str, value: &'a str) -> Self {
        if key == ENGINE_ID_KEY {
            Self::EngineId(value)
        } else if MODULE_PATH_KEYS.contains(&key) {
            Self::ModulePath(value)
        } else {
            Self::Other
        }
    }

    /// Tokenizes and classifies a raw line; `None` when the line has no assignment.
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        split_assignment(line).map(|(key, value)| Self::classify(key, value))
    }
}

/// Formats the engine argument for an engine identifier.
#[must_use]
pub fn engine_arg(engine_id: &str) -> String {
    format!("{ENGINE_FLAG} {engine_id}")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[path = "line_tests.rs"]
mod line_tests;

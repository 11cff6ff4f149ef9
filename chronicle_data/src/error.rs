//! Error types for catalog parsing.

use thiserror::Error;

/// Failure to read a `stat:value` effect string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("effect '{0}' is missing the ':' separator")]
    MissingSeparator(String),
    #[error("effect value '{0}' is not an integer")]
    InvalidValue(String),
    #[error("'{0}' is not a stat that effects can modify")]
    UnknownStat(String),
}

/// Failure to parse a quest or item data file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("line {line}: expected 'KEY: value', found '{text}'")]
    MalformedLine { line: usize, text: String },
    #[error("line {line}: unknown field '{key}' in {kind} block")]
    UnknownField { line: usize, kind: &'static str, key: String },
    #[error("line {line}: field '{key}' appears twice in one {kind} block")]
    DuplicateField { line: usize, kind: &'static str, key: String },
    #[error("{kind} block starting at line {line} is missing field '{key}'")]
    MissingField { line: usize, kind: &'static str, key: &'static str },
    #[error("line {line}: '{value}' is not a valid number for {key}")]
    InvalidNumber { line: usize, key: &'static str, value: String },
    #[error("line {line}: invalid value for {key}: {reason}")]
    InvalidValue { line: usize, key: &'static str, reason: String },
    #[error("line {line}: bad effect: {source}")]
    InvalidEffect {
        line: usize,
        #[source]
        source: EffectError,
    },
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
    #[error("{kind} data is empty")]
    Empty { kind: &'static str },
}

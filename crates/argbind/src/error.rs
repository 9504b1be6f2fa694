use thiserror::Error;

use crate::value::ValueKind;

/// Raw value text that could not be turned into the slot's kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("'{0}' is not a valid bool")]
    InvalidBool(String),

    #[error("'{raw}' is not a valid {kind}")]
    InvalidNumber { raw: String, kind: &'static str },

    #[error("'{raw}' is not a '{delimiter}' separated {kind}")]
    MissingDelimiter {
        raw: String,
        delimiter: char,
        kind: ValueKind,
    },
}

/// Registration mistakes. These are programmer errors in the registry shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("empty name list")]
    EmptyNameSpec,

    #[error("empty name in '{0}'")]
    EmptyName(String),

    #[error("malformed name '{0}'")]
    MalformedName(String),

    #[error("'!{0}' negates a name that is not a flag")]
    NegatedNonFlag(String),

    #[error("name conflict: '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("flags must be bool or int, not {0}")]
    InvalidFlagKind(ValueKind),

    #[error("unknown value kind '{0}'")]
    UnknownKind(String),

    #[error("invalid default for {name}: {source}")]
    InvalidDefault {
        name: String,
        #[source]
        source: CoerceError,
    },
}

/// The first user-input error found while scanning argv.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid option -- {0}")]
    InvalidOption(String),

    #[error("option requires an argument -- {0}")]
    MissingArgument(String),

    #[error("unrecognized arguments: {0}")]
    Unrecognized(String),

    #[error("invalid value for {arg}: {source}")]
    InvalidValue {
        arg: String,
        #[source]
        source: CoerceError,
    },
}

/// A typed read asked for a different kind than the slot holds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name} holds {actual}, not {requested}")]
pub struct ValueError {
    pub name: String,
    pub actual: ValueKind,
    pub requested: ValueKind,
}

pub type SetupResult<T> = Result<T, SetupError>;
pub type ParseResult<T> = Result<T, ParseError>;

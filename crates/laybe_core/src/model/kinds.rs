//! Closed enumerations used by the graph model.
//!
//! Every value maps to a stable token identical to its symbolic name, both in
//! SQLite columns and on the JSON wire. Unknown tokens fail with `DecodeError`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Token outside the closed value set of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// Enumeration that rejected the token.
    pub enum_name: &'static str,
    /// Rejected raw token.
    pub token: String,
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} token `{}`", self.enum_name, self.token)
    }
}

impl Error for DecodeError {}

/// Shape of a proposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropositionType {
    /// Atomic statement carried in `text`.
    Single,
    /// Compound of two operand propositions joined by a connective.
    Connection,
}

/// Logical connective joining the two operands of a CONNECTION.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionType {
    Conjunction,
    Disjunction,
}

/// Inference relation between an argument's premise and conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArgumentType {
    Implication,
    Abjunction,
}

impl PropositionType {
    /// Stable storage/wire token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::Connection => "CONNECTION",
        }
    }
}

impl ConnectionType {
    /// Stable storage/wire token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conjunction => "CONJUNCTION",
            Self::Disjunction => "DISJUNCTION",
        }
    }
}

impl ArgumentType {
    /// Stable storage/wire token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Implication => "IMPLICATION",
            Self::Abjunction => "ABJUNCTION",
        }
    }
}

impl FromStr for PropositionType {
    type Err = DecodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "SINGLE" => Ok(Self::Single),
            "CONNECTION" => Ok(Self::Connection),
            other => Err(decode_error("PropositionType", other)),
        }
    }
}

impl FromStr for ConnectionType {
    type Err = DecodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CONJUNCTION" => Ok(Self::Conjunction),
            "DISJUNCTION" => Ok(Self::Disjunction),
            other => Err(decode_error("ConnectionType", other)),
        }
    }
}

impl FromStr for ArgumentType {
    type Err = DecodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "IMPLICATION" => Ok(Self::Implication),
            "ABJUNCTION" => Ok(Self::Abjunction),
            other => Err(decode_error("ArgumentType", other)),
        }
    }
}

impl Display for PropositionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for ConnectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for ArgumentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn decode_error(enum_name: &'static str, token: &str) -> DecodeError {
    DecodeError {
        enum_name,
        token: token.to_string(),
    }
}

//! Proposition domain model.
//!
//! # Responsibility
//! - Define the atomic/compound statement record and its operand links.
//! - Provide shape validation shared by every write path.
//!
//! # Invariants
//! - A SINGLE proposition references no operands and carries no connective.
//! - Operand links point at other propositions by id; the graph they form
//!   must stay acyclic (enforced by `GraphService`).

use crate::model::kinds::{ConnectionType, PropositionType};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// System-assigned proposition identifier.
pub type PropositionId = i64;

/// Shape violations detected by `Proposition::validate()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropositionValidationError {
    /// SINGLE proposition references one or both operands.
    OperandsOnSingle,
    /// SINGLE proposition carries a connective.
    ConnectionTypeOnSingle,
}

impl Display for PropositionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OperandsOnSingle => write!(f, "SINGLE proposition must not reference operands"),
            Self::ConnectionTypeOnSingle => {
                write!(f, "SINGLE proposition must not carry a connection type")
            }
        }
    }
}

impl Error for PropositionValidationError {}

/// Logical statement, atomic or composed from two operand propositions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposition {
    /// `None` while transient; assigned once by the store.
    pub id: Option<PropositionId>,
    /// Serialized as `type` to match the external schema.
    #[serde(rename = "type")]
    pub kind: PropositionType,
    /// Statement content. Ignored by convention for CONNECTION.
    pub text: Option<String>,
    /// Meaningful only when `kind == PropositionType::Connection`.
    pub connection_type: Option<ConnectionType>,
    /// First operand of a CONNECTION.
    pub proposition1: Option<PropositionId>,
    /// Second operand of a CONNECTION.
    pub proposition2: Option<PropositionId>,
}

impl Proposition {
    /// Creates a transient atomic proposition.
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: PropositionType::Single,
            text: Some(text.into()),
            connection_type: None,
            proposition1: None,
            proposition2: None,
        }
    }

    /// Creates a transient compound proposition over two operands.
    pub fn connection(
        connection_type: ConnectionType,
        proposition1: PropositionId,
        proposition2: PropositionId,
    ) -> Self {
        Self {
            id: None,
            kind: PropositionType::Connection,
            text: None,
            connection_type: Some(connection_type),
            proposition1: Some(proposition1),
            proposition2: Some(proposition2),
        }
    }

    /// Returns whether this record has been assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the operand ids that are set, in operand order.
    pub fn operands(&self) -> impl Iterator<Item = PropositionId> {
        self.proposition1.into_iter().chain(self.proposition2)
    }

    /// Validates kind-dependent field shape.
    ///
    /// `text` is not checked; it stays free-form for both kinds.
    pub fn validate(&self) -> Result<(), PropositionValidationError> {
        if self.kind == PropositionType::Single {
            if self.proposition1.is_some() || self.proposition2.is_some() {
                return Err(PropositionValidationError::OperandsOnSingle);
            }
            if self.connection_type.is_some() {
                return Err(PropositionValidationError::ConnectionTypeOnSingle);
            }
        }
        Ok(())
    }
}

/// Identity equality: both ids set and equal, or the very same value.
impl PartialEq for Proposition {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(left), Some(right)) => left == right,
            _ => std::ptr::eq(self, other),
        }
    }
}

impl Eq for Proposition {}

impl Hash for Proposition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

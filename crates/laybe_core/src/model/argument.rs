//! Argument domain model.
//!
//! An argument asserts that its conclusion follows from its premise under the
//! relation named by `kind`. Premise and conclusion may be the same proposition.

use crate::model::kinds::ArgumentType;
use crate::model::proposition::PropositionId;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// System-assigned argument identifier.
pub type ArgumentId = i64;

/// Inference step between two propositions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argument {
    /// `None` while transient; assigned once by the store.
    pub id: Option<ArgumentId>,
    /// Serialized as `type` to match the external schema.
    #[serde(rename = "type")]
    pub kind: ArgumentType,
    pub premise: Option<PropositionId>,
    pub conclusion: Option<PropositionId>,
}

impl Argument {
    /// Creates a transient argument between two propositions.
    pub fn new(kind: ArgumentType, premise: PropositionId, conclusion: PropositionId) -> Self {
        Self {
            id: None,
            kind,
            premise: Some(premise),
            conclusion: Some(conclusion),
        }
    }

    /// Returns whether this record has been assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(left), Some(right)) => left == right,
            _ => std::ptr::eq(self, other),
        }
    }
}

impl Eq for Argument {}

impl Hash for Argument {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

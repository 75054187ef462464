use crate::domain::entities::client::{Client, ClientDraft};
use std::fmt;

/// The unique field a create or update collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Cuit,
    Email,
}

impl ConflictField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictField::Cuit => "cuit",
            ConflictField::Email => "email",
        }
    }
}

/// An attributable uniqueness violation: which field, and the offending value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConflict {
    pub field: ConflictField,
    pub value: String,
}

impl ClientConflict {
    /// Build the conflict for `field` using the candidate's value for it.
    pub fn for_draft(field: ConflictField, draft: &ClientDraft) -> Self {
        let value = match field {
            ConflictField::Cuit => draft.cuit.clone(),
            ConflictField::Email => draft.email.clone(),
        };
        Self { field, value }
    }
}

impl fmt::Display for ClientConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            ConflictField::Cuit => {
                write!(f, "a client is already registered with CUIT {}", self.value)
            }
            ConflictField::Email => {
                write!(f, "a client is already registered with email {}", self.value)
            }
        }
    }
}

/// Decide why `existing` blocks `candidate`. CUIT wins when both fields collide.
///
/// Returns `None` when `existing` shares neither unique field with the candidate.
pub fn resolve_conflict(existing: &Client, candidate: &ClientDraft) -> Option<ClientConflict> {
    if existing.cuit == candidate.cuit {
        return Some(ClientConflict::for_draft(ConflictField::Cuit, candidate));
    }
    if existing.email == candidate.email {
        return Some(ClientConflict::for_draft(ConflictField::Email, candidate));
    }
    None
}

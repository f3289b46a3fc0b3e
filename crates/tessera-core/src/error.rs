//! Error types for Tessera

use crate::action::ActionKind;
use thiserror::Error;

/// Result type alias using Tessera's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building or transforming actions
#[derive(Error, Debug)]
pub enum Error {
    /// An action violates one of the model invariants
    #[error("Invalid {kind} action: {reason}")]
    InvalidAction { kind: ActionKind, reason: String },

    /// JSON encoding/decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid(kind: ActionKind, reason: impl Into<String>) -> Self {
        Self::InvalidAction {
            kind,
            reason: reason.into(),
        }
    }
}

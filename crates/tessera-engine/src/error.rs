//! Error types for the Tessera engine

use tessera_core::action::ActionKind;
use thiserror::Error;

/// Errors raised while applying an action to live frames
///
/// These never escape the engine: they are logged and the rest of the
/// action's effects are abandoned.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No live surface is registered for the frame
    #[error("Frame not found: {frame_id}")]
    FrameNotFound { frame_id: String },

    /// The live surface rejected or failed a call
    #[error("Failed to {operation} on {target}: {source}")]
    Surface {
        operation: &'static str,
        target: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DispatchError {
    pub fn frame_not_found(frame_id: impl Into<String>) -> Self {
        Self::FrameNotFound {
            frame_id: frame_id.into(),
        }
    }

    pub fn surface(operation: &'static str, target: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Surface {
            operation,
            target: target.into(),
            source,
        }
    }
}

/// Errors returned by the engine's public operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// The action was rejected before touching any state
    #[error("Rejected {kind} action: {source}")]
    InvalidAction {
        kind: ActionKind,
        #[source]
        source: tessera_core::Error,
    },

    /// Settings could not be read or written
    #[error("Settings error: {0}")]
    Settings(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using the engine's error type
pub type Result<T> = std::result::Result<T, EngineError>;

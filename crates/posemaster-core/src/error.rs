//! Error types for the PoseMaster application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire PoseMaster application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PoseMasterError {
    /// An image reference could not be parsed into bytes and a media type
    #[error("Malformed image reference: {0}")]
    MalformedReference(String),

    /// A remote image reference could not be fetched
    #[error(
        "Unable to process image source '{source_ref}': {reason}. Please try uploading an image instead of using a preset if this persists."
    )]
    SourceUnavailable { source_ref: String, reason: String },

    /// The model response did not contain an inline image part
    #[error("No image data returned by the generation service")]
    NoImageProduced,

    /// The model response did not contain a text part
    #[error("No text returned by the generation service")]
    NoTextProduced,

    /// Transport or service failure reported by the generation service
    #[error("Upstream error: {message}")]
    Upstream {
        status_code: Option<u16>,
        message: String,
    },

    /// Every composition variant of a batch failed to produce an image
    #[error("Failed to generate any composition images ({attempted} attempted)")]
    BatchGenerationFailed { attempted: usize },

    /// A wizard operation was invoked from a step that does not allow it
    #[error("Illegal wizard transition: '{action}' is not allowed in step {step}")]
    IllegalTransition { step: String, action: &'static str },

    /// A generation is already running for this session
    #[error("A generation is already in progress for this session")]
    GenerationInFlight,

    /// Head count outside the supported range
    #[error("Invalid head count {0}: must be between 1 and 10")]
    InvalidHeadCount(u32),

    /// Caller-supplied input rejected before any request is made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Prompt template rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PoseMasterError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a MalformedReference error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedReference(message.into())
    }

    /// Creates a SourceUnavailable error
    pub fn source_unavailable(source_ref: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_ref: source_ref.into(),
            reason: reason.into(),
        }
    }

    /// Creates an Upstream error
    pub fn upstream(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status_code,
            message: message.into(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is an illegal wizard transition
    pub fn is_illegal_transition(&self) -> bool {
        matches!(self, Self::IllegalTransition { .. })
    }

    /// Check if this error came from a single image/text request to the model.
    ///
    /// These are the failures the orchestrator absorbs per archetype.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            Self::NoImageProduced | Self::NoTextProduced | Self::Upstream { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PoseMasterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PoseMasterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<base64::DecodeError> for PoseMasterError {
    fn from(err: base64::DecodeError) -> Self {
        Self::MalformedReference(format!("invalid base64 payload: {err}"))
    }
}

impl From<anyhow::Error> for PoseMasterError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, PoseMasterError>`.
pub type Result<T> = std::result::Result<T, PoseMasterError>;

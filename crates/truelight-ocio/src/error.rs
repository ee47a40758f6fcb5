//! Error types for building and serializing Truelight transforms.
//!
//! This module covers failures from:
//! - Engine availability and engine-side rejection
//! - Decoding serialized transform blocks
//! - Transform inversion and color space lookup during pipeline assembly

use thiserror::Error;

/// Result type for Truelight operations.
pub type TlResult<T> = Result<T, TlError>;

/// Errors that can occur while assembling a pipeline.
#[derive(Debug, Error)]
pub enum TlError {
    /// The engine needed to realize the transform is missing in this deployment.
    #[error("unsupported engine '{engine}': {reason}")]
    UnsupportedEngine {
        /// Engine name.
        engine: String,
        /// Why the engine cannot be used.
        reason: String,
    },

    /// The engine rejected the descriptor's field values.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description from the engine.
        reason: String,
    },

    /// A serialized transform block could not be decoded.
    #[error("malformed serialized transform: {reason}")]
    MalformedSerializedForm {
        /// What's wrong with the block.
        reason: String,
    },

    /// Invalid transform definition.
    #[error("invalid transform: {reason}")]
    InvalidTransform {
        /// Description of what's wrong.
        reason: String,
    },

    /// Color space not found in config.
    #[error("color space not found: {name}")]
    ColorSpaceNotFound {
        /// Name of the missing color space.
        name: String,
    },
}

impl TlError {
    pub(crate) fn unsupported(engine: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedEngine {
            engine: engine.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedSerializedForm {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = TlError::unsupported("truelight", "no engine configured");
        assert_eq!(
            err.to_string(),
            "unsupported engine 'truelight': no engine configured"
        );

        let err = TlError::malformed("unknown field `gamma`");
        assert!(err.to_string().starts_with("malformed serialized transform:"));
    }
}

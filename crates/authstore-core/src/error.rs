//! Error taxonomy for authorization-artifact storage.
//!
//! Every public storage operation returns one of these variants. Callers are
//! expected to branch on them (e.g. treat `NotFound` as an expired token,
//! `Conflict` as a lost refresh-rotation race), so the variants carry the
//! entity kind and lookup key rather than free-form text.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure modes of the storage facade.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched a keyed lookup. Returned, never retried.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Uniqueness violation on insert, or a removal rejected because
    /// dependent rows still reference the target.
    #[error("conflict on {entity} {key}")]
    Conflict { entity: &'static str, key: String },

    /// A write referenced a row that does not exist.
    #[error("{entity} {key} references a missing row")]
    InvalidReference { entity: &'static str, key: String },

    /// A stored user-data payload could not be decoded.
    #[error("malformed user data payload")]
    MalformedPayload(#[source] serde_json::Error),

    /// Collaborator-level failure: connectivity, timeout, cancellation, or a
    /// corrupt row. Wraps the underlying error with the operation context.
    #[error("storage failure during {context}")]
    Storage {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn conflict(entity: &'static str, key: impl Into<String>) -> Self {
        Self::Conflict {
            entity,
            key: key.into(),
        }
    }

    pub fn invalid_reference(entity: &'static str, key: impl Into<String>) -> Self {
        Self::InvalidReference {
            entity,
            key: key.into(),
        }
    }

    pub fn storage(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// True if the error is a missing-row lookup failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True if the error is a uniqueness or referential-integrity conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

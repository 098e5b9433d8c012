//! Error taxonomy for translation runs.
//!
//! [`TranslateError`] covers the conditions that stop a run before any
//! service call is made. Everything that goes wrong after the fan-out starts
//! is a [`FieldFailure`]: recorded against the (field, language) pair that
//! failed, reported, and never allowed to abort sibling fields or languages.

use crate::catalog::LanguageCode;
use crate::client::ClientError;
use thiserror::Error;

/// Pre-flight failures. When one of these is returned, no translation calls
/// were made and the record is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("no '{0}' localization exists on this record")]
    SourceLanguageNotFound(LanguageCode),

    #[error("the '{0}' localization has no text to translate")]
    NothingToTranslate(LanguageCode),

    #[error("a translation run is already in progress for this record")]
    TranslationInProgress,
}

/// A single field translation that did not produce a value. Recovered
/// locally; the field keeps its previous value.
#[derive(Debug, Clone, Error)]
pub enum FieldFailure {
    /// The service reported a server-side fault. Transient by nature, so the
    /// user-facing phrasing suggests trying again rather than blaming the
    /// content.
    #[error("translation service unavailable (status {status})")]
    ServiceUnavailable { status: u16 },

    #[error("{message}")]
    Failed { message: String },
}

impl FieldFailure {
    pub fn from_client(err: &ClientError) -> Self {
        match err.status() {
            Some(status) if status >= 500 => FieldFailure::ServiceUnavailable { status },
            _ => FieldFailure::Failed {
                message: err.to_string(),
            },
        }
    }

    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, FieldFailure::ServiceUnavailable { .. })
    }
}

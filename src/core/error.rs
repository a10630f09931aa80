use thiserror::Error;

/// Structurally invalid calls into the engine.
///
/// Malformed fields inside a record are never reported here; the
/// normalizer absorbs them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("preference is required to score candidates")]
    MissingPreference,

    #[error("missing required identifier: {0}")]
    MissingIdentifier(&'static str),

    #[error("page size must be at least 1, got {0}")]
    InvalidPageSize(i64),

    #[error("page index must not be negative, got {0}")]
    InvalidPageIndex(i64),
}

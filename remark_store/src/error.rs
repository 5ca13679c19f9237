use thiserror::Error;

/// Store errors.
///
/// Failures of a store round trip are deliberately not subdivided. The
/// underlying error is logged where it happens and callers only ever see
/// [`StoreError::QueryFailed`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("failed to execute database query")]
    QueryFailed,
    #[error("failed to open database `{path}`")]
    Open { path: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

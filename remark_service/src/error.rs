use remark_store::error::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AuthorId, CommentId};

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Internal application error.
    ///
    /// Configuration and setup failures end up here.
    #[error("internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// A store round trip failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("comment `{0}` not found")]
    CommentNotFound(CommentId),

    #[error("author `{0}` not found")]
    AuthorNotFound(AuthorId),
}

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

macro_rules! impl_internal_errors {
    ( $( $type:ty ),* $(,)? ) => {
        $(
        impl From<$type> for AppError {
            fn from(err: $type) -> Self {
                AppError::Internal(Box::new(err))
            }
        }
        )*
    };
}
impl_internal_errors!(config::ConfigError);

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CommentNotFound(_) | Self::AuthorNotFound(_))
    }
}

/// Serialized form of a failure, `{ "error": message }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let err = AppError::from(StoreError::QueryFailed);
        assert!(matches!(err, AppError::Store(StoreError::QueryFailed)));
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "failed to execute database query");

        let err = AppError::CommentNotFound("c1".into());
        assert!(err.is_not_found());
        assert_eq!(
            serde_json::to_value(ErrorBody::from(&err)).unwrap(),
            serde_json::json!({ "error": "comment `c1` not found" })
        );
    }
}

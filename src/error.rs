//! Error type shared by the repositories and services.

use thiserror::Error;

/// Errors returned by sharing and friendship operations.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The request target is the requester.
    #[error("Cannot send a friend request to yourself")]
    SelfRequest,

    /// An active request already exists in that direction.
    #[error("Friend request already sent")]
    DuplicateRequest,

    /// A user, shop or friendship record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The record changed state underneath the caller.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The authorization guard refused the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Caller-supplied input was rejected before reaching the store.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The underlying store call failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// A stored row could not be decoded.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl ShareError {
    /// Short machine-readable code used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ShareError::SelfRequest => "self_request",
            ShareError::DuplicateRequest => "duplicate_request",
            ShareError::NotFound(_) => "not_found",
            ShareError::Conflict(_) => "conflict",
            ShareError::Forbidden(_) => "forbidden",
            ShareError::InvalidInput(_) => "invalid_input",
            ShareError::Persistence(_) => "persistence",
            ShareError::Corrupt(_) => "corrupt_record",
        }
    }
}

pub type Result<T, E = ShareError> = std::result::Result<T, E>;

/// Logs a failed operation at the boundary where it is returned.
///
/// Store failures are errors; rejected requests are routine.
pub(crate) fn log_failure(operation: &'static str, err: &ShareError) {
    match err {
        ShareError::Persistence(_) | ShareError::Corrupt(_) => {
            tracing::error!(operation, "{}", err);
        }
        _ => {
            tracing::debug!(operation, "{}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ShareError::SelfRequest.to_string(),
            "Cannot send a friend request to yourself"
        );
        assert_eq!(
            ShareError::NotFound("shop abc".into()).to_string(),
            "Not found: shop abc"
        );
    }

    #[test]
    fn test_sqlx_error_converts_to_persistence() {
        let err: ShareError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, ShareError::Persistence(_)));
        assert_eq!(err.code(), "persistence");
    }
}

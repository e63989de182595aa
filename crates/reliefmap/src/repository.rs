//! Error and outcome types shared by every repository trait.

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("stored row is inconsistent: {0}")]
    Corrupt(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("{operation} rolled back: {cause}")]
    Rollback {
        operation: &'static str,
        cause: String,
    },
}

impl RepositoryError {
    pub fn rollback(operation: &'static str, cause: impl std::fmt::Display) -> Self {
        Self::Rollback {
            operation,
            cause: cause.to_string(),
        }
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, _)
                if code.code == rusqlite::ErrorCode::ConstraintViolation
                    && code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Self::Conflict
            }
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Result of applying a partial patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    /// The patch carried no fields; nothing was written.
    Unchanged,
    Missing,
}

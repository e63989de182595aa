use crate::config::ConfigError;
use crate::locations::import::PlaceImportError;
use crate::locations::places::PlaceSearchError;
use crate::repository::RepositoryError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Process-level failure surfaced by the CLI entry points.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Store(RepositoryError),
    Import(PlaceImportError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Store(err) => write!(f, "store error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Import(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Store(value)
    }
}

impl From<PlaceImportError> for AppError {
    fn from(value: PlaceImportError) -> Self {
        Self::Import(value)
    }
}

/// Record kinds a lookup can miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Location,
    Review,
    ReviewImage,
    Amenities,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Entity::User => "User",
            Entity::Location => "Location",
            Entity::Review => "Review",
            Entity::ReviewImage => "Image",
            Entity::Amenities => "Amenities",
        };
        f.write_str(label)
    }
}

/// Author-only review operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdateReview,
    DeleteReview,
    AddReviewImage,
    RemoveReviewImage,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::UpdateReview => "update this review",
            Action::DeleteReview => "delete this review",
            Action::AddReviewImage => "add image to this review",
            Action::RemoveReviewImage => "remove image from this review",
        };
        f.write_str(label)
    }
}

/// Closed failure taxonomy shared by every domain service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("Unauthorized to {0}")]
    Unauthorized(Action),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    PlaceSearch(#[from] PlaceSearchError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Infrastructure failures are reported to clients without their detail.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Repository(_) | Self::PlaceSearch(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_client_contract() {
        assert_eq!(
            ServiceError::NotFound(Entity::User).to_string(),
            "User not found"
        );
        assert_eq!(
            ServiceError::Unauthorized(Action::UpdateReview).to_string(),
            "Unauthorized to update this review"
        );
        assert!(ServiceError::from(RepositoryError::NotFound).is_internal());
        assert!(!ServiceError::validation("bad").is_internal());
    }

    #[test]
    fn app_error_wraps_store_failures() {
        let err = AppError::from(RepositoryError::Unavailable("disk full".to_string()));
        assert_eq!(err.to_string(), "store error: repository unavailable: disk full");
        assert!(std::error::Error::source(&err).is_some());
    }
}

use super::domain::{NewUser, User, UserId};
use crate::repository::RepositoryError;

/// Storage abstraction for user accounts.
pub trait UserRepository: Send + Sync {
    fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    fn create(&self, user: NewUser) -> Result<UserId, RepositoryError>;
    fn increment_contribution(&self, id: UserId) -> Result<(), RepositoryError>;
    fn increment_verified_contribution(&self, id: UserId) -> Result<(), RepositoryError>;
    /// Returns `false` when no such user exists.
    fn set_trust_score(&self, id: UserId, trust_score: i64) -> Result<bool, RepositoryError>;
}

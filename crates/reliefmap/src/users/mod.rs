//! Contributor identities, trust scores, and contribution counters.

pub mod domain;
pub mod repository;

pub use domain::{NewUser, User, UserId, UserRole, DEFAULT_TRUST_SCORE};
pub use repository::UserRepository;

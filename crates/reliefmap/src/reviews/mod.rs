//! Reviews, review images, and author ownership rules.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    NewReview, Review, ReviewDraft, ReviewId, ReviewImage, ReviewImageId, ReviewPatch,
    ReviewUpdate, ReviewView, SCORE_MAX, SCORE_MIN,
};
pub use repository::ReviewRepository;
pub use router::review_router;
pub use service::ReviewService;

#[cfg(test)]
mod tests;

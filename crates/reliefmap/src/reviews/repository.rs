use super::domain::{NewReview, Review, ReviewId, ReviewImageId, ReviewPatch, ReviewView};
use crate::locations::LocationId;
use crate::repository::{PatchOutcome, RepositoryError};

/// Storage abstraction for reviews and their images. Soft-deleted rows are invisible to reads.
pub trait ReviewRepository: Send + Sync {
    fn find_by_location(
        &self,
        location_id: LocationId,
    ) -> Result<Vec<ReviewView>, RepositoryError>;
    fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, RepositoryError>;
    fn create(&self, review: NewReview) -> Result<ReviewId, RepositoryError>;
    fn update(&self, id: ReviewId, patch: &ReviewPatch) -> Result<PatchOutcome, RepositoryError>;
    fn delete(&self, id: ReviewId) -> Result<bool, RepositoryError>;
    fn add_image(&self, id: ReviewId, image_url: &str) -> Result<ReviewImageId, RepositoryError>;
    /// Soft-deletes one image of the given review. Returns `false` if it is not there.
    fn remove_image(&self, id: ReviewId, image_id: ReviewImageId) -> Result<bool, RepositoryError>;
}

use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    score_in_range, NewReview, Review, ReviewDraft, ReviewId, ReviewImageId, ReviewPatch,
    ReviewUpdate, ReviewView, SCORE_MAX, SCORE_MIN,
};
use super::repository::ReviewRepository;
use crate::error::{Action, Entity, ServiceError};
use crate::locations::{LocationId, LocationRepository};
use crate::repository::PatchOutcome;
use crate::users::{UserId, UserRepository};

/// Review workflows: trust snapshots on write, author-only mutation afterwards.
pub struct ReviewService<R, U, L> {
    reviews: Arc<R>,
    users: Arc<U>,
    locations: Arc<L>,
}

impl<R, U, L> ReviewService<R, U, L>
where
    R: ReviewRepository + 'static,
    U: UserRepository + 'static,
    L: LocationRepository + 'static,
{
    pub fn new(reviews: Arc<R>, users: Arc<U>, locations: Arc<L>) -> Self {
        Self {
            reviews,
            users,
            locations,
        }
    }

    pub fn list_for_location(
        &self,
        location_id: LocationId,
    ) -> Result<Vec<ReviewView>, ServiceError> {
        Ok(self.reviews.find_by_location(location_id)?)
    }

    /// Stores a review with the author's trust score as of now.
    pub fn create(&self, draft: ReviewDraft) -> Result<ReviewId, ServiceError> {
        if draft.review_text.trim().is_empty() {
            return Err(ServiceError::validation("review_text must not be empty"));
        }
        validate_scores(draft.cleanliness_score, draft.wait_time_score)?;

        let author = self
            .users
            .find_by_id(draft.user_id)?
            .ok_or(ServiceError::NotFound(Entity::User))?;
        if self.locations.find_by_id(draft.location_id)?.is_none() {
            return Err(ServiceError::NotFound(Entity::Location));
        }

        let user_id = draft.user_id;
        let location_id = draft.location_id;
        let review_id = self.reviews.create(NewReview {
            draft,
            user_trust_score: author.trust_score,
        })?;

        if let Err(err) = self.users.increment_contribution(user_id) {
            warn!(%user_id, error = %err, "could not credit contribution");
        }
        info!(%review_id, %location_id, %user_id, "review created");
        Ok(review_id)
    }

    pub fn update(
        &self,
        id: ReviewId,
        patch: &ReviewPatch,
        acting_user: UserId,
    ) -> Result<ReviewUpdate, ServiceError> {
        self.owned_review(id, acting_user, Action::UpdateReview)?;
        if matches!(&patch.review_text, Some(text) if text.trim().is_empty()) {
            return Err(ServiceError::validation("review_text must not be empty"));
        }
        validate_scores(patch.cleanliness_score, patch.wait_time_score)?;

        match self.reviews.update(id, patch)? {
            PatchOutcome::Applied => {
                info!(review_id = %id, "review updated");
                Ok(ReviewUpdate::Updated)
            }
            PatchOutcome::Unchanged => Ok(ReviewUpdate::Unchanged),
            PatchOutcome::Missing => Err(ServiceError::NotFound(Entity::Review)),
        }
    }

    pub fn delete(&self, id: ReviewId, acting_user: UserId) -> Result<(), ServiceError> {
        self.owned_review(id, acting_user, Action::DeleteReview)?;
        if !self.reviews.delete(id)? {
            return Err(ServiceError::NotFound(Entity::Review));
        }
        info!(review_id = %id, "review deleted");
        Ok(())
    }

    pub fn add_image(
        &self,
        id: ReviewId,
        image_url: &str,
        acting_user: UserId,
    ) -> Result<ReviewImageId, ServiceError> {
        let image_url = image_url.trim();
        if image_url.is_empty() {
            return Err(ServiceError::validation("Missing required field: image_url"));
        }
        self.owned_review(id, acting_user, Action::AddReviewImage)?;
        Ok(self.reviews.add_image(id, image_url)?)
    }

    pub fn remove_image(
        &self,
        id: ReviewId,
        image_id: ReviewImageId,
        acting_user: UserId,
    ) -> Result<(), ServiceError> {
        self.owned_review(id, acting_user, Action::RemoveReviewImage)?;
        if !self.reviews.remove_image(id, image_id)? {
            return Err(ServiceError::NotFound(Entity::ReviewImage));
        }
        Ok(())
    }

    /// Loads a live review and checks that `acting_user` wrote it.
    fn owned_review(
        &self,
        id: ReviewId,
        acting_user: UserId,
        action: Action,
    ) -> Result<Review, ServiceError> {
        let review = self
            .reviews
            .find_by_id(id)?
            .ok_or(ServiceError::NotFound(Entity::Review))?;
        if review.user_id != acting_user {
            warn!(
                review_id = %id,
                author = %review.user_id,
                %acting_user,
                %action,
                "rejected change by non-author"
            );
            return Err(ServiceError::Unauthorized(action));
        }
        Ok(review)
    }
}

fn validate_scores(cleanliness: Option<u8>, wait_time: Option<u8>) -> Result<(), ServiceError> {
    for (field, score) in [("cleanliness_score", cleanliness), ("wait_time_score", wait_time)] {
        if matches!(score, Some(value) if !score_in_range(value)) {
            return Err(ServiceError::validation(format!(
                "{field} must be between {SCORE_MIN} and {SCORE_MAX}"
            )));
        }
    }
    Ok(())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::locations::LocationId;
use crate::users::UserId;

/// Inclusive bounds for cleanliness and wait-time scores.
pub const SCORE_MIN: u8 = 1;
pub const SCORE_MAX: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub i64);

impl std::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewImageId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: ReviewId,
    pub location_id: LocationId,
    pub user_id: UserId,
    pub review_text: String,
    pub cleanliness_score: Option<u8>,
    pub wait_time_score: Option<u8>,
    /// Author trust at submission time; never rewritten.
    pub user_trust_score: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewImage {
    pub image_id: ReviewImageId,
    pub review_id: ReviewId,
    pub image_url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Review as listed for a location, with the author's present-day credibility alongside the
/// snapshot taken when the review was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub user_name: String,
    pub user_current_trust_score: i64,
    pub images: Vec<ReviewImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub location_id: LocationId,
    pub user_id: UserId,
    pub review_text: String,
    #[serde(default)]
    pub cleanliness_score: Option<u8>,
    #[serde(default)]
    pub wait_time_score: Option<u8>,
}

/// Row handed to the repository once the author's trust has been captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub draft: ReviewDraft,
    pub user_trust_score: i64,
}

/// Author-editable review fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewPatch {
    #[serde(default)]
    pub review_text: Option<String>,
    #[serde(default)]
    pub cleanliness_score: Option<u8>,
    #[serde(default)]
    pub wait_time_score: Option<u8>,
}

impl ReviewPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

pub fn score_in_range(score: u8) -> bool {
    (SCORE_MIN..=SCORE_MAX).contains(&score)
}

/// Result of a review patch as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewUpdate {
    Updated,
    Unchanged,
}

use std::collections::HashMap;

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql};

use super::SqliteStore;
use crate::locations::LocationId;
use crate::repository::{PatchOutcome, RepositoryError};
use crate::reviews::{
    NewReview, Review, ReviewId, ReviewImage, ReviewImageId, ReviewPatch, ReviewRepository,
    ReviewView,
};
use crate::users::UserId;

const REVIEW_COLUMNS: &str = r#"
    r.review_id, r.location_id, r.user_id, r.review_text, r.cleanliness_score,
    r.wait_time_score, r.user_trust_score, r.created_at, r.updated_at
"#;

fn review_from_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        review_id: ReviewId(row.get("review_id")?),
        location_id: LocationId(row.get("location_id")?),
        user_id: UserId(row.get("user_id")?),
        review_text: row.get("review_text")?,
        cleanliness_score: row.get("cleanliness_score")?,
        wait_time_score: row.get("wait_time_score")?,
        user_trust_score: row.get("user_trust_score")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn image_from_row(row: &Row<'_>) -> rusqlite::Result<ReviewImage> {
    Ok(ReviewImage {
        image_id: ReviewImageId(row.get("image_id")?),
        review_id: ReviewId(row.get("review_id")?),
        image_url: row.get("image_url")?,
        uploaded_at: row.get("uploaded_at")?,
    })
}

fn images_for_location(
    conn: &Connection,
    location_id: LocationId,
) -> rusqlite::Result<HashMap<ReviewId, Vec<ReviewImage>>> {
    let mut stmt = conn.prepare(
        r#"
SELECT ri.image_id, ri.review_id, ri.image_url, ri.uploaded_at
FROM review_images ri
JOIN reviews r ON r.review_id = ri.review_id
WHERE r.location_id = ?1 AND r.is_deleted = 0 AND ri.is_deleted = 0
ORDER BY ri.uploaded_at DESC, ri.image_id DESC
"#,
    )?;
    let mut grouped: HashMap<ReviewId, Vec<ReviewImage>> = HashMap::new();
    for image in stmt.query_map(params![location_id.0], image_from_row)? {
        let image = image?;
        grouped.entry(image.review_id).or_default().push(image);
    }
    Ok(grouped)
}

impl ReviewRepository for SqliteStore {
    fn find_by_location(
        &self,
        location_id: LocationId,
    ) -> Result<Vec<ReviewView>, RepositoryError> {
        self.with_conn(|conn| {
            let mut images = images_for_location(conn, location_id)?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {REVIEW_COLUMNS}, u.user_name, u.trust_score AS user_current_trust_score \
                 FROM reviews r \
                 JOIN users u ON r.user_id = u.user_id \
                 WHERE r.location_id = ?1 AND r.is_deleted = 0 \
                 ORDER BY r.created_at DESC, r.review_id DESC"
            ))?;
            let rows = stmt.query_map(params![location_id.0], |row| {
                Ok((
                    review_from_row(row)?,
                    row.get::<_, String>("user_name")?,
                    row.get::<_, i64>("user_current_trust_score")?,
                ))
            })?;

            let mut views = Vec::new();
            for row in rows {
                let (review, user_name, user_current_trust_score) = row?;
                let images = images.remove(&review.review_id).unwrap_or_default();
                views.push(ReviewView {
                    review,
                    user_name,
                    user_current_trust_score,
                    images,
                });
            }
            Ok(views)
        })
    }

    fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, RepositoryError> {
        self.with_conn(|conn| {
            let review = conn
                .query_row(
                    &format!(
                        "SELECT {REVIEW_COLUMNS} FROM reviews r \
                         WHERE r.review_id = ?1 AND r.is_deleted = 0"
                    ),
                    params![id.0],
                    review_from_row,
                )
                .optional()?;
            Ok(review)
        })
    }

    fn create(&self, review: NewReview) -> Result<ReviewId, RepositoryError> {
        let NewReview {
            draft,
            user_trust_score,
        } = review;
        self.with_conn(|conn| {
            conn.execute(
                r#"
INSERT INTO reviews (
    location_id, user_id, review_text, cleanliness_score, wait_time_score,
    user_trust_score, created_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#,
                params![
                    draft.location_id.0,
                    draft.user_id.0,
                    draft.review_text,
                    draft.cleanliness_score,
                    draft.wait_time_score,
                    user_trust_score,
                    Utc::now(),
                ],
            )?;
            Ok(ReviewId(conn.last_insert_rowid()))
        })
    }

    fn update(&self, id: ReviewId, patch: &ReviewPatch) -> Result<PatchOutcome, RepositoryError> {
        let mut assignments: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(text) = &patch.review_text {
            assignments.push("review_text = ?");
            values.push(Value::Text(text.clone()));
        }
        if let Some(score) = patch.cleanliness_score {
            assignments.push("cleanliness_score = ?");
            values.push(Value::Integer(i64::from(score)));
        }
        if let Some(score) = patch.wait_time_score {
            assignments.push("wait_time_score = ?");
            values.push(Value::Integer(i64::from(score)));
        }

        if assignments.is_empty() {
            return Ok(PatchOutcome::Unchanged);
        }

        assignments.push("updated_at = ?");
        let updated_at = Utc::now();
        let sql = format!(
            "UPDATE reviews SET {} WHERE review_id = ? AND is_deleted = 0",
            assignments.join(", ")
        );

        self.with_conn(|conn| {
            let bound = values
                .iter()
                .map(|value| value as &dyn ToSql)
                .chain([&updated_at as &dyn ToSql, &id.0]);
            let changed = conn.execute(&sql, params_from_iter(bound))?;
            Ok(if changed > 0 {
                PatchOutcome::Applied
            } else {
                PatchOutcome::Missing
            })
        })
    }

    fn delete(&self, id: ReviewId) -> Result<bool, RepositoryError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE reviews SET is_deleted = 1 WHERE review_id = ?1 AND is_deleted = 0",
                params![id.0],
            )?;
            Ok(changed > 0)
        })
    }

    fn add_image(&self, id: ReviewId, image_url: &str) -> Result<ReviewImageId, RepositoryError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO review_images (review_id, image_url, uploaded_at) VALUES (?1, ?2, ?3)",
                params![id.0, image_url, Utc::now()],
            )?;
            Ok(ReviewImageId(conn.last_insert_rowid()))
        })
    }

    fn remove_image(
        &self,
        id: ReviewId,
        image_id: ReviewImageId,
    ) -> Result<bool, RepositoryError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE review_images SET is_deleted = 1 \
                 WHERE image_id = ?1 AND review_id = ?2 AND is_deleted = 0",
                params![image_id.0, id.0],
            )?;
            Ok(changed > 0)
        })
    }
}

use super::common::*;
use std::sync::Arc;

use crate::error::{Action, Entity, ServiceError};
use crate::locations::LocationId;
use crate::reviews::{ReviewImageId, ReviewPatch, ReviewService, ReviewUpdate};
use crate::users::{UserId, UserRepository};

#[test]
fn create_snapshots_author_trust_and_credits_contribution() {
    let Fixture {
        service,
        store,
        location,
    } = fixture();
    let author = seed_user(&store, "kenji", 8);

    let id = service.create(draft(location, author)).expect("review created");

    let review = live_review(&store, id).expect("stored");
    assert_eq!(review.user_trust_score, 8);
    assert_eq!(review.cleanliness_score, Some(4));
    let author = UserRepository::find_by_id(&store, author)
        .expect("lookup")
        .expect("present");
    assert_eq!(author.contribution_count, 1);
}

#[test]
fn listing_shows_snapshot_beside_current_trust() {
    let Fixture {
        service,
        store,
        location,
    } = fixture();
    let author = seed_user(&store, "kenji", 8);
    service.create(draft(location, author)).expect("review created");
    assert!(store.set_trust_score(author, 2).expect("trust updated"));

    let reviews = service.list_for_location(location).expect("listing");

    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].review.user_trust_score, 8);
    assert_eq!(reviews[0].user_current_trust_score, 2);
    assert_eq!(reviews[0].user_name, "kenji");
}

#[test]
fn unknown_author_is_rejected_without_a_row() {
    let Fixture {
        service,
        store,
        location,
    } = fixture();

    match service.create(draft(location, UserId(999))) {
        Err(err @ ServiceError::NotFound(Entity::User)) => {
            assert_eq!(err.to_string(), "User not found");
        }
        other => panic!("expected missing user, got {other:?}"),
    }
    assert_eq!(store.row_count("reviews").expect("count"), 0);
}

#[test]
fn unknown_location_is_rejected() {
    let Fixture { service, store, .. } = fixture();
    let author = seed_user(&store, "kenji", 5);

    assert!(matches!(
        service.create(draft(LocationId(4242), author)),
        Err(ServiceError::NotFound(Entity::Location))
    ));
    assert_eq!(store.row_count("reviews").expect("count"), 0);
}

#[test]
fn scores_outside_one_to_five_are_rejected() {
    let Fixture {
        service,
        store,
        location,
    } = fixture();
    let author = seed_user(&store, "kenji", 5);

    for (cleanliness, wait_time) in [(Some(0), None), (None, Some(6))] {
        let mut draft = draft(location, author);
        draft.cleanliness_score = cleanliness;
        draft.wait_time_score = wait_time;
        assert!(matches!(
            service.create(draft),
            Err(ServiceError::Validation(_))
        ));
    }

    let mut blank = draft(location, author);
    blank.review_text = "   ".to_string();
    assert!(matches!(service.create(blank), Err(ServiceError::Validation(_))));
    assert_eq!(store.row_count("reviews").expect("count"), 0);
}

#[test]
fn only_the_author_may_edit_or_delete() {
    let Fixture {
        service,
        store,
        location,
    } = fixture();
    let author = seed_user(&store, "kenji", 5);
    let intruder = seed_user(&store, "mallory", 5);
    let id = service.create(draft(location, author)).expect("review created");
    let patch = ReviewPatch {
        review_text: Some("Filthy".to_string()),
        ..ReviewPatch::default()
    };

    match service.update(id, &patch, intruder) {
        Err(err @ ServiceError::Unauthorized(Action::UpdateReview)) => {
            assert_eq!(err.to_string(), "Unauthorized to update this review");
        }
        other => panic!("expected unauthorized, got {other:?}"),
    }
    assert!(matches!(
        service.delete(id, intruder),
        Err(ServiceError::Unauthorized(Action::DeleteReview))
    ));

    let review = live_review(&store, id).expect("still live");
    assert_eq!(review.review_text, "Clean and quiet");
    assert!(review.updated_at.is_none());
}

#[test]
fn author_edits_apply_and_empty_patch_is_a_no_op() {
    let Fixture {
        service,
        store,
        location,
    } = fixture();
    let author = seed_user(&store, "kenji", 5);
    let id = service.create(draft(location, author)).expect("review created");

    assert_eq!(
        service
            .update(id, &ReviewPatch::default(), author)
            .expect("empty patch"),
        ReviewUpdate::Unchanged
    );

    let patch = ReviewPatch {
        wait_time_score: Some(5),
        ..ReviewPatch::default()
    };
    assert_eq!(
        service.update(id, &patch, author).expect("patch"),
        ReviewUpdate::Updated
    );
    let review = live_review(&store, id).expect("still live");
    assert_eq!(review.wait_time_score, Some(5));
    assert_eq!(review.review_text, "Clean and quiet");
    assert!(review.updated_at.is_some());

    let bad = ReviewPatch {
        cleanliness_score: Some(9),
        ..ReviewPatch::default()
    };
    assert!(matches!(
        service.update(id, &bad, author),
        Err(ServiceError::Validation(_))
    ));
}

#[test]
fn deleted_reviews_disappear_from_listing_and_further_edits() {
    let Fixture {
        service,
        store,
        location,
    } = fixture();
    let author = seed_user(&store, "kenji", 5);
    let id = service.create(draft(location, author)).expect("review created");

    service.delete(id, author).expect("deleted");

    assert!(service.list_for_location(location).expect("listing").is_empty());
    assert!(matches!(
        service.delete(id, author),
        Err(ServiceError::NotFound(Entity::Review))
    ));
    assert_eq!(store.row_count("reviews").expect("count"), 1);
}

#[test]
fn image_lifecycle_is_owner_only() {
    let Fixture {
        service,
        store,
        location,
    } = fixture();
    let author = seed_user(&store, "kenji", 5);
    let intruder = seed_user(&store, "mallory", 5);
    let id = service.create(draft(location, author)).expect("review created");

    assert!(matches!(
        service.add_image(id, "https://img.example/1.jpg", intruder),
        Err(ServiceError::Unauthorized(Action::AddReviewImage))
    ));
    assert!(matches!(
        service.add_image(id, "  ", author),
        Err(ServiceError::Validation(_))
    ));

    let image = service
        .add_image(id, "https://img.example/1.jpg", author)
        .expect("image added");
    let listed = service.list_for_location(location).expect("listing");
    assert_eq!(listed[0].images.len(), 1);

    assert!(matches!(
        service.remove_image(id, image, intruder),
        Err(ServiceError::Unauthorized(Action::RemoveReviewImage))
    ));
    service.remove_image(id, image, author).expect("removed");
    assert!(matches!(
        service.remove_image(id, image, author),
        Err(ServiceError::NotFound(Entity::ReviewImage))
    ));
    assert!(matches!(
        service.remove_image(id, ReviewImageId(777), author),
        Err(ServiceError::NotFound(Entity::ReviewImage))
    ));
    assert!(service.list_for_location(location).expect("listing")[0]
        .images
        .is_empty());
}

#[test]
fn repository_outage_surfaces_as_internal_error() {
    let Fixture { store, location, .. } = fixture();
    let service = ReviewService::new(
        Arc::new(UnavailableRepository),
        Arc::new(store.clone()),
        Arc::new(store),
    );

    let err = service.list_for_location(location).expect_err("outage");
    assert!(err.is_internal());
}

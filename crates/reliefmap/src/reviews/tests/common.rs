use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use serde_json::Value;

use crate::locations::{BaseLocationDraft, LocationId, LocationRepository};
use crate::repository::{PatchOutcome, RepositoryError};
use crate::reviews::{
    review_router, NewReview, Review, ReviewDraft, ReviewId, ReviewImageId, ReviewPatch,
    ReviewRepository, ReviewService, ReviewView,
};
use crate::store::SqliteStore;
use crate::users::{NewUser, UserId, UserRepository};

pub(super) type StoreService = ReviewService<SqliteStore, SqliteStore, SqliteStore>;

/// Review service over one in-memory store, with a single imported location already present.
pub(super) struct Fixture {
    pub(super) service: StoreService,
    pub(super) store: SqliteStore,
    pub(super) location: LocationId,
}

pub(super) fn fixture() -> Fixture {
    let store = SqliteStore::open_in_memory().expect("store opens");
    let location = LocationRepository::create_from_base(
        &store,
        &BaseLocationDraft {
            name: "Shibuya Station East".to_string(),
            address: Some("Shibuya, Tokyo".to_string()),
            latitude: 35.658,
            longitude: 139.701,
            source_name: Some("google_places".to_string()),
            source_id: Some("shibuya-east".to_string()),
            is_official: true,
        },
    )
    .expect("location imported");
    let service = ReviewService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    );
    Fixture {
        service,
        store,
        location,
    }
}

pub(super) fn router_for(service: StoreService) -> axum::Router {
    review_router(Arc::new(service))
}

pub(super) fn seed_user(store: &SqliteStore, name: &str, trust_score: i64) -> UserId {
    UserRepository::create(store, NewUser::named(name).with_trust_score(trust_score))
        .expect("user created")
}

pub(super) fn draft(location_id: LocationId, user_id: UserId) -> ReviewDraft {
    ReviewDraft {
        location_id,
        user_id,
        review_text: "Clean and quiet".to_string(),
        cleanliness_score: Some(4),
        wait_time_score: Some(2),
    }
}

pub(super) fn live_review(store: &SqliteStore, id: ReviewId) -> Option<Review> {
    ReviewRepository::find_by_id(store, id).expect("lookup")
}

pub(super) struct UnavailableRepository;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl ReviewRepository for UnavailableRepository {
    fn find_by_location(
        &self,
        _location_id: LocationId,
    ) -> Result<Vec<ReviewView>, RepositoryError> {
        offline()
    }

    fn find_by_id(&self, _id: ReviewId) -> Result<Option<Review>, RepositoryError> {
        offline()
    }

    fn create(&self, _review: NewReview) -> Result<ReviewId, RepositoryError> {
        offline()
    }

    fn update(&self, _id: ReviewId, _patch: &ReviewPatch) -> Result<PatchOutcome, RepositoryError> {
        offline()
    }

    fn delete(&self, _id: ReviewId) -> Result<bool, RepositoryError> {
        offline()
    }

    fn add_image(&self, _id: ReviewId, _image_url: &str) -> Result<ReviewImageId, RepositoryError> {
        offline()
    }

    fn remove_image(
        &self,
        _id: ReviewId,
        _image_id: ReviewImageId,
    ) -> Result<bool, RepositoryError> {
        offline()
    }
}

pub(super) fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

pub(super) fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_for_unavailable(
    service: ReviewService<UnavailableRepository, SqliteStore, SqliteStore>,
) -> axum::Router {
    review_router(Arc::new(service))
}

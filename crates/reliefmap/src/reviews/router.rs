use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ReviewDraft, ReviewId, ReviewImageId, ReviewPatch, ReviewUpdate};
use super::repository::ReviewRepository;
use super::service::ReviewService;
use crate::http::{
    bad_request, blocking, error_response, json_body, path_id, respond, Envelope,
};
use crate::locations::{LocationId, LocationRepository};
use crate::users::{UserId, UserRepository};

type SharedService<R, U, L> = Arc<ReviewService<R, U, L>>;

/// Router exposing review listing, authoring, and image endpoints.
pub fn review_router<R, U, L>(service: SharedService<R, U, L>) -> Router
where
    R: ReviewRepository + 'static,
    U: UserRepository + 'static,
    L: LocationRepository + 'static,
{
    Router::new()
        .route(
            "/api/reviews/location/:location_id",
            get(list_handler::<R, U, L>),
        )
        .route("/api/reviews", post(create_handler::<R, U, L>))
        .route(
            "/api/reviews/:id",
            put(update_handler::<R, U, L>).delete(delete_handler::<R, U, L>),
        )
        .route("/api/reviews/:id/images", post(add_image_handler::<R, U, L>))
        .route(
            "/api/reviews/:id/images/:image_id",
            delete(remove_image_handler::<R, U, L>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateReviewRequest {
    location_id: Option<LocationId>,
    user_id: Option<UserId>,
    review_text: Option<String>,
    #[serde(default)]
    cleanliness_score: Option<u8>,
    #[serde(default)]
    wait_time_score: Option<u8>,
}

/// Patch fields plus the acting user; anything else is rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct UpdateReviewRequest {
    user_id: Option<UserId>,
    #[serde(default)]
    review_text: Option<String>,
    #[serde(default)]
    cleanliness_score: Option<u8>,
    #[serde(default)]
    wait_time_score: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActingUserRequest {
    user_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddImageRequest {
    image_url: Option<String>,
    user_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImagePath {
    id: i64,
    image_id: i64,
}

fn missing_user() -> Response {
    bad_request("Missing required field: user_id")
}

pub(crate) async fn list_handler<R, U, L>(
    State(service): State<SharedService<R, U, L>>,
    location_id: Result<Path<i64>, PathRejection>,
) -> Response
where
    R: ReviewRepository + 'static,
    U: UserRepository + 'static,
    L: LocationRepository + 'static,
{
    let location_id = match path_id(location_id, "location id") {
        Ok(id) => LocationId(id),
        Err(response) => return response,
    };
    match blocking(move || service.list_for_location(location_id)).await {
        Ok(reviews) => respond(StatusCode::OK, Envelope::list(reviews)),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn create_handler<R, U, L>(
    State(service): State<SharedService<R, U, L>>,
    body: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Response
where
    R: ReviewRepository + 'static,
    U: UserRepository + 'static,
    L: LocationRepository + 'static,
{
    let request = match json_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let (Some(location_id), Some(review_text), Some(user_id)) =
        (request.location_id, request.review_text, request.user_id)
    else {
        return bad_request("Missing required fields: location_id, review_text, user_id");
    };

    let draft = ReviewDraft {
        location_id,
        user_id,
        review_text,
        cleanliness_score: request.cleanliness_score,
        wait_time_score: request.wait_time_score,
    };
    match blocking(move || service.create(draft)).await {
        Ok(review_id) => respond(
            StatusCode::CREATED,
            Envelope::data(json!({ "review_id": review_id }))
                .with_message("Review created successfully"),
        ),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn update_handler<R, U, L>(
    State(service): State<SharedService<R, U, L>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateReviewRequest>, JsonRejection>,
) -> Response
where
    R: ReviewRepository + 'static,
    U: UserRepository + 'static,
    L: LocationRepository + 'static,
{
    let id = match path_id(id, "review id") {
        Ok(id) => ReviewId(id),
        Err(response) => return response,
    };
    let request = match json_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let Some(user_id) = request.user_id else {
        return missing_user();
    };

    let patch = ReviewPatch {
        review_text: request.review_text,
        cleanliness_score: request.cleanliness_score,
        wait_time_score: request.wait_time_score,
    };
    match blocking(move || service.update(id, &patch, user_id)).await {
        Ok(ReviewUpdate::Updated) => {
            respond(StatusCode::OK, Envelope::message("Review updated successfully"))
        }
        Ok(ReviewUpdate::Unchanged) => {
            respond(StatusCode::OK, Envelope::message("No changes made"))
        }
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn delete_handler<R, U, L>(
    State(service): State<SharedService<R, U, L>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ActingUserRequest>, JsonRejection>,
) -> Response
where
    R: ReviewRepository + 'static,
    U: UserRepository + 'static,
    L: LocationRepository + 'static,
{
    let id = match path_id(id, "review id") {
        Ok(id) => ReviewId(id),
        Err(response) => return response,
    };
    let request = match json_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let Some(user_id) = request.user_id else {
        return missing_user();
    };
    match blocking(move || service.delete(id, user_id)).await {
        Ok(()) => respond(StatusCode::OK, Envelope::message("Review deleted successfully")),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn add_image_handler<R, U, L>(
    State(service): State<SharedService<R, U, L>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<AddImageRequest>, JsonRejection>,
) -> Response
where
    R: ReviewRepository + 'static,
    U: UserRepository + 'static,
    L: LocationRepository + 'static,
{
    let id = match path_id(id, "review id") {
        Ok(id) => ReviewId(id),
        Err(response) => return response,
    };
    let request = match json_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let Some(image_url) = request.image_url else {
        return bad_request("Missing required field: image_url");
    };
    let Some(user_id) = request.user_id else {
        return missing_user();
    };

    match blocking(move || service.add_image(id, &image_url, user_id)).await {
        Ok(image_id) => respond(
            StatusCode::CREATED,
            Envelope::data(json!({ "image_id": image_id }))
                .with_message("Image added successfully"),
        ),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn remove_image_handler<R, U, L>(
    State(service): State<SharedService<R, U, L>>,
    path: Result<Path<ImagePath>, PathRejection>,
    body: Result<Json<ActingUserRequest>, JsonRejection>,
) -> Response
where
    R: ReviewRepository + 'static,
    U: UserRepository + 'static,
    L: LocationRepository + 'static,
{
    let Ok(Path(ImagePath { id, image_id })) = path else {
        return bad_request("Invalid review or image id");
    };
    let request = match json_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let Some(user_id) = request.user_id else {
        return missing_user();
    };

    let (id, image_id) = (ReviewId(id), ReviewImageId(image_id));
    match blocking(move || service.remove_image(id, image_id, user_id)).await {
        Ok(()) => respond(StatusCode::OK, Envelope::message("Image removed successfully")),
        Err(err) => error_response(&err),
    }
}

use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};

use super::domain::{AmenityInput, AmenityWrite};
use super::repository::AmenityRepository;
use super::service::AmenityService;
use crate::http::{blocking, error_response, json_body, path_id, respond, Envelope};
use crate::locations::{LocationId, LocationRepository};

type SharedService<A, L> = Arc<AmenityService<A, L>>;

pub fn amenity_router<A, L>(service: SharedService<A, L>) -> Router
where
    A: AmenityRepository + 'static,
    L: LocationRepository + 'static,
{
    Router::new()
        .route(
            "/api/amenities/location/:location_id",
            get(get_handler::<A, L>)
                .post(create_handler::<A, L>)
                .put(update_handler::<A, L>)
                .delete(delete_handler::<A, L>),
        )
        .with_state(service)
}

fn location_id(path: Result<Path<i64>, PathRejection>) -> Result<LocationId, Response> {
    path_id(path, "location id").map(LocationId)
}

/// Responds with `data: null` when the location has no record yet.
pub(crate) async fn get_handler<A, L>(
    State(service): State<SharedService<A, L>>,
    path: Result<Path<i64>, PathRejection>,
) -> Response
where
    A: AmenityRepository + 'static,
    L: LocationRepository + 'static,
{
    let location_id = match location_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match blocking(move || service.get(location_id)).await {
        Ok(amenities) => respond(StatusCode::OK, Envelope::data(amenities)),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn create_handler<A, L>(
    State(service): State<SharedService<A, L>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<AmenityInput>, JsonRejection>,
) -> Response
where
    A: AmenityRepository + 'static,
    L: LocationRepository + 'static,
{
    let location_id = match location_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let input = match json_body(body) {
        Ok(input) => input,
        Err(response) => return response,
    };
    match blocking(move || service.create(location_id, input)).await {
        Ok(()) => respond(
            StatusCode::CREATED,
            Envelope::message("Amenities created successfully"),
        ),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn update_handler<A, L>(
    State(service): State<SharedService<A, L>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<AmenityInput>, JsonRejection>,
) -> Response
where
    A: AmenityRepository + 'static,
    L: LocationRepository + 'static,
{
    let location_id = match location_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let input = match json_body(body) {
        Ok(input) => input,
        Err(response) => return response,
    };
    match blocking(move || service.update(location_id, input)).await {
        Ok(AmenityWrite::Created) => respond(
            StatusCode::OK,
            Envelope::message("Amenities created successfully"),
        ),
        Ok(AmenityWrite::Updated) => respond(
            StatusCode::OK,
            Envelope::message("Amenities updated successfully"),
        ),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn delete_handler<A, L>(
    State(service): State<SharedService<A, L>>,
    path: Result<Path<i64>, PathRejection>,
) -> Response
where
    A: AmenityRepository + 'static,
    L: LocationRepository + 'static,
{
    let location_id = match location_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match blocking(move || service.delete(location_id)).await {
        Ok(()) => respond(
            StatusCode::OK,
            Envelope::message("Amenities deleted successfully"),
        ),
        Err(err) => error_response(&err),
    }
}

use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    BaseLocationDraft, LocationFilters, LocationId, LocationPatch, LocationUpdate, SourceType,
    UgcLocationDraft, VerificationStatus,
};
use super::places::PlaceSearch;
use super::repository::LocationRepository;
use super::service::LocationService;
use crate::geo::{Coordinates, RadiusFilter};
use crate::http::{
    bad_request, blocking, error_response, json_body, path_id, query_params, respond, Envelope,
};
use crate::users::{UserId, UserRepository};

type SharedService<R, U, P> = Arc<LocationService<R, U, P>>;

/// Router exposing location search, import, submission, and maintenance endpoints.
pub fn location_router<R, U, P>(service: SharedService<R, U, P>) -> Router
where
    R: LocationRepository + 'static,
    U: UserRepository + 'static,
    P: PlaceSearch + 'static,
{
    Router::new()
        .route("/api/locations/search", get(search_handler::<R, U, P>))
        .route("/api/locations/search-text", get(search_text_handler::<R, U, P>))
        .route("/api/locations/google-search", get(places_handler::<R, U, P>))
        .route("/api/locations/import-google", post(import_handler::<R, U, P>))
        .route("/api/locations/ugc", post(ugc_handler::<R, U, P>))
        .route(
            "/api/locations/:id",
            get(detail_handler::<R, U, P>)
                .put(update_handler::<R, U, P>)
                .delete(delete_handler::<R, U, P>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<f64>,
    verification_status: Option<VerificationStatus>,
    source_type: Option<SourceType>,
}

impl SearchParams {
    fn into_filters(self) -> LocationFilters {
        let radius = match (self.lat, self.lng, self.radius) {
            (Some(lat), Some(lng), Some(radius_km)) => {
                Some(RadiusFilter::new(Coordinates::new(lat, lng), radius_km))
            }
            _ => None,
        };
        LocationFilters {
            verification_status: self.verification_status,
            source_type: self.source_type,
            radius,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextParams {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlacesParams {
    query: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
}

/// Import payload; the required fields are checked by hand so the 400 names all of them.
#[derive(Debug, Deserialize)]
pub(crate) struct ImportRequest {
    name: Option<String>,
    #[serde(default)]
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    source_name: Option<String>,
    #[serde(default)]
    source_id: Option<String>,
    #[serde(default)]
    is_official: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UgcRequest {
    user_id: Option<UserId>,
    name: Option<String>,
    #[serde(default)]
    address_input: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

pub(crate) async fn search_handler<R, U, P>(
    State(service): State<SharedService<R, U, P>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Response
where
    R: LocationRepository + 'static,
    U: UserRepository + 'static,
    P: PlaceSearch + 'static,
{
    let params = match query_params(params) {
        Ok(params) => params,
        Err(response) => return response,
    };
    let filters = params.into_filters();
    match blocking(move || service.search(&filters)).await {
        Ok(locations) => respond(StatusCode::OK, Envelope::list(locations)),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn search_text_handler<R, U, P>(
    State(service): State<SharedService<R, U, P>>,
    params: Result<Query<TextParams>, QueryRejection>,
) -> Response
where
    R: LocationRepository + 'static,
    U: UserRepository + 'static,
    P: PlaceSearch + 'static,
{
    let term = match query_params(params) {
        Ok(TextParams { q: Some(term) }) => term,
        Ok(_) => return bad_request("Search query parameter (q) is required"),
        Err(response) => return response,
    };
    match blocking(move || service.search_text(&term)).await {
        Ok(locations) => respond(StatusCode::OK, Envelope::list(locations)),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn places_handler<R, U, P>(
    State(service): State<SharedService<R, U, P>>,
    params: Result<Query<PlacesParams>, QueryRejection>,
) -> Response
where
    R: LocationRepository + 'static,
    U: UserRepository + 'static,
    P: PlaceSearch + 'static,
{
    let params = match query_params(params) {
        Ok(params) => params,
        Err(response) => return response,
    };
    let Some(query) = params.query else {
        return bad_request("Query parameter is required");
    };
    let bias = match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
        _ => None,
    };

    match service.search_places(&query, bias).await {
        Ok(places) => respond(StatusCode::OK, Envelope::list(places)),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn detail_handler<R, U, P>(
    State(service): State<SharedService<R, U, P>>,
    id: Result<Path<i64>, PathRejection>,
) -> Response
where
    R: LocationRepository + 'static,
    U: UserRepository + 'static,
    P: PlaceSearch + 'static,
{
    let id = match path_id(id, "location id") {
        Ok(id) => LocationId(id),
        Err(response) => return response,
    };
    match blocking(move || service.get(id)).await {
        Ok(detail) => respond(StatusCode::OK, Envelope::data(detail)),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn import_handler<R, U, P>(
    State(service): State<SharedService<R, U, P>>,
    body: Result<Json<ImportRequest>, JsonRejection>,
) -> Response
where
    R: LocationRepository + 'static,
    U: UserRepository + 'static,
    P: PlaceSearch + 'static,
{
    let request = match json_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let (Some(name), Some(latitude), Some(longitude)) =
        (request.name, request.latitude, request.longitude)
    else {
        return bad_request("Missing required fields: name, latitude, longitude");
    };

    let draft = BaseLocationDraft {
        name,
        address: request.address,
        latitude,
        longitude,
        source_name: request.source_name,
        source_id: request.source_id,
        is_official: request.is_official.unwrap_or(true),
    };
    match blocking(move || service.import_from_places(draft)).await {
        Ok(location_id) => respond(
            StatusCode::CREATED,
            Envelope::data(json!({ "location_id": location_id }))
                .with_message("Location imported successfully"),
        ),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn ugc_handler<R, U, P>(
    State(service): State<SharedService<R, U, P>>,
    body: Result<Json<UgcRequest>, JsonRejection>,
) -> Response
where
    R: LocationRepository + 'static,
    U: UserRepository + 'static,
    P: PlaceSearch + 'static,
{
    let request = match json_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let (Some(user_id), Some(name), Some(latitude), Some(longitude)) =
        (request.user_id, request.name, request.latitude, request.longitude)
    else {
        return bad_request("Missing required fields: name, latitude, longitude, user_id");
    };

    let draft = UgcLocationDraft {
        user_id,
        name,
        address_input: request.address_input,
        latitude,
        longitude,
    };
    match blocking(move || service.create_from_ugc(draft)).await {
        Ok(location_id) => respond(
            StatusCode::CREATED,
            Envelope::data(json!({ "location_id": location_id }))
                .with_message("Location created successfully"),
        ),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn update_handler<R, U, P>(
    State(service): State<SharedService<R, U, P>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<LocationPatch>, JsonRejection>,
) -> Response
where
    R: LocationRepository + 'static,
    U: UserRepository + 'static,
    P: PlaceSearch + 'static,
{
    let id = match path_id(id, "location id") {
        Ok(id) => LocationId(id),
        Err(response) => return response,
    };
    let patch = match json_body(body) {
        Ok(patch) => patch,
        Err(response) => return response,
    };
    match blocking(move || service.update(id, &patch)).await {
        Ok(LocationUpdate::Updated) => {
            respond(StatusCode::OK, Envelope::message("Location updated successfully"))
        }
        Ok(LocationUpdate::Unchanged) => {
            respond(StatusCode::OK, Envelope::message("No changes made"))
        }
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn delete_handler<R, U, P>(
    State(service): State<SharedService<R, U, P>>,
    id: Result<Path<i64>, PathRejection>,
) -> Response
where
    R: LocationRepository + 'static,
    U: UserRepository + 'static,
    P: PlaceSearch + 'static,
{
    let id = match path_id(id, "location id") {
        Ok(id) => LocationId(id),
        Err(response) => return response,
    };
    match blocking(move || service.delete(id)).await {
        Ok(()) => respond(
            StatusCode::OK,
            Envelope::message("Location deleted successfully"),
        ),
        Err(err) => error_response(&err),
    }
}

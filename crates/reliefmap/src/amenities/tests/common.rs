use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use serde_json::Value;

use crate::amenities::{amenity_router, AmenityService};
use crate::locations::{BaseLocationDraft, LocationId, LocationRepository};
use crate::store::SqliteStore;

pub(super) type StoreService = AmenityService<SqliteStore, SqliteStore>;

pub(super) fn build_service() -> (StoreService, SqliteStore, LocationId) {
    let store = SqliteStore::open_in_memory().expect("store opens");
    let location = LocationRepository::create_from_base(
        &store,
        &BaseLocationDraft {
            name: "Ueno Park WC".to_string(),
            address: None,
            latitude: 35.714,
            longitude: 139.774,
            source_name: None,
            source_id: None,
            is_official: true,
        },
    )
    .expect("location imported");
    let service = AmenityService::new(Arc::new(store.clone()), Arc::new(store.clone()));
    (service, store, location)
}

pub(super) fn router_with_service(service: StoreService) -> axum::Router {
    amenity_router(Arc::new(service))
}

pub(super) fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

pub(super) fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use serde_json::Value;

use crate::geo::Coordinates;
use crate::locations::{
    location_router, BaseLocation, BaseLocationDraft, BaseLocationId, LocationDetail,
    LocationFilters, LocationId, LocationPatch, LocationRepository, LocationService,
    MergedLocation, PlaceSearch, PlaceSearchError, UgcLocationDraft,
};
use crate::repository::{PatchOutcome, RepositoryError};
use crate::store::SqliteStore;
use crate::users::{NewUser, User, UserId, UserRepository};

pub(super) type StoreService = LocationService<SqliteStore, SqliteStore, StaticPlaces>;

pub(super) fn build_service() -> (StoreService, SqliteStore) {
    build_service_with_places(StaticPlaces::default())
}

pub(super) fn build_service_with_places(places: StaticPlaces) -> (StoreService, SqliteStore) {
    let store = SqliteStore::open_in_memory().expect("store opens");
    let service = LocationService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(places),
    );
    (service, store)
}

pub(super) fn router_with_service(service: StoreService) -> axum::Router {
    location_router(Arc::new(service))
}

pub(super) fn seed_user(store: &SqliteStore, trust_score: i64) -> UserId {
    UserRepository::create(store, NewUser::named("sakura").with_trust_score(trust_score))
        .expect("user created")
}

pub(super) fn station_wc(user_id: UserId) -> UgcLocationDraft {
    UgcLocationDraft {
        user_id,
        name: "Station WC".to_string(),
        address_input: None,
        latitude: 35.0,
        longitude: 139.0,
    }
}

pub(super) fn base_draft(name: &str, latitude: f64, longitude: f64) -> BaseLocationDraft {
    BaseLocationDraft {
        name: name.to_string(),
        address: Some("Minato, Tokyo".to_string()),
        latitude,
        longitude,
        source_name: Some("google_places".to_string()),
        source_id: Some(format!("id-{name}")),
        is_official: true,
    }
}

/// Canned place-search collaborator that records every query it receives.
#[derive(Default)]
pub(super) struct StaticPlaces {
    pub(super) results: Vec<BaseLocationDraft>,
    pub(super) failure_status: Option<String>,
    pub(super) queries: Mutex<Vec<(String, Option<Coordinates>)>>,
}

impl StaticPlaces {
    pub(super) fn returning(results: Vec<BaseLocationDraft>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    pub(super) fn failing(status: &str) -> Self {
        Self {
            failure_status: Some(status.to_string()),
            ..Self::default()
        }
    }

    pub(super) fn queries(&self) -> Vec<(String, Option<Coordinates>)> {
        self.queries.lock().expect("query log poisoned").clone()
    }
}

#[async_trait]
impl PlaceSearch for StaticPlaces {
    async fn text_search(
        &self,
        query: &str,
        bias: Option<Coordinates>,
    ) -> Result<Vec<BaseLocationDraft>, PlaceSearchError> {
        self.queries
            .lock()
            .expect("query log poisoned")
            .push((query.to_string(), bias));
        match &self.failure_status {
            Some(status) => Err(PlaceSearchError::Status(status.clone())),
            None => Ok(self.results.clone()),
        }
    }
}

/// User store whose verified-contribution counter always fails; everything else hits SQLite.
pub(super) struct CreditOutage(pub(super) SqliteStore);

impl UserRepository for CreditOutage {
    fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        UserRepository::find_by_id(&self.0, id)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        UserRepository::find_by_email(&self.0, email)
    }

    fn create(&self, user: NewUser) -> Result<UserId, RepositoryError> {
        UserRepository::create(&self.0, user)
    }

    fn increment_contribution(&self, id: UserId) -> Result<(), RepositoryError> {
        UserRepository::increment_contribution(&self.0, id)
    }

    fn increment_verified_contribution(&self, _id: UserId) -> Result<(), RepositoryError> {
        offline()
    }

    fn set_trust_score(&self, id: UserId, trust_score: i64) -> Result<bool, RepositoryError> {
        UserRepository::set_trust_score(&self.0, id, trust_score)
    }
}

pub(super) struct UnavailableRepository;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl LocationRepository for UnavailableRepository {
    fn find_all(&self, _filters: &LocationFilters) -> Result<Vec<MergedLocation>, RepositoryError> {
        offline()
    }

    fn find_by_id(&self, _id: LocationId) -> Result<Option<MergedLocation>, RepositoryError> {
        offline()
    }

    fn find_detail(&self, _id: LocationId) -> Result<Option<LocationDetail>, RepositoryError> {
        offline()
    }

    fn search(&self, _term: &str) -> Result<Vec<MergedLocation>, RepositoryError> {
        offline()
    }

    fn create_from_base(&self, _draft: &BaseLocationDraft) -> Result<LocationId, RepositoryError> {
        offline()
    }

    fn create_from_ugc(&self, _draft: &UgcLocationDraft) -> Result<LocationId, RepositoryError> {
        offline()
    }

    fn update(
        &self,
        _id: LocationId,
        _patch: &LocationPatch,
    ) -> Result<PatchOutcome, RepositoryError> {
        offline()
    }

    fn delete(&self, _id: LocationId) -> Result<bool, RepositoryError> {
        offline()
    }

    fn find_base_by_source(
        &self,
        _source_name: &str,
        _source_id: &str,
    ) -> Result<Option<BaseLocation>, RepositoryError> {
        offline()
    }

    fn refresh_base(
        &self,
        _id: BaseLocationId,
        _draft: &BaseLocationDraft,
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
